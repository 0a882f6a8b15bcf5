use std::fs;
use std::path::PathBuf;

use crate::artifacts::{load_classifier, ArtifactPaths, ModelBundle};
use crate::classifiers::{LinearClassifier, NearestCentroid};
use crate::errors::ModelError;
use crate::registry::{Classifier, ClassifierArtifact};
use crate::transforms::{MinMaxScaler, StandardScaler, Transform, TransformArtifact};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn bundled_models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models")
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-12, "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn min_max_scales_into_unit_range() {
    let scaler = MinMaxScaler::new(vec![0.0, 10.0], vec![10.0, 30.0]).unwrap();
    let output = scaler.transform(&[5.0, 20.0]).unwrap();
    assert_close(&output, &[0.5, 0.5]);
}

#[test]
fn min_max_honours_custom_feature_range() {
    let scaler = MinMaxScaler {
        data_min: vec![0.0, 10.0],
        data_max: vec![10.0, 30.0],
        feature_range: (-1.0, 1.0),
    };
    scaler.validate().unwrap();
    let output = scaler.transform(&[0.0, 30.0]).unwrap();
    assert_close(&output, &[-1.0, 1.0]);
}

#[test]
fn min_max_zero_width_feature_only_shifts() {
    let scaler = MinMaxScaler::new(vec![4.0], vec![4.0]).unwrap();
    assert_close(&scaler.transform(&[4.0]).unwrap(), &[0.0]);
    assert_close(&scaler.transform(&[6.0]).unwrap(), &[2.0]);
}

#[test]
fn min_max_does_not_clip_out_of_range_values() {
    let scaler = MinMaxScaler::new(vec![0.0], vec![10.0]).unwrap();
    assert_close(&scaler.transform(&[-5.0]).unwrap(), &[-0.5]);
}

#[test]
fn standard_scaler_treats_zero_scale_as_one() {
    let scaler = StandardScaler::new(vec![1.0, 2.0], vec![2.0, 0.0]).unwrap();
    assert_close(&scaler.transform(&[5.0, 7.0]).unwrap(), &[2.0, 5.0]);
}

#[test]
fn transforms_reject_wrong_dimension() {
    let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    match scaler.transform(&[1.0, 2.0, 3.0]) {
        Err(ModelError::DimensionMismatch {
            artifact,
            expected,
            actual,
        }) => {
            assert_eq!(artifact, "standard");
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn transform_artifact_defaults_feature_range() {
    let artifact =
        TransformArtifact::from_json(r#"{"kind":"min_max","data_min":[0.0],"data_max":[2.0]}"#)
            .unwrap();
    match &artifact {
        TransformArtifact::MinMax(scaler) => assert_eq!(scaler.feature_range, (0.0, 1.0)),
        other => panic!("expected min_max artifact, got {other:?}"),
    }
    assert_eq!(artifact.name(), "min_max");
    assert_close(&artifact.transform(&[1.0]).unwrap(), &[0.5]);
}

#[test]
fn transform_artifact_rejects_mismatched_parameters() {
    let err = TransformArtifact::from_json(r#"{"kind":"standard","mean":[0.0,1.0],"scale":[1.0]}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::InvalidParameters {
            artifact: "standard",
            ..
        }
    ));
}

#[test]
fn transform_artifact_rejects_unknown_kind() {
    let err = TransformArtifact::from_json(r#"{"kind":"robust","center":[0.0]}"#).unwrap_err();
    assert!(matches!(err, ModelError::Decode { .. }));
}

#[test]
fn nearest_centroid_picks_closest_and_breaks_ties_by_order() {
    let model = NearestCentroid {
        classes: vec![7, 3],
        centroids: vec![vec![0.0, 0.0], vec![2.0, 0.0]],
    };
    model.validate().unwrap();
    assert_eq!(model.predict(&[0.4, 0.0]).unwrap(), 7);
    assert_eq!(model.predict(&[1.9, 1.0]).unwrap(), 3);
    assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 7);
}

#[test]
fn nearest_centroid_rejects_duplicate_classes() {
    let model = NearestCentroid {
        classes: vec![1, 1],
        centroids: vec![vec![0.0], vec![1.0]],
    };
    assert!(model.validate().is_err());
}

#[test]
fn linear_classifier_takes_argmax() {
    let model = LinearClassifier {
        classes: vec![1, 2, 3],
        coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
        intercept: vec![0.0, 0.5, 0.0],
    };
    model.validate().unwrap();
    assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
    assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 2);
    assert_eq!(model.predict(&[-3.0, -3.0]).unwrap(), 3);
}

#[test]
fn linear_classifier_binary_uses_single_row() {
    let model = LinearClassifier {
        classes: vec![4, 9],
        coef: vec![vec![2.0]],
        intercept: vec![-1.0],
    };
    model.validate().unwrap();
    assert_eq!(model.predict(&[0.0]).unwrap(), 4);
    assert_eq!(model.predict(&[1.0]).unwrap(), 9);
}

#[test]
fn decision_tree_descends_left_on_equal_threshold() {
    let tree = load_classifier(&fixture_path("tree.json")).unwrap();
    assert_eq!(tree.name(), "decision_tree");
    assert_eq!(tree.classes(), &[10, 20]);
    assert_eq!(tree.predict(&[0.0, 0.5]).unwrap(), 10);
    assert_eq!(tree.predict(&[0.0, 0.6]).unwrap(), 20);
}

#[test]
fn decision_tree_compares_inputs_at_f32_precision() {
    let tree = ClassifierArtifact::from_json(
        r#"{
            "kind": "decision_tree",
            "n_features": 1,
            "classes": [1, 2],
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [0.3, -2.0, -2.0],
            "value": [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]
        }"#,
    )
    .unwrap();

    // 0.3 rounds up to 0.30000001192092896 in f32, which lies past the split.
    assert!(f64::from(0.3f32) > 0.3);
    assert_eq!(tree.predict(&[0.3]).unwrap(), 2);
    assert_eq!(tree.predict(&[0.29999]).unwrap(), 1);
    assert_eq!(tree.predict(&[f64::from(0.29999998f32)]).unwrap(), 1);
}

#[test]
fn decision_tree_rejects_backward_child_links() {
    let document = fs::read_to_string(fixture_path("tree.json"))
        .unwrap()
        .replace(r#""children_left": [1, -1, -1]"#, r#""children_left": [0, -1, -1]"#);
    let err = ClassifierArtifact::from_json(&document).unwrap_err();
    assert!(matches!(
        err,
        ModelError::InvalidParameters {
            artifact: "decision_tree",
            ..
        }
    ));
}

#[test]
fn random_forest_averages_leaf_probabilities() {
    let forest = load_classifier(&fixture_path("forest.json")).unwrap();
    match &forest {
        ClassifierArtifact::RandomForest(inner) => {
            let proba = inner.predict_proba(&[0.0, 0.6]).unwrap();
            assert_close(&proba, &[0.25, 0.75]);
        }
        other => panic!("expected random forest, got {other:?}"),
    }
    assert_eq!(forest.predict(&[0.0, 0.6]).unwrap(), 20);
    assert_eq!(forest.predict(&[0.0, 0.0]).unwrap(), 10);
}

#[test]
fn load_reports_missing_file_path() {
    let missing = fixture_path("does_not_exist.json");
    match load_classifier(&missing) {
        Err(ModelError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn bundle_rejects_disagreeing_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("normalizer.json"),
        r#"{"kind":"min_max","data_min":[0.0,0.0],"data_max":[1.0,1.0]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("standardizer.json"),
        r#"{"kind":"standard","mean":[0.0,0.0],"scale":[1.0,1.0]}"#,
    )
    .unwrap();
    fs::copy(fixture_path("tree.json"), dir.path().join("classifier.json")).unwrap();
    ModelBundle::load(&ArtifactPaths::in_dir(dir.path())).unwrap();

    fs::write(
        dir.path().join("standardizer.json"),
        r#"{"kind":"standard","mean":[0.0],"scale":[1.0]}"#,
    )
    .unwrap();
    match ModelBundle::load(&ArtifactPaths::in_dir(dir.path())) {
        Err(ModelError::DimensionMismatch {
            artifact,
            expected,
            actual,
        }) => {
            assert_eq!(artifact, "standardizer");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn bundled_models_load() {
    let bundle = ModelBundle::load(&ArtifactPaths::in_dir(bundled_models_dir()))
        .expect("bundled artifacts load");
    assert_eq!(bundle.n_features(), 7);
    assert_eq!(bundle.normalizer.name(), "min_max");
    assert_eq!(bundle.standardizer.name(), "standard");
    assert_eq!(bundle.classifier.name(), "nearest_centroid");
    assert_eq!(bundle.classifier.classes(), (1..=22).collect::<Vec<i64>>().as_slice());
}
