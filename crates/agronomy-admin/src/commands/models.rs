use agronomy_core::config::AppConfig;
use agronomy_core::{labels, FEATURE_COUNT};
use agronomy_model::{Classifier, ModelBundle, Transform};
use anyhow::{bail, Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use tracing::warn;

/// What the loaded artifacts declare, compared against the crop label table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub normalizer: &'static str,
    pub standardizer: &'static str,
    pub classifier: &'static str,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub unmapped: Vec<i64>,
    pub unreachable: Vec<i64>,
}

impl ModelReport {
    pub fn from_bundle(bundle: &ModelBundle) -> Self {
        let classes = bundle.classifier.classes().to_vec();
        Self {
            normalizer: bundle.normalizer.name(),
            standardizer: bundle.standardizer.name(),
            classifier: bundle.classifier.name(),
            n_features: bundle.n_features(),
            unmapped: labels::unmapped_classes(&classes),
            unreachable: labels::unreachable_crops(&classes),
            classes,
        }
    }

    /// Problems that make the artifacts unusable for serving.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.n_features != FEATURE_COUNT {
            errors.push(format!(
                "artifacts expect {} features, submissions carry {FEATURE_COUNT}",
                self.n_features
            ));
        }
        if !self.unmapped.is_empty() {
            errors.push(format!(
                "classifier declares classes without a crop name: {:?}",
                self.unmapped
            ));
        }
        errors
    }

    pub fn class_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Class", "Crop", "Declared"]);

        let mut ids: Vec<i64> = (labels::FIRST_CLASS_ID..=labels::LAST_CLASS_ID).collect();
        ids.extend(self.unmapped.iter().copied());
        for id in ids {
            let crop = labels::crop_name(id).unwrap_or("(no label)");
            let declared = if self.classes.contains(&id) { "yes" } else { "no" };
            table.add_row(vec![id.to_string(), crop.to_string(), declared.to_string()]);
        }
        table
    }
}

pub fn check_models(config: &AppConfig) -> Result<()> {
    let paths = config.artifact_paths();
    let bundle = ModelBundle::load(&paths).with_context(|| {
        format!(
            "failed to load model artifacts from {}",
            config.model_dir.display()
        )
    })?;
    let report = ModelReport::from_bundle(&bundle);

    println!(
        "normalizer: {}  standardizer: {}  classifier: {}  features: {}",
        report.normalizer, report.standardizer, report.classifier, report.n_features
    );
    println!("{}", report.class_table());

    if !report.unreachable.is_empty() {
        warn!(unreachable = ?report.unreachable, "Some crops can never be recommended");
    }

    let errors = report.errors();
    if !errors.is_empty() {
        bail!("model check failed: {}", errors.join("; "));
    }
    println!("Model artifacts OK.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agronomy_model::{ClassifierArtifact, TransformArtifact};

    fn bundle_with_classes(classes: &str) -> ModelBundle {
        let scaler = TransformArtifact::from_json(
            r#"{"kind":"standard","mean":[0,0,0,0,0,0,0],"scale":[1,1,1,1,1,1,1]}"#,
        )
        .unwrap();
        let classifier = ClassifierArtifact::from_json(&format!(
            r#"{{"kind":"nearest_centroid","classes":{classes},"centroids":[[0,0,0,0,0,0,0],[1,1,1,1,1,1,1]]}}"#
        ))
        .unwrap();
        ModelBundle::new(scaler.clone(), scaler, classifier).unwrap()
    }

    #[test]
    fn mapped_classes_pass_but_report_unreachable_crops() {
        let report = ModelReport::from_bundle(&bundle_with_classes("[1,2]"));
        assert!(report.errors().is_empty());
        assert!(report.unmapped.is_empty());
        assert_eq!(report.unreachable.len(), 20);
        assert!(!report.unreachable.contains(&1));
    }

    #[test]
    fn unmapped_classes_fail_the_check() {
        let report = ModelReport::from_bundle(&bundle_with_classes("[0,1]"));
        assert_eq!(report.unmapped, vec![0]);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.class_table().row_count(), 23);
    }
}
