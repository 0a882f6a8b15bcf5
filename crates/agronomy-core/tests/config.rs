use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use agronomy_core::config::AppConfig;
use agronomy_core::db;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_point_at_bundled_models() {
    let config = AppConfig::default();
    assert_eq!(config.bind, SocketAddr::from(([0, 0, 0, 0], 3000)));
    assert_eq!(config.database_url, None);
    assert_eq!(config.max_connections, db::DEFAULT_MAX_CONNECTIONS);
    assert_eq!(db::DEFAULT_MAX_CONNECTIONS, 10);

    let paths = config.artifact_paths();
    assert_eq!(paths.normalizer, PathBuf::from("models/normalizer.json"));
    assert_eq!(paths.standardizer, PathBuf::from("models/standardizer.json"));
    assert_eq!(paths.classifier, PathBuf::from("models/classifier.json"));
}

#[test]
fn toml_file_overrides_defaults() {
    let config = AppConfig::from_toml_str(
        r#"
        bind = "127.0.0.1:8080"
        model_dir = "/srv/models"
        classifier_path = "/srv/forest.json"
        max_connections = 4
        "#,
    )
    .unwrap();

    assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
    assert_eq!(config.max_connections, 4);
    let paths = config.artifact_paths();
    assert_eq!(paths.normalizer, PathBuf::from("/srv/models/normalizer.json"));
    assert_eq!(paths.classifier, PathBuf::from("/srv/forest.json"));
}

#[test]
fn toml_rejects_unknown_keys() {
    assert!(AppConfig::from_toml_str("model_directory = \"x\"").is_err());
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agronomy.toml");
    std::fs::write(&path, "database_url = \"postgres://localhost/crops\"\n").unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(
        config.database_url.as_deref(),
        Some("postgres://localhost/crops")
    );
    assert!(AppConfig::from_file(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn environment_overrides_file_values() {
    let mut config = AppConfig::from_toml_str("model_dir = \"from-file\"").unwrap();
    config
        .apply_env(lookup_from(&[
            ("AGRONOMY_MODEL_DIR", "from-env"),
            ("AGRONOMY_BIND", "127.0.0.1:9000"),
            ("AGRONOMY_DATABASE_URL", "postgres://fallback/db"),
            ("AGRONOMY_MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();

    assert_eq!(config.model_dir, PathBuf::from("from-env"));
    assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 9000)));
    assert_eq!(config.database_url.as_deref(), Some("postgres://fallback/db"));
    assert_eq!(config.max_connections, 2);
}

#[test]
fn database_url_takes_precedence_over_prefixed_variable() {
    let mut config = AppConfig::default();
    config
        .apply_env(lookup_from(&[
            ("DATABASE_URL", "postgres://primary/db"),
            ("AGRONOMY_DATABASE_URL", "postgres://fallback/db"),
        ]))
        .unwrap();
    assert_eq!(config.database_url.as_deref(), Some("postgres://primary/db"));
}

#[test]
fn malformed_environment_values_are_errors() {
    let mut config = AppConfig::default();
    assert!(config
        .apply_env(lookup_from(&[("AGRONOMY_BIND", "not-an-address")]))
        .is_err());
    assert!(config
        .apply_env(lookup_from(&[("AGRONOMY_MAX_CONNECTIONS", "many")]))
        .is_err());
}
