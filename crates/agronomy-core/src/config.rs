use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use agronomy_model::ArtifactPaths;
use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_PATH_VAR: &str = "AGRONOMY_CONFIG";

/// Runtime settings shared by the server and the admin tooling.
///
/// Precedence, lowest first: defaults, the TOML file named by
/// `AGRONOMY_CONFIG`, environment variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub model_dir: PathBuf,
    pub normalizer_path: Option<PathBuf>,
    pub standardizer_path: Option<PathBuf>,
    pub classifier_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            model_dir: PathBuf::from("models"),
            normalizer_path: None,
            standardizer_path: None,
            classifier_path: None,
            database_url: None,
            max_connections: crate::db::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Reads `.env`, the optional config file and the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlays environment values fetched through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("AGRONOMY_BIND") {
            self.bind = bind
                .parse()
                .with_context(|| format!("AGRONOMY_BIND '{bind}' is not a socket address"))?;
        }
        if let Some(dir) = lookup("AGRONOMY_MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("AGRONOMY_NORMALIZER_PATH") {
            self.normalizer_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("AGRONOMY_STANDARDIZER_PATH") {
            self.standardizer_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("AGRONOMY_CLASSIFIER_PATH") {
            self.classifier_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("AGRONOMY_DATABASE_URL")) {
            self.database_url = Some(url);
        }
        if let Some(max) = lookup("AGRONOMY_MAX_CONNECTIONS") {
            self.max_connections = max
                .parse()
                .with_context(|| format!("AGRONOMY_MAX_CONNECTIONS '{max}' is not a number"))?;
        }
        Ok(())
    }

    /// Artifact locations: explicit paths win over the model directory.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.model_dir);
        ArtifactPaths {
            normalizer: self.normalizer_path.clone().unwrap_or(defaults.normalizer),
            standardizer: self.standardizer_path.clone().unwrap_or(defaults.standardizer),
            classifier: self.classifier_path.clone().unwrap_or(defaults.classifier),
        }
    }
}
