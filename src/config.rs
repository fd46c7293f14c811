use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    BUDGETS_FILE, BULK_BATCH_SIZE, EMBEDDING_DIMENSION, GROSSES_FILE, KNN_INDEX, NAME_FILE,
    TEXT_INDEX, TITLE_FILE,
};
use crate::error::{CatalogError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "catalog_graph.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub neptune: NeptuneConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub raw_data_path: PathBuf,
    pub output_path: PathBuf,
    pub title_file: String,
    pub name_file: String,
    pub grosses_file: String,
    pub budgets_file: String,
    /// Re-write the filtered catalog under `<output>/staging`
    pub write_staging: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_data_path: PathBuf::from("data/raw"),
            output_path: PathBuf::from("output"),
            title_file: TITLE_FILE.to_string(),
            name_file: NAME_FILE.to_string(),
            grosses_file: GROSSES_FILE.to_string(),
            budgets_file: BUDGETS_FILE.to_string(),
            write_staging: false,
        }
    }
}

impl PipelineConfig {
    pub fn title_path(&self) -> PathBuf {
        self.raw_data_path.join(&self.title_file)
    }

    pub fn name_path(&self) -> PathBuf {
        self.raw_data_path.join(&self.name_file)
    }

    pub fn grosses_path(&self) -> PathBuf {
        self.raw_data_path.join(&self.grosses_file)
    }

    pub fn budgets_path(&self) -> PathBuf {
        self.raw_data_path.join(&self.budgets_file)
    }
}

/// How requests to a managed AWS service are authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AuthMode {
    #[serde(rename = "IAM", alias = "iam")]
    Iam,
    #[default]
    #[serde(rename = "none", alias = "DEFAULT", alias = "NONE")]
    None,
}

/// Connection settings for the graph database, passed to the ML client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NeptuneConfig {
    pub host: String,
    pub port: u16,
    pub auth_mode: AuthMode,
    #[serde(alias = "aws_region")]
    pub region: String,
}

impl Default for NeptuneConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8182,
            auth_mode: AuthMode::None,
            region: "us-east-1".to_string(),
        }
    }
}

impl NeptuneConfig {
    /// Read a notebook connection file (`graph_notebook_config.json`)
    pub fn from_notebook_config(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::io(e, format!("reading connection config {}", path.display()))
        })?;
        let config: NeptuneConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CatalogError::Config("neptune.host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(CatalogError::Config("neptune.port must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub region: String,
    pub auth_mode: AuthMode,
    pub knn_index: String,
    pub text_index: String,
    pub dimension: usize,
    pub batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            region: "us-east-1".to_string(),
            auth_mode: AuthMode::None,
            knn_index: KNN_INDEX.to_string(),
            text_index: TEXT_INDEX.to_string(),
            dimension: EMBEDDING_DIMENSION,
            batch_size: BULK_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            filter: "catalog_graph=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration, apply environment overrides and validate.
    ///
    /// An explicit path must exist; the default path may be absent, in
    /// which case built-in defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CATALOG_GRAPH_RAW_DATA_PATH") {
            self.pipeline.raw_data_path = PathBuf::from(v);
        }
        if let Some(v) = get("CATALOG_GRAPH_OUTPUT_PATH") {
            self.pipeline.output_path = PathBuf::from(v);
        }
        if let Some(v) = get("OPENSEARCH_URL") {
            self.search.endpoint = v;
        }
        if let Some(v) = get("AWS_REGION") {
            self.search.region = v.clone();
            self.neptune.region = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(CatalogError::Config(msg.to_string()));

        if self.pipeline.raw_data_path.as_os_str().is_empty() {
            return fail("pipeline.raw_data_path must not be empty");
        }
        if self.pipeline.output_path.as_os_str().is_empty() {
            return fail("pipeline.output_path must not be empty");
        }
        for (key, value) in [
            ("pipeline.title_file", &self.pipeline.title_file),
            ("pipeline.name_file", &self.pipeline.name_file),
            ("pipeline.grosses_file", &self.pipeline.grosses_file),
            ("pipeline.budgets_file", &self.pipeline.budgets_file),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::Config(format!("{} must not be empty", key)));
            }
        }
        self.neptune.validate()?;
        if self.search.dimension == 0 {
            return fail("search.dimension must be greater than 0");
        }
        if self.search.batch_size == 0 {
            return fail("search.batch_size must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pipeline.title_file, "title_essential_v1_complete.jsonl.gz");
        assert_eq!(config.search.knn_index, "ooc_knn");
        assert_eq!(config.search.text_index, "ooc_text");
        assert_eq!(config.search.dimension, 64);
        assert_eq!(config.search.batch_size, 10_000);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.logging.filter, "catalog_graph=info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [pipeline]
            raw_data_path = "/data/imdb"
            write_staging = true

            [search]
            auth_mode = "IAM"
            batch_size = 500
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pipeline.raw_data_path, PathBuf::from("/data/imdb"));
        assert!(config.pipeline.write_staging);
        assert_eq!(config.pipeline.output_path, PathBuf::from("output"));
        assert_eq!(config.search.auth_mode, AuthMode::Iam);
        assert_eq!(config.search.batch_size, 500);
        assert_eq!(config.search.dimension, 64);
        assert_eq!(
            config.pipeline.title_path(),
            PathBuf::from("/data/imdb/title_essential_v1_complete.jsonl.gz")
        );
    }

    #[test]
    fn test_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CATALOG_GRAPH_OUTPUT_PATH", "/tmp/graph"),
            ("OPENSEARCH_URL", "https://search.example.com"),
            ("AWS_REGION", "eu-west-1"),
            ("CATALOG_GRAPH_RAW_DATA_PATH", "  "),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.pipeline.output_path, PathBuf::from("/tmp/graph"));
        assert_eq!(config.pipeline.raw_data_path, PathBuf::from("data/raw"));
        assert_eq!(config.search.endpoint, "https://search.example.com");
        assert_eq!(config.search.region, "eu-west-1");
        assert_eq!(config.neptune.region, "eu-west-1");
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let mut config = AppConfig::default();
        config.search.dimension = 0;
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));

        let mut config = AppConfig::default();
        config.search.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.neptune.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_notebook_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph_notebook_config.json");
        fs::write(
            &path,
            r#"{"host": "db.cluster.neptune.amazonaws.com", "port": 8182, "auth_mode": "IAM",
                "load_from_s3_arn": "", "ssl": true, "aws_region": "us-west-2"}"#,
        )
        .unwrap();

        let config = NeptuneConfig::from_notebook_config(&path).unwrap();
        assert_eq!(config.host, "db.cluster.neptune.amazonaws.com");
        assert_eq!(config.port, 8182);
        assert_eq!(config.auth_mode, AuthMode::Iam);
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.base_url(), "https://db.cluster.neptune.amazonaws.com:8182");
    }

    #[test]
    fn test_notebook_config_without_auth() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph_notebook_config.json");
        fs::write(&path, r#"{"host": "localhost", "port": 8182, "auth_mode": "DEFAULT"}"#).unwrap();

        let config = NeptuneConfig::from_notebook_config(&path).unwrap();
        assert_eq!(config.auth_mode, AuthMode::None);
    }
}
