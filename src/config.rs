use crate::errors::{AppError, AppResult};
use crate::models::StorageKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE_FILE: &str = "todo.db";

/// Agent configuration, usually loaded from a YAML file:
///
/// ```yaml
/// name: alice
/// dataStorageType: database
/// dataDir: ./lists
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub name: String,
    #[serde(default)]
    pub data_storage_type: StorageKind,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl AgentConfig {
    pub fn new(name: &str, data_storage_type: StorageKind) -> Self {
        Self {
            name: name.to_string(),
            data_storage_type,
            data_dir: default_data_dir(),
            database_path: None,
            log_dir: None,
        }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| AppError::Config(format!("failed to read {}: {error}", path.display())))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> AppResult<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The list name ends up in a file name and a database column.
    pub fn validate(&self) -> AppResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Config("list name must not be empty".to_string()));
        }
        if name != self.name || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(AppError::Config(format!("invalid list name: {:?}", self.name)));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::AgentConfig;
    use crate::errors::AppError;
    use crate::models::StorageKind;
    use std::path::PathBuf;

    #[test]
    fn applies_defaults() {
        let config = AgentConfig::from_yaml("name: alice\n").expect("config");
        assert_eq!(config, AgentConfig::new("alice", StorageKind::File));
        assert_eq!(config.database_path(), PathBuf::from("./todo.db"));
    }

    #[test]
    fn reads_camel_case_keys() {
        let config = AgentConfig::from_yaml(
            "name: bob\ndataStorageType: database\ndataDir: /tmp/lists\ndatabasePath: /tmp/db/lists.sqlite\n",
        )
        .expect("config");
        assert_eq!(config.data_storage_type, StorageKind::Database);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/db/lists.sqlite"));
    }

    #[test]
    fn accepts_table_as_database() {
        let config = AgentConfig::from_yaml("name: bob\ndataStorageType: table\n").expect("config");
        assert_eq!(config.data_storage_type, StorageKind::Database);
    }

    #[test]
    fn rejects_bad_names_and_types() {
        assert!(matches!(AgentConfig::from_yaml("name: ''\n"), Err(AppError::Config(_))));
        assert!(matches!(AgentConfig::from_yaml("name: ../etc\n"), Err(AppError::Config(_))));
        assert!(matches!(
            AgentConfig::from_yaml("name: bob\ndataStorageType: cloud\n"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(AgentConfig::from_yaml("dataDir: .\n"), Err(AppError::Config(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = AgentConfig::load(&dir.path().join("missing.yaml")).expect_err("missing file");
        assert!(matches!(error, AppError::Config(_)));
    }
}
