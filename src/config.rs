use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::embedding::EmbeddingConfig;
use crate::core::mapping::{MappingConfig, DEFAULT_MAPPING_FILE};
use crate::core::npc_gen::GeneratorConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub mapping: MappingConfig,
    pub generation: GeneratorConfig,
    pub embedding: EmbeddingConfig,
}

/// Input and output locations.
///
/// Catalog files are looked up in the attachments bundle first, then in the
/// project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default application data directory (logs).
    pub data_dir: Option<PathBuf>,
    pub project_root: PathBuf,
    pub attachments_dir: String,
    pub terrain_dir: String,
    pub archetypes_file: String,
    pub tropes_file: String,
    /// Mapping artifact; relative paths resolve against the project root.
    pub mapping_file: PathBuf,
    /// Where generated NPCs are written; relative to the project root.
    pub output_dir: PathBuf,
    /// Replacement rule tables (YAML). Built-in tables when unset.
    pub rules_file: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            project_root: PathBuf::from("."),
            attachments_dir: "santoshr61-attachments".to_string(),
            terrain_dir: "Terrain_Test_Suite_JSON_Revised".to_string(),
            archetypes_file: "parent archetypes.json".to_string(),
            tropes_file: "tropes_child.json".to_string(),
            mapping_file: PathBuf::from(DEFAULT_MAPPING_FILE),
            output_dir: PathBuf::from("output"),
            rules_file: None,
        }
    }
}

impl DataConfig {
    pub fn attachments_path(&self) -> PathBuf {
        self.project_root.join(&self.attachments_dir)
    }

    pub fn terrain_path(&self) -> PathBuf {
        self.project_root.join(&self.terrain_dir)
    }

    pub fn archetypes_path(&self) -> PathBuf {
        self.prefer_attachments(&self.archetypes_file)
    }

    pub fn tropes_path(&self) -> PathBuf {
        self.prefer_attachments(&self.tropes_file)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.project_root.join(&self.mapping_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }

    pub fn rules_path(&self) -> Option<PathBuf> {
        self.rules_file.as_ref().map(|p| self.project_root.join(p))
    }

    fn prefer_attachments(&self, file: &str) -> PathBuf {
        let bundled = self.attachments_path().join(file);
        if bundled.exists() {
            bundled
        } else {
            self.project_root.join(file)
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl AppConfig {
    /// Load configuration from `~/.config/npcforge/config.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(Self::config_path())
    }

    /// Defaults when `path` does not exist. A file that is present but
    /// unreadable or malformed is an error, so callers can report it once
    /// logging is up.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load an explicitly named config file. Errors are returned, not
    /// papered over.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("npcforge"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("npcforge").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::npc_gen::ExclusionFallback;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.mapping.threshold, 0.35);
        assert_eq!(config.mapping.batch_size, 32);
        assert_eq!(config.generation.fallback_biome, 40);
        assert_eq!(config.generation.default_seed, 1337);
        assert_eq!(config.generation.exclusion_fallback, ExclusionFallback::FullCandidates);
        assert_eq!(config.embedding.provider, "ollama");
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_config_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mapping\nthreshold = 0.9").unwrap();

        let err = AppConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.data.data_dir = Some(PathBuf::from("/tmp/custom"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn test_load_from_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[mapping]
threshold = 0.5

[generation]
exclusion_fallback = "keep_themed"

[embedding]
provider = "hashing"
dimensions = 128
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.mapping.threshold, 0.5);
        assert_eq!(config.mapping.batch_size, 32);
        assert_eq!(config.generation.exclusion_fallback, ExclusionFallback::KeepThemed);
        assert_eq!(config.generation.fallback_biome, 40);
        assert_eq!(config.embedding.provider, "hashing");
        assert_eq!(config.embedding.dimensions, Some(128));
        assert_eq!(config.embedding.model, "nomic-embed-text");
    }

    #[test]
    fn test_load_from_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::load_from(dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[mapping\nthreshold = ").unwrap();
        assert!(matches!(AppConfig::load_from(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_catalog_paths_prefer_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = DataConfig {
            project_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(data.tropes_path(), dir.path().join("tropes_child.json"));

        std::fs::create_dir_all(data.attachments_path()).unwrap();
        std::fs::write(data.attachments_path().join("tropes_child.json"), "[]").unwrap();
        assert_eq!(
            data.tropes_path(),
            dir.path().join("santoshr61-attachments").join("tropes_child.json")
        );
        assert_eq!(data.archetypes_path(), dir.path().join("parent archetypes.json"));

        data.rules_file = Some(PathBuf::from("rules.yaml"));
        assert_eq!(data.rules_path(), Some(dir.path().join("rules.yaml")));
        assert_eq!(data.mapping_path(), dir.path().join(DEFAULT_MAPPING_FILE));
    }
}
