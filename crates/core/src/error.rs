#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("host service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("invalid value for setting {key}: {value}")]
    InvalidSetting { key: String, value: String },
    #[error("duplicate encounter type registry key: {0}")]
    DuplicateRegistryKey(String),
    #[error("failed to read file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
}

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
