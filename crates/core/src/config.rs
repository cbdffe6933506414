//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Request
//! handling never reads process-wide environment variables.

use crate::constants::DEFAULT_REST_ADDR;
use crate::encounter_types::EncounterTypeRegistry;
use crate::in_memory::InMemoryPlatform;
use crate::{PlatformError, PlatformResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: String,
    encounter_types_file: Option<PathBuf>,
    platform_fixture: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// Any file given must already exist; a missing file is a startup error rather than a
    /// silent fallback to defaults.
    pub fn new(
        rest_addr: String,
        encounter_types_file: Option<PathBuf>,
        platform_fixture: Option<PathBuf>,
    ) -> PlatformResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(PlatformError::InvalidInput(
                "rest_addr cannot be empty".into(),
            ));
        }

        for path in encounter_types_file.iter().chain(platform_fixture.iter()) {
            if !path.is_file() {
                return Err(PlatformError::InvalidInput(format!(
                    "configured file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            rest_addr,
            encounter_types_file,
            platform_fixture,
        })
    }

    /// Build the configuration from raw environment values.
    ///
    /// Takes the values rather than reading the environment so callers decide when (and
    /// whether) the process environment is consulted.
    pub fn from_env_values(
        rest_addr: Option<String>,
        encounter_types_file: Option<String>,
        platform_fixture: Option<String>,
    ) -> PlatformResult<Self> {
        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        Self::new(
            rest_addr,
            non_blank(encounter_types_file).map(PathBuf::from),
            non_blank(platform_fixture).map(PathBuf::from),
        )
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn encounter_types_file(&self) -> Option<&Path> {
        self.encounter_types_file.as_deref()
    }

    pub fn platform_fixture(&self) -> Option<&Path> {
        self.platform_fixture.as_deref()
    }

    /// Load the encounter type registry: the configured file if any, otherwise the defaults.
    pub fn load_encounter_type_registry(&self) -> PlatformResult<EncounterTypeRegistry> {
        match self.encounter_types_file() {
            Some(path) => EncounterTypeRegistry::from_yaml_file(path),
            None => Ok(EncounterTypeRegistry::default()),
        }
    }

    /// Build the in-memory host: seeded from the configured fixture if any, otherwise empty.
    pub fn load_platform(&self) -> PlatformResult<InMemoryPlatform> {
        match self.platform_fixture() {
            Some(path) => InMemoryPlatform::from_yaml_file(path),
            None => Ok(InMemoryPlatform::default()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_values_are_missing_or_blank() {
        let cfg = CoreConfig::from_env_values(None, Some("  ".into()), None).expect("config");
        assert_eq!(cfg.rest_addr(), DEFAULT_REST_ADDR);
        assert!(cfg.encounter_types_file().is_none());
        assert!(cfg.platform_fixture().is_none());
    }

    #[test]
    fn rejects_missing_files() {
        let err = CoreConfig::from_env_values(
            Some("127.0.0.1:8080".into()),
            Some("/definitely/not/here.yaml".into()),
            None,
        )
        .expect_err("missing file");
        assert!(matches!(err, PlatformError::InvalidInput(msg) if msg.contains("does not exist")));
    }

    #[test]
    fn loads_registry_from_configured_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "- key: hiv_enrollment\n  uuid: de78a6be-bfc5-4634-adc3-5f1a280455cc"
        )
        .expect("write registry");

        let cfg = CoreConfig::from_env_values(
            None,
            Some(file.path().display().to_string()),
            None,
        )
        .expect("config");

        let registry = cfg.load_encounter_type_registry().expect("registry");
        assert_eq!(registry.entries().len(), 1);
        assert_eq!(registry.entries()[0].key, "hiv_enrollment");
    }

    #[test]
    fn without_files_loads_defaults() {
        let cfg = CoreConfig::from_env_values(None, None, None).expect("config");
        assert_eq!(cfg.load_encounter_type_registry().expect("registry").entries().len(), 4);
        let platform = cfg.load_platform().expect("platform");
        assert!(crate::UserService::get_all_users(&platform)
            .expect("users")
            .is_empty());
    }
}
