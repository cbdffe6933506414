//! Module settings stored as host global properties.

use crate::constants::{GP_IL_CONFIG_DIR, GP_IL_LAST_PHARMACY_MESSAGE_ENCOUNTER};
use crate::services::AdministrationService;
use crate::{PlatformError, PlatformResult};
use mhde_types::Encounter;
use std::path::PathBuf;
use uuid::Uuid;

/// Typed access to the module's global properties.
///
/// A blank value is treated the same as an absent one.
pub struct ModuleSettings<'a> {
    administration: &'a dyn AdministrationService,
}

impl<'a> ModuleSettings<'a> {
    pub fn new(administration: &'a dyn AdministrationService) -> Self {
        Self { administration }
    }

    /// Directory holding the drug mapping files, if configured.
    pub fn drugs_mapping_directory(&self) -> PlatformResult<Option<PathBuf>> {
        Ok(self.get(GP_IL_CONFIG_DIR)?.map(PathBuf::from))
    }

    /// Uuid of the last pharmacy encounter already sent as a message, if any.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidSetting` if the stored value is not a uuid.
    pub fn last_pharmacy_message_encounter(&self) -> PlatformResult<Option<Uuid>> {
        self.get(GP_IL_LAST_PHARMACY_MESSAGE_ENCOUNTER)?
            .map(|value| {
                Uuid::parse_str(&value).map_err(|_| PlatformError::InvalidSetting {
                    key: GP_IL_LAST_PHARMACY_MESSAGE_ENCOUNTER.into(),
                    value,
                })
            })
            .transpose()
    }

    pub fn set_last_pharmacy_message_encounter(&self, encounter: &Encounter) -> PlatformResult<()> {
        tracing::debug!(encounter = %encounter.uuid, "recording last pharmacy message encounter");
        self.administration.set_global_property(
            GP_IL_LAST_PHARMACY_MESSAGE_ENCOUNTER,
            &encounter.uuid.to_string(),
        )
    }

    fn get(&self, key: &str) -> PlatformResult<Option<String>> {
        Ok(self
            .administration
            .get_global_property(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
