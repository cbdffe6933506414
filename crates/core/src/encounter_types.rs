//! Encounter types of interest.
//!
//! The module cares about a fixed set of host encounter types, identified by stable uuids. The
//! set is an [`EncounterTypeRegistry`] loaded at startup: the built-in defaults, or a YAML file
//! listing `key`/`uuid` pairs in the order callers should see them.
//!
//! Resolving the registry against the host always yields one [`EncounterTypeSlot`] per entry.
//! An identifier missing from the host catalogue becomes [`EncounterTypeSlot::Missing`] rather
//! than being dropped, so slot positions stay stable across deployments.

use crate::constants::{
    DRUG_ORDER_ENCOUNTER_TYPE_UUID, GREENCARD_FOLLOWUP_ENCOUNTER_TYPE_UUID,
    HIV_ENROLLMENT_ENCOUNTER_TYPE_UUID, MCH_MOTHER_ENROLLMENT_ENCOUNTER_TYPE_UUID,
};
use crate::services::EncounterService;
use crate::{PlatformError, PlatformResult};
use mhde_types::EncounterType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// One registry entry: a stable key for callers and the host uuid it resolves through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncounterTypeEntry {
    pub key: String,
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterTypeRegistry {
    entries: Vec<EncounterTypeEntry>,
}

impl EncounterTypeRegistry {
    /// Build a registry, rejecting blank or duplicate keys.
    pub fn new(entries: Vec<EncounterTypeEntry>) -> PlatformResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.key.trim().is_empty() {
                return Err(PlatformError::InvalidInput(
                    "encounter type registry key cannot be empty".into(),
                ));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(PlatformError::DuplicateRegistryKey(entry.key.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn from_yaml_str(input: &str) -> PlatformResult<Self> {
        let entries: Vec<EncounterTypeEntry> =
            serde_yaml::from_str(input).map_err(PlatformError::YamlDeserialization)?;
        Self::new(entries)
    }

    pub fn from_yaml_file(path: &Path) -> PlatformResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| PlatformError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml(&self) -> PlatformResult<String> {
        serde_yaml::to_string(&self.entries).map_err(PlatformError::YamlSerialization)
    }

    pub fn entries(&self) -> &[EncounterTypeEntry] {
        &self.entries
    }
}

impl Default for EncounterTypeRegistry {
    /// HIV enrollment, greencard follow-up, drug order and MCH mother enrollment, in that order.
    fn default() -> Self {
        let entry = |key: &str, uuid: Uuid| EncounterTypeEntry {
            key: key.into(),
            uuid,
        };

        Self {
            entries: vec![
                entry("hiv_enrollment", HIV_ENROLLMENT_ENCOUNTER_TYPE_UUID),
                entry("greencard_followup", GREENCARD_FOLLOWUP_ENCOUNTER_TYPE_UUID),
                entry("drug_order", DRUG_ORDER_ENCOUNTER_TYPE_UUID),
                entry("mch_mother_enrollment", MCH_MOTHER_ENROLLMENT_ENCOUNTER_TYPE_UUID),
            ],
        }
    }
}

/// The outcome of resolving one registry entry against the host catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterTypeSlot {
    Found(EncounterType),
    Missing { key: String, uuid: Uuid },
}

impl EncounterTypeSlot {
    pub fn encounter_type(&self) -> Option<&EncounterType> {
        match self {
            Self::Found(encounter_type) => Some(encounter_type),
            Self::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Resolved encounter types of interest, one slot per registry entry, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterTypesOfInterest {
    slots: Vec<EncounterTypeSlot>,
}

impl EncounterTypesOfInterest {
    pub fn slots(&self) -> &[EncounterTypeSlot] {
        &self.slots
    }

    /// The encounter types that resolved, in registry order.
    pub fn resolved(&self) -> Vec<EncounterType> {
        self.slots
            .iter()
            .filter_map(EncounterTypeSlot::encounter_type)
            .cloned()
            .collect()
    }

    pub fn missing(&self) -> impl Iterator<Item = &EncounterTypeSlot> {
        self.slots.iter().filter(|slot| slot.is_missing())
    }
}

/// Resolves every registry entry against the host encounter type catalogue.
///
/// # Errors
///
/// Only host failures are errors. Unknown identifiers become [`EncounterTypeSlot::Missing`].
pub fn get_all_encounter_types_of_interest(
    encounters: &dyn EncounterService,
    registry: &EncounterTypeRegistry,
) -> PlatformResult<EncounterTypesOfInterest> {
    let mut slots = Vec::with_capacity(registry.entries().len());

    for entry in registry.entries() {
        match encounters.get_encounter_type_by_uuid(&entry.uuid)? {
            Some(encounter_type) => slots.push(EncounterTypeSlot::Found(encounter_type)),
            None => {
                tracing::warn!(
                    key = %entry.key,
                    uuid = %entry.uuid,
                    "encounter type of interest is not defined on this deployment"
                );
                slots.push(EncounterTypeSlot::Missing {
                    key: entry.key.clone(),
                    uuid: entry.uuid,
                });
            }
        }
    }

    Ok(EncounterTypesOfInterest { slots })
}
