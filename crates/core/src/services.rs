//! Host platform service interfaces.
//!
//! The host EMR owns persistence, querying and sessions. This module declares the narrow slice
//! of its service layer that the data exchange module consumes. Implementations are injected by
//! the caller, either as `&dyn Trait` for the free-standing helpers or bundled in
//! [`PlatformServices`] for long-lived components.

use crate::PlatformResult;
use chrono::{DateTime, Utc};
use mhde_types::{Encounter, EncounterType, Form, Patient, Person, Provider, User};
use std::sync::Arc;
use uuid::Uuid;

/// Encounter query filters, passed through unchanged to [`EncounterService::get_encounters`].
///
/// Every filter left as `None` is unrestricted. A filter set to an empty collection is also
/// unrestricted. Voided encounters are excluded unless `include_voided` is set.
#[derive(Debug, Clone, Default)]
pub struct EncounterSearch {
    pub patient: Option<Patient>,
    pub location_uuid: Option<Uuid>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub forms: Option<Vec<Form>>,
    pub encounter_types: Option<Vec<EncounterType>>,
    pub provider_uuids: Option<Vec<Uuid>>,
    pub visit_type_uuids: Option<Vec<Uuid>>,
    pub visit_uuids: Option<Vec<Uuid>>,
    pub include_voided: bool,
}

impl EncounterSearch {
    /// Search for all non-voided encounters of `patient`, every other filter unset.
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            patient: Some(patient.clone()),
            ..Self::default()
        }
    }

    pub fn with_encounter_types(mut self, types: impl IntoIterator<Item = EncounterType>) -> Self {
        self.encounter_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_forms(mut self, forms: impl IntoIterator<Item = Form>) -> Self {
        self.forms = Some(forms.into_iter().collect());
        self
    }
}

pub trait EncounterService: Send + Sync {
    /// Encounters matching `search`, in ascending chronological order.
    fn get_encounters(&self, search: &EncounterSearch) -> PlatformResult<Vec<Encounter>>;

    fn get_encounter_type_by_uuid(&self, uuid: &Uuid) -> PlatformResult<Option<EncounterType>>;
}

pub trait ProviderService: Send + Sync {
    fn get_providers_by_person(&self, person: &Person) -> PlatformResult<Vec<Provider>>;
}

pub trait UserService: Send + Sync {
    fn get_all_users(&self) -> PlatformResult<Vec<User>>;
}

/// Access to the host's global properties (named string settings).
pub trait AdministrationService: Send + Sync {
    fn get_global_property(&self, key: &str) -> PlatformResult<Option<String>>;

    fn set_global_property(&self, key: &str, value: &str) -> PlatformResult<()>;
}

/// Handles to every host service the module uses.
#[derive(Clone)]
pub struct PlatformServices {
    pub encounters: Arc<dyn EncounterService>,
    pub providers: Arc<dyn ProviderService>,
    pub users: Arc<dyn UserService>,
    pub administration: Arc<dyn AdministrationService>,
}

impl PlatformServices {
    /// Bundle a single value that implements every service, as the in-memory host does.
    pub fn from_platform<P>(platform: Arc<P>) -> Self
    where
        P: EncounterService + ProviderService + UserService + AdministrationService + 'static,
    {
        Self {
            encounters: platform.clone(),
            providers: platform.clone(),
            users: platform.clone(),
            administration: platform,
        }
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices").finish_non_exhaustive()
    }
}
