//! Encounter queries.
//!
//! Each helper asks the host for every encounter of one patient and one encounter type, leaving
//! all other [`EncounterSearch`] filters unset, and then picks a result by position. The host
//! returns matches in ascending chronological order, so position is chronology.

use crate::services::{EncounterSearch, EncounterService};
use crate::PlatformResult;
use mhde_types::{Encounter, EncounterType, Form, Patient};

/// Finds the most recent encounter of `encounter_type` for `patient`.
pub fn last_encounter(
    encounters: &dyn EncounterService,
    patient: &Patient,
    encounter_type: &EncounterType,
) -> PlatformResult<Option<Encounter>> {
    let search = EncounterSearch::for_patient(patient)
        .with_encounter_types([encounter_type.clone()]);
    Ok(encounters.get_encounters(&search)?.pop())
}

/// Finds the earliest encounter of `encounter_type` for `patient`.
pub fn first_encounter(
    encounters: &dyn EncounterService,
    patient: &Patient,
    encounter_type: &EncounterType,
) -> PlatformResult<Option<Encounter>> {
    let search = EncounterSearch::for_patient(patient)
        .with_encounter_types([encounter_type.clone()]);
    Ok(encounters.get_encounters(&search)?.into_iter().next())
}

/// Finds the most recent encounter of `encounter_type` entered through `form`.
///
/// Without a form this behaves like [`last_encounter`].
pub fn encounter_by_form(
    encounters: &dyn EncounterService,
    patient: &Patient,
    encounter_type: &EncounterType,
    form: Option<&Form>,
) -> PlatformResult<Option<Encounter>> {
    let mut search = EncounterSearch::for_patient(patient)
        .with_encounter_types([encounter_type.clone()]);
    if let Some(form) = form {
        search = search.with_forms([form.clone()]);
    }

    let mut matches = encounters.get_encounters(&search)?;
    tracing::debug!(
        patient = %patient.uuid,
        encounter_type = %encounter_type.name,
        form = form.map(|f| f.name.as_str()),
        matches = matches.len(),
        "encounter by form"
    );
    Ok(matches.pop())
}
