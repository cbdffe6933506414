//! In-memory host platform.
//!
//! Implements every host service over plain vectors so the module can run without the EMR: the
//! server binary and CLI seed it from a YAML fixture, and tests build it up directly.

use crate::services::{
    AdministrationService, EncounterSearch, EncounterService, ProviderService, UserService,
};
use crate::{PlatformError, PlatformResult};
use mhde_types::{Encounter, EncounterType, Person, Provider, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Serializable snapshot of the in-memory host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformFixture {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub encounter_types: Vec<EncounterType>,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub global_properties: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    state: RwLock<PlatformFixture>,
}

impl InMemoryPlatform {
    pub fn from_fixture(fixture: PlatformFixture) -> Self {
        Self {
            state: RwLock::new(fixture),
        }
    }

    pub fn from_yaml_str(input: &str) -> PlatformResult<Self> {
        let fixture: PlatformFixture =
            serde_yaml::from_str(input).map_err(PlatformError::YamlDeserialization)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn from_yaml_file(path: &Path) -> PlatformResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| PlatformError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let platform = Self::from_yaml_str(&contents)?;
        tracing::info!(fixture = %path.display(), "loaded in-memory platform fixture");
        Ok(platform)
    }

    pub fn add_user(&self, user: User) -> PlatformResult<()> {
        self.write()?.users.push(user);
        Ok(())
    }

    pub fn add_provider(&self, provider: Provider) -> PlatformResult<()> {
        self.write()?.providers.push(provider);
        Ok(())
    }

    pub fn add_encounter_type(&self, encounter_type: EncounterType) -> PlatformResult<()> {
        self.write()?.encounter_types.push(encounter_type);
        Ok(())
    }

    pub fn add_encounter(&self, encounter: Encounter) -> PlatformResult<()> {
        self.write()?.encounters.push(encounter);
        Ok(())
    }

    fn read(&self) -> PlatformResult<RwLockReadGuard<'_, PlatformFixture>> {
        self.state
            .read()
            .map_err(|_| PlatformError::ServiceUnavailable("platform state poisoned".into()))
    }

    fn write(&self) -> PlatformResult<RwLockWriteGuard<'_, PlatformFixture>> {
        self.state
            .write()
            .map_err(|_| PlatformError::ServiceUnavailable("platform state poisoned".into()))
    }
}

/// `None` and empty filters are unrestricted.
fn allows<T>(filter: Option<&[T]>, matches: impl Fn(&T) -> bool) -> bool {
    match filter {
        None => true,
        Some(values) if values.is_empty() => true,
        Some(values) => values.iter().any(matches),
    }
}

fn matches_search(encounter: &Encounter, search: &EncounterSearch) -> bool {
    if encounter.voided && !search.include_voided {
        return false;
    }
    if let Some(patient) = &search.patient {
        if encounter.patient_uuid != patient.uuid {
            return false;
        }
    }
    if let Some(location) = &search.location_uuid {
        if encounter.location_uuid.as_ref() != Some(location) {
            return false;
        }
    }
    if search
        .from_date
        .is_some_and(|from| encounter.encounter_datetime < from)
    {
        return false;
    }
    if search
        .to_date
        .is_some_and(|to| encounter.encounter_datetime > to)
    {
        return false;
    }

    allows(search.forms.as_deref(), |form| {
        encounter.form.as_ref().is_some_and(|f| f.uuid == form.uuid)
    }) && allows(search.encounter_types.as_deref(), |t| {
        encounter.encounter_type.uuid == t.uuid
    }) && allows(search.provider_uuids.as_deref(), |p| {
        encounter.provider_uuids.contains(p)
    }) && allows(search.visit_type_uuids.as_deref(), |v| {
        encounter.visit_type_uuid.as_ref() == Some(v)
    }) && allows(search.visit_uuids.as_deref(), |v| {
        encounter.visit_uuid.as_ref() == Some(v)
    })
}

impl EncounterService for InMemoryPlatform {
    fn get_encounters(&self, search: &EncounterSearch) -> PlatformResult<Vec<Encounter>> {
        let state = self.read()?;
        let mut found: Vec<Encounter> = state
            .encounters
            .iter()
            .filter(|e| matches_search(e, search))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for encounters recorded at the same instant.
        found.sort_by_key(|e| e.encounter_datetime);
        Ok(found)
    }

    fn get_encounter_type_by_uuid(&self, uuid: &Uuid) -> PlatformResult<Option<EncounterType>> {
        let state = self.read()?;
        Ok(state
            .encounter_types
            .iter()
            .find(|t| &t.uuid == uuid)
            .cloned())
    }
}

impl ProviderService for InMemoryPlatform {
    fn get_providers_by_person(&self, person: &Person) -> PlatformResult<Vec<Provider>> {
        let state = self.read()?;
        Ok(state
            .providers
            .iter()
            .filter(|p| p.person.as_ref().is_some_and(|pp| pp.uuid == person.uuid))
            .cloned()
            .collect())
    }
}

impl UserService for InMemoryPlatform {
    fn get_all_users(&self) -> PlatformResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }
}

impl AdministrationService for InMemoryPlatform {
    fn get_global_property(&self, key: &str) -> PlatformResult<Option<String>> {
        Ok(self.read()?.global_properties.get(key).cloned())
    }

    fn set_global_property(&self, key: &str, value: &str) -> PlatformResult<()> {
        self.write()?
            .global_properties
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use mhde_types::NonEmptyText;
    use std::sync::Arc;

    const FIXTURE: &str = r#"users:
  - user_id: 1
    uuid: 1c4a2f7e-0b3d-4e5f-8a9b-0c1d2e3f4a5b
    username: admin
    person:
      person_id: 1
      uuid: 2d5b3a8f-1c4e-4f6a-9b0c-1d2e3f4a5b6c
      given_name: Super
      family_name: User
encounter_types:
  - encounter_type_id: 3
    uuid: 7df67b83-1b84-4fe2-b1b7-794b4e9bfcc3
    name: Drug Order
encounters:
  - encounter_id: 20
    uuid: 5e8f6d1b-4a7c-4b9d-8e2f-4a5b6c7d8e9f
    patient_uuid: 3e6c4b9a-2d5f-4a7b-8c1d-2e3f4a5b6c7d
    encounter_type:
      encounter_type_id: 3
      uuid: 7df67b83-1b84-4fe2-b1b7-794b4e9bfcc3
      name: Drug Order
    location_uuid: 6f9a7e2c-5b8d-4cae-9f3a-5b6c7d8e9f0a
    encounter_datetime: "2024-06-02T10:00:00Z"
  - encounter_id: 10
    uuid: 4d7e5c0a-3b6f-4a8c-9d1e-3f4a5b6c7d8e
    patient_uuid: 3e6c4b9a-2d5f-4a7b-8c1d-2e3f4a5b6c7d
    encounter_type:
      encounter_type_id: 3
      uuid: 7df67b83-1b84-4fe2-b1b7-794b4e9bfcc3
      name: Drug Order
    encounter_datetime: "2024-06-01T10:00:00Z"
global_properties:
  kenyaemrIL.drugsMappingDirectory: /opt/mappings
"#;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    #[test]
    fn loads_fixture_yaml() {
        let platform = InMemoryPlatform::from_yaml_str(FIXTURE).expect("fixture");

        assert_eq!(platform.get_all_users().expect("users").len(), 1);
        let drug_order = platform
            .get_encounter_type_by_uuid(&crate::constants::DRUG_ORDER_ENCOUNTER_TYPE_UUID)
            .expect("lookup");
        assert_eq!(drug_order.map(|t| t.name.to_string()).as_deref(), Some("Drug Order"));
        assert_eq!(
            platform
                .get_global_property("kenyaemrIL.drugsMappingDirectory")
                .expect("property")
                .as_deref(),
            Some("/opt/mappings")
        );
    }

    #[test]
    fn results_are_sorted_ascending() {
        let platform = InMemoryPlatform::from_yaml_str(FIXTURE).expect("fixture");
        let ids: Vec<i64> = platform
            .get_encounters(&EncounterSearch::default())
            .expect("search")
            .iter()
            .map(|e| e.encounter_id)
            .collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn unset_and_empty_filters_are_unrestricted() {
        let platform = InMemoryPlatform::from_yaml_str(FIXTURE).expect("fixture");
        let search = EncounterSearch {
            forms: Some(Vec::new()),
            provider_uuids: Some(Vec::new()),
            ..EncounterSearch::default()
        };
        assert_eq!(platform.get_encounters(&search).expect("search").len(), 2);
    }

    #[test]
    fn date_and_location_filters_restrict() {
        let platform = InMemoryPlatform::from_yaml_str(FIXTURE).expect("fixture");

        let after_first = EncounterSearch {
            from_date: Some(at("2024-06-01T12:00:00Z")),
            ..EncounterSearch::default()
        };
        let found = platform.get_encounters(&after_first).expect("search");
        assert_eq!(found.iter().map(|e| e.encounter_id).collect::<Vec<_>>(), vec![20]);

        let until_first = EncounterSearch {
            to_date: Some(at("2024-06-01T10:00:00Z")),
            ..EncounterSearch::default()
        };
        let found = platform.get_encounters(&until_first).expect("search");
        assert_eq!(found.iter().map(|e| e.encounter_id).collect::<Vec<_>>(), vec![10]);

        let elsewhere = EncounterSearch {
            location_uuid: Some(Uuid::new_v4()),
            ..EncounterSearch::default()
        };
        assert!(platform.get_encounters(&elsewhere).expect("search").is_empty());
    }

    #[test]
    fn rejects_unknown_fixture_sections() {
        let err = InMemoryPlatform::from_yaml_str("patients: []\n").expect_err("unknown key");
        assert!(matches!(err, PlatformError::YamlDeserialization(_)));
    }

    #[test]
    fn inserts_fail_once_the_store_is_poisoned() {
        let platform = Arc::new(InMemoryPlatform::default());
        let holder = Arc::clone(&platform);
        let outcome = std::thread::spawn(move || {
            let _guard = holder.state.write().expect("lock");
            panic!("writer died holding the platform lock");
        })
        .join();
        assert!(outcome.is_err());

        let user = User {
            user_id: 2,
            uuid: Uuid::new_v4(),
            username: NonEmptyText::new("nurse").expect("username"),
            person: Person {
                person_id: 2,
                uuid: Uuid::new_v4(),
                given_name: None,
                family_name: None,
            },
        };
        let err = platform.add_user(user).expect_err("poisoned store");
        assert!(matches!(err, PlatformError::ServiceUnavailable(_)));
        assert!(platform.get_all_users().is_err());
    }
}
