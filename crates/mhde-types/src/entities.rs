use crate::NonEmptyText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person known to the host: the identity behind patients, users and providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: i64,
    pub uuid: Uuid,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

impl Person {
    /// Full display name, or `None` if the host has no name on record.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A system account. Every user is backed by exactly one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub uuid: Uuid,
    pub username: NonEmptyText,
    pub person: Person,
}

/// A clinical staff identity that can be attached to encounters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: i64,
    pub uuid: Uuid,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub person: Option<Person>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub uuid: Uuid,
    pub person: Person,
}

/// A host-defined encounter category (enrollment, follow-up, drug order, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterType {
    pub encounter_type_id: i64,
    pub uuid: Uuid,
    pub name: NonEmptyText,
}

/// A data entry form through which encounters are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub form_id: i64,
    pub uuid: Uuid,
    pub name: String,
}

/// A single recorded interaction between a patient and the health system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub encounter_id: i64,
    pub uuid: Uuid,
    pub patient_uuid: Uuid,
    pub encounter_type: EncounterType,
    #[serde(default)]
    pub form: Option<Form>,
    #[serde(default)]
    pub location_uuid: Option<Uuid>,
    #[serde(default)]
    pub provider_uuids: Vec<Uuid>,
    #[serde(default)]
    pub visit_uuid: Option<Uuid>,
    #[serde(default)]
    pub visit_type_uuid: Option<Uuid>,
    pub encounter_datetime: DateTime<Utc>,
    #[serde(default)]
    pub voided: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(given: Option<&str>, family: Option<&str>) -> Person {
        Person {
            person_id: 1,
            uuid: Uuid::new_v4(),
            given_name: given.map(str::to_owned),
            family_name: family.map(str::to_owned),
        }
    }

    #[test]
    fn display_name_joins_available_parts() {
        assert_eq!(
            person(Some("Achieng"), Some("Otieno")).display_name().as_deref(),
            Some("Achieng Otieno")
        );
        assert_eq!(
            person(None, Some("Otieno")).display_name().as_deref(),
            Some("Otieno")
        );
        assert_eq!(person(Some("  "), None).display_name(), None);
    }

    #[test]
    fn encounter_defaults_optional_fields_from_yaml() {
        let input = r#"encounter_id: 7
uuid: 6f1c2d3e-4b5a-4c6d-8e7f-9a0b1c2d3e4f
patient_uuid: 0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d
encounter_type:
  encounter_type_id: 3
  uuid: de78a6be-bfc5-4634-adc3-5f1a280455cc
  name: HIV Enrollment
encounter_datetime: "2024-03-01T08:30:00Z"
"#;

        let encounter: Encounter = serde_yaml::from_str(input).expect("parse encounter");
        assert_eq!(encounter.encounter_type.name.as_str(), "HIV Enrollment");
        assert!(encounter.form.is_none());
        assert!(encounter.provider_uuids.is_empty());
        assert!(!encounter.voided);
    }
}
