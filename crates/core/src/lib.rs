//! # mHealth Data Exchange Core
//!
//! Helpers for querying patient encounters and providers on a host EMR platform.
//!
//! The host owns persistence, querying and sessions; this crate only declares the host services
//! it consumes ([`services`]) and builds small, stateless helpers on top of them:
//! - date and CSV utilities
//! - provider lookup for a user
//! - first/last encounter queries by type and form
//! - resolution of the encounter types of interest
//! - typed access to the module's global properties
//!
//! Services are always passed in explicitly. **No API concerns**: HTTP belongs in `api-rest`.

pub mod config;
pub mod constants;
pub mod csv;
pub mod dates;
pub mod encounter_types;
pub mod encounters;
pub mod error;
pub mod in_memory;
pub mod providers;
pub mod services;
pub mod settings;

pub use config::CoreConfig;
pub use csv::parse_csv;
pub use dates::{date_has_time, is_same_day, is_today};
pub use encounter_types::{
    get_all_encounter_types_of_interest, EncounterTypeEntry, EncounterTypeRegistry,
    EncounterTypeSlot, EncounterTypesOfInterest,
};
pub use encounters::{encounter_by_form, first_encounter, last_encounter};
pub use error::{PlatformError, PlatformResult};
pub use in_memory::{InMemoryPlatform, PlatformFixture};
pub use providers::get_provider;
pub use services::{
    AdministrationService, EncounterSearch, EncounterService, PlatformServices, ProviderService,
    UserService,
};
pub use settings::ModuleSettings;

pub use mhde_types::{
    Encounter, EncounterType, Form, NonEmptyText, Patient, Person, Provider, TextError, User,
};
