//! Constants used throughout the mHealth data exchange core crate.

use uuid::{uuid, Uuid};

/// Global property holding the directory of drug mapping files.
pub const GP_IL_CONFIG_DIR: &str = "kenyaemrIL.drugsMappingDirectory";

/// Global property holding the uuid of the last pharmacy encounter sent as a message.
pub const GP_IL_LAST_PHARMACY_MESSAGE_ENCOUNTER: &str = "kenyaemrIL.lastPharmacyMessageEncounter";

/// Module identifier, used to build the web controller path and view name.
pub const MODULE_ID: &str = "mhealthdataexchange";

/// Default REST bind address when `MHDE_REST_ADDR` is not set.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

pub const GREENCARD_FOLLOWUP_ENCOUNTER_TYPE_UUID: Uuid = uuid!("a0034eee-1940-4e35-847f-97537a35d05e");
pub const HIV_ENROLLMENT_ENCOUNTER_TYPE_UUID: Uuid = uuid!("de78a6be-bfc5-4634-adc3-5f1a280455cc");
pub const DRUG_ORDER_ENCOUNTER_TYPE_UUID: Uuid = uuid!("7df67b83-1b84-4fe2-b1b7-794b4e9bfcc3");
pub const MCH_MOTHER_ENROLLMENT_ENCOUNTER_TYPE_UUID: Uuid = uuid!("3ee036d8-7c13-4393-b5d6-036f2fe45126");
