use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use mhde_core::{
    date_has_time, get_all_encounter_types_of_interest, get_provider, is_today, parse_csv,
    EncounterTypeRegistry, EncounterTypeSlot, InMemoryPlatform, ModuleSettings, UserService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mhde")]
#[command(about = "mHealth data exchange module CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a comma separated list into trimmed, non-empty values
    ParseCsv {
        /// Comma separated text
        text: String,
    },
    /// Check whether a timestamp has a time of day other than midnight
    DateHasTime {
        /// RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS[.fff]` or `YYYY-MM-DD`
        timestamp: String,
    },
    /// Check whether an RFC 3339 timestamp falls on today's date
    IsToday {
        /// RFC 3339 timestamp (e.g. 2024-06-01T10:00:00+03:00)
        timestamp: String,
    },
    /// Resolve the encounter types of interest against a platform fixture
    EncounterTypes {
        /// YAML platform fixture
        fixture: PathBuf,
        /// YAML encounter type registry (optional, defaults to the built-in registry)
        #[arg(long)]
        registry: Option<PathBuf>,
    },
    /// Show the provider linked to a user in a platform fixture
    Provider {
        /// YAML platform fixture
        fixture: PathBuf,
        /// Username to look up
        username: String,
    },
    /// Show the module settings held by a platform fixture
    Settings {
        /// YAML platform fixture
        fixture: PathBuf,
    },
}

fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ParseCsv { text }) => {
            for value in parse_csv(&text) {
                println!("{}", value);
            }
        }
        Some(Commands::DateHasTime { timestamp }) => match parse_timestamp(&timestamp) {
            Some(dt) => println!("{}", date_has_time(&dt)),
            None => eprintln!("Error parsing timestamp: {}", timestamp),
        },
        Some(Commands::IsToday { timestamp }) => {
            match DateTime::parse_from_rfc3339(timestamp.trim()) {
                Ok(dt) => println!("{}", is_today(&dt)),
                Err(e) => eprintln!("Error parsing timestamp: {}", e),
            }
        }
        Some(Commands::EncounterTypes { fixture, registry }) => {
            let platform = InMemoryPlatform::from_yaml_file(&fixture)?;
            let registry = match registry {
                Some(path) => EncounterTypeRegistry::from_yaml_file(&path)?,
                None => EncounterTypeRegistry::default(),
            };
            let result = get_all_encounter_types_of_interest(&platform, &registry)?;
            for slot in result.slots() {
                match slot {
                    EncounterTypeSlot::Found(t) => println!("{} {}", t.uuid, t.name),
                    EncounterTypeSlot::Missing { key, uuid } => {
                        println!("{} <missing: {}>", uuid, key)
                    }
                }
            }
        }
        Some(Commands::Provider { fixture, username }) => {
            let platform = InMemoryPlatform::from_yaml_file(&fixture)?;
            let user = platform
                .get_all_users()?
                .into_iter()
                .find(|u| u.username.as_str() == username.trim());
            match user {
                Some(user) => match get_provider(&platform, &user)? {
                    Some(provider) => println!(
                        "Provider: {} ({})",
                        provider.uuid,
                        provider.identifier.as_deref().unwrap_or("no identifier")
                    ),
                    None => println!("No provider for user {}", user.username),
                },
                None => eprintln!("No such user: {}", username),
            }
        }
        Some(Commands::Settings { fixture }) => {
            let platform = InMemoryPlatform::from_yaml_file(&fixture)?;
            let settings = ModuleSettings::new(&platform);
            match settings.drugs_mapping_directory()? {
                Some(dir) => println!("Drugs mapping directory: {}", dir.display()),
                None => println!("Drugs mapping directory: not set"),
            }
            match settings.last_pharmacy_message_encounter()? {
                Some(uuid) => println!("Last pharmacy message encounter: {}", uuid),
                None => println!("Last pharmacy message encounter: not set"),
            }
        }
        None => {
            println!("Use 'mhde --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_timestamp_forms() {
        assert!(!date_has_time(&parse_timestamp("2024-06-01").expect("date")));
        assert!(date_has_time(
            &parse_timestamp("2024-06-01 00:00:00.250").expect("datetime")
        ));
        assert!(date_has_time(
            &parse_timestamp("2024-06-01T07:30:00+03:00").expect("rfc3339")
        ));
        assert!(parse_timestamp("June 1st").is_none());
    }
}
