use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mhde_core::{get_all_encounter_types_of_interest, CoreConfig, PlatformServices};

/// Main entry point for the mHealth data exchange server
///
/// Resolves configuration once, builds the host services and serves the REST API.
///
/// # Environment Variables
/// - `MHDE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MHDE_ENCOUNTER_TYPES_FILE`: YAML encounter type registry (default: built-in registry)
/// - `MHDE_PLATFORM_FIXTURE`: YAML fixture seeding the in-memory host (default: empty host)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration or any configured file is invalid, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mhde_run=info".parse()?)
                .add_directive("mhde_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("MHDE_REST_ADDR").ok(),
        std::env::var("MHDE_ENCOUNTER_TYPES_FILE").ok(),
        std::env::var("MHDE_PLATFORM_FIXTURE").ok(),
    )?;

    let registry = cfg.load_encounter_type_registry()?;
    let services = PlatformServices::from_platform(Arc::new(cfg.load_platform()?));

    // Surface catalogue gaps at startup rather than on first use.
    let of_interest = get_all_encounter_types_of_interest(services.encounters.as_ref(), &registry)?;
    tracing::info!(
        "-- {} of {} encounter types of interest resolved",
        of_interest.resolved().len(),
        of_interest.slots().len()
    );

    api_rest::serve(cfg.rest_addr(), services).await
}
