//! Provider lookup.
//!
//! The host model allows a person to hold several provider accounts. In this deployment a user
//! maps to at most one meaningful provider, so extra providers are reported as a data-quality
//! issue and otherwise ignored.

use crate::services::ProviderService;
use crate::PlatformResult;
use mhde_types::{Provider, User};

/// Returns the provider linked to `user`'s person, or `None` if there is none.
///
/// # Errors
///
/// Propagates any failure of the provider service unchanged.
pub fn get_provider(
    providers: &dyn ProviderService,
    user: &User,
) -> PlatformResult<Option<Provider>> {
    let found = providers.get_providers_by_person(&user.person)?;

    if found.len() > 1 {
        tracing::warn!(
            user = %user.username,
            person = %user.person.uuid,
            count = found.len(),
            "user is linked to more than one provider; using the first"
        );
    }

    Ok(found.into_iter().next())
}
