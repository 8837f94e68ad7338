//! Role gates as extractors.
//!
//! Handlers that only a single role may call take one of these instead of a
//! bare [`AuthUser`]; the check happens before the handler body runs. The
//! workflow engine performs its own role gating on transitions, so most
//! indent handlers accept any authenticated user and let the engine decide.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sitedesk_core::error::CoreError;
use sitedesk_core::roles::Role;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Extractor that requires the caller to be the Site Engineer.
///
/// Raising indents and submitting DPRs are field actions; every other role
/// gets a 403.
pub struct RequireSiteEngineer(pub AuthUser);

impl FromRequestParts<AppState> for RequireSiteEngineer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::SiteEngineer {
            return Err(AppError::Core(CoreError::ForbiddenTransition(format!(
                "Requires the {} role",
                Role::SiteEngineer
            ))));
        }

        Ok(Self(user))
    }
}
