//! Sends a visitor to the dashboard that matches their session role.

use axum::{extract::State, http::HeaderMap, response::Redirect};
use tracing::debug;

use upfluence_types::models::Role;

use crate::middleware::session_from_headers;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    BrandDashboard,
    InfluencerDashboard,
    AdminDashboard,
    SignIn,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::BrandDashboard => "/dashboard/brand",
            Destination::InfluencerDashboard => "/dashboard/influencer",
            Destination::AdminDashboard => "/dashboard/admin",
            Destination::SignIn => "/auth/signin",
        }
    }
}

pub fn resolve(role: Option<Role>) -> Destination {
    match role {
        Some(Role::Brand) => Destination::BrandDashboard,
        Some(Role::Influencer) => Destination::InfluencerDashboard,
        Some(Role::Admin) => Destination::AdminDashboard,
        None => Destination::SignIn,
    }
}

/// `GET /dashboard`. Never fails: a missing or unreadable session goes to sign-in.
pub async fn dashboard_entry(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let role = session_from_headers(&state.sessions, &headers).map(|claims| claims.role);
    let destination = resolve(role);
    debug!(?role, path = destination.path(), "Routing to dashboard");
    Redirect::to(destination.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_a_dashboard() {
        assert_eq!(resolve(Some(Role::Brand)).path(), "/dashboard/brand");
        assert_eq!(resolve(Some(Role::Influencer)).path(), "/dashboard/influencer");
        assert_eq!(resolve(Some(Role::Admin)).path(), "/dashboard/admin");
    }

    #[test]
    fn anonymous_goes_to_sign_in() {
        assert_eq!(resolve(None), Destination::SignIn);
        assert_eq!(resolve(None).path(), "/auth/signin");
    }
}
