use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::middleware::require_session;
use crate::state::AppState;
use crate::{auth, campaigns, dashboard, diagnostics, messages, profile, router, search};

/// The full HTTP surface. Public routes need no session; everything else goes
/// through `require_session`.
pub fn app_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(diagnostics::health))
        .route("/diagnostics/db", get(diagnostics::db_diagnostics))
        .route("/diagnostics/env", get(diagnostics::env_diagnostics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(router::dashboard_entry));

    let protected = Router::new()
        .route("/auth/session", get(auth::current_session))
        .route("/me", get(auth::me))
        .route("/dashboard/brand", get(dashboard::brand_dashboard))
        .route("/dashboard/influencer", get(dashboard::influencer_dashboard))
        .route("/dashboard/admin", get(dashboard::admin_dashboard))
        .route("/influencers/search", get(search::search_influencers))
        .route(
            "/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(campaigns::get_campaign).patch(campaigns::update_campaign),
        )
        .route(
            "/campaigns/{id}/applications",
            get(campaigns::list_applications).post(campaigns::apply_to_campaign),
        )
        .route(
            "/campaigns/{id}/applications/{application_id}",
            patch(campaigns::review_application),
        )
        .route(
            "/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/messages/{id}/read", post(messages::mark_read))
        .route("/profile/influencer", put(profile::update_influencer_profile))
        .route("/profile/influencer/socials", post(profile::add_social_profile))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}
