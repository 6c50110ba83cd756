use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::info;

use upfluence_db::models::{InfluencerProfileUpdate, NewSocialProfile};
use upfluence_types::api::{AddSocialProfileRequest, SessionClaims, UpdateInfluencerProfileRequest};
use upfluence_types::models::{InfluencerProfile, Role, SocialProfile};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::require_role;
use crate::state::{AppState, blocking_db};

pub const MAX_BIO_CHARS: usize = 1_000;

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// A profile counts as complete once it has a bio, a location and a category.
pub fn is_profile_complete(bio: &str, location: Option<&str>, categories: &[String]) -> bool {
    !bio.trim().is_empty() && location.is_some_and(|l| !l.trim().is_empty()) && !categories.is_empty()
}

pub fn build_profile_update(req: UpdateInfluencerProfileRequest) -> ApiResult<InfluencerProfileUpdate> {
    if req.rate.is_some_and(|r| r < 0) {
        return Err(ApiError::validation("Rate cannot be negative"));
    }

    let bio = req.bio.trim().to_string();
    if bio.chars().count() > MAX_BIO_CHARS {
        return Err(ApiError::validation(format!(
            "Bio must be at most {MAX_BIO_CHARS} characters"
        )));
    }
    let location = req.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
    let category = clean_list(req.category);
    let mut languages = clean_list(req.languages);
    if languages.is_empty() {
        languages.push("English".to_string());
    }
    let profile_completed = is_profile_complete(&bio, location.as_deref(), &category);

    Ok(InfluencerProfileUpdate {
        bio,
        location,
        category,
        languages,
        rate: req.rate,
        is_available: req.is_available,
        profile_completed,
    })
}

pub fn build_social_profile(req: AddSocialProfileRequest) -> ApiResult<NewSocialProfile> {
    let username = req.username.trim().trim_start_matches('@').to_string();
    if username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if req.followers_count < 0 || req.avg_likes < 0 || req.avg_comments < 0 {
        return Err(ApiError::validation("Counts cannot be negative"));
    }
    if !(0.0..=100.0).contains(&req.engagement_rate) {
        return Err(ApiError::validation("Engagement rate must be between 0 and 100"));
    }

    Ok(NewSocialProfile {
        platform: req.platform,
        username,
        url: req.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
        followers_count: req.followers_count,
        engagement_rate: req.engagement_rate,
        avg_likes: req.avg_likes,
        avg_comments: req.avg_comments,
        is_verified: false,
    })
}

pub async fn update_influencer_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(req): ApiJson<UpdateInfluencerProfileRequest>,
) -> ApiResult<Json<InfluencerProfile>> {
    require_role(&claims, &[Role::Influencer])?;
    let update = build_profile_update(req)?;

    let user_id = claims.sub;
    let profile = blocking_db(&state, move |db| db.update_influencer_profile(user_id, &update))
        .await?
        .ok_or(ApiError::NotFound("influencer profile"))?;
    info!(%user_id, completed = profile.profile_completed, "Influencer profile updated");
    Ok(Json(profile))
}

pub async fn add_social_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(req): ApiJson<AddSocialProfileRequest>,
) -> ApiResult<(StatusCode, Json<SocialProfile>)> {
    require_role(&claims, &[Role::Influencer])?;
    let social = build_social_profile(req)?;

    let user_id = claims.sub;
    let stored = blocking_db(&state, move |db| db.upsert_social_profile(user_id, &social))
        .await?
        .ok_or(ApiError::NotFound("influencer profile"))?;
    info!(%user_id, platform = %stored.platform, "Social profile saved");
    Ok((StatusCode::CREATED, Json(stored)))
}
