use axum::{
    Extension, Json,
    extract::{Query, State},
};

use upfluence_db::models::InfluencerListing;
use upfluence_types::api::{InfluencerCard, InfluencerSearchQuery, PlatformStats, SessionClaims};
use upfluence_types::models::Role;

use crate::error::{ApiError, ApiResult};
use crate::middleware::require_role;
use crate::state::{AppState, blocking_db};

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Applies the text, platform and follower filters. Flag filters are already
/// applied by the query.
pub fn matches(listing: &InfluencerListing, query: &InfluencerSearchQuery) -> bool {
    let profile = &listing.profile;

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let q = q.to_lowercase();
        let hit = contains_ci(&listing.user.name, &q)
            || contains_ci(&profile.bio, &q)
            || profile.location.as_deref().is_some_and(|l| contains_ci(l, &q))
            || profile.category.iter().any(|c| contains_ci(c, &q));
        if !hit {
            return false;
        }
    }

    if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        if !profile.category.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            return false;
        }
    }

    if let Some(location) = query.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        let location = location.to_lowercase();
        if !profile.location.as_deref().is_some_and(|l| contains_ci(l, &location)) {
            return false;
        }
    }

    if let Some(platform) = query.platform {
        if !profile.social_profiles.iter().any(|s| s.platform == platform) {
            return false;
        }
    }

    let total = profile.total_followers();
    if query.min_followers.is_some_and(|min| total < min) {
        return false;
    }
    if query.max_followers.is_some_and(|max| total > max) {
        return false;
    }

    if query.verified && !profile.is_verified {
        return false;
    }
    if query.available.is_some_and(|available| profile.is_available != available) {
        return false;
    }

    true
}

pub fn to_card(listing: InfluencerListing) -> InfluencerCard {
    let InfluencerListing { user, profile } = listing;
    let total_followers = profile.total_followers();
    let handle = profile
        .social_profiles
        .first()
        .map(|s| format!("@{}", s.username));
    let platforms = profile
        .social_profiles
        .iter()
        .map(|s| PlatformStats {
            platform: s.platform,
            followers: s.followers_count,
            engagement: s.engagement_rate,
            verified: s.is_verified,
        })
        .collect();

    InfluencerCard {
        id: profile.id,
        user_id: user.id,
        name: user.name,
        handle,
        avatar: user.avatar,
        bio: profile.bio,
        location: profile.location,
        categories: profile.category,
        rate: profile.rate,
        is_verified: profile.is_verified,
        is_available: profile.is_available,
        total_followers,
        platforms,
    }
}

pub fn validate_query(query: &InfluencerSearchQuery) -> ApiResult<()> {
    if query.min_followers.is_some_and(|n| n < 0) || query.max_followers.is_some_and(|n| n < 0) {
        return Err(ApiError::validation("Follower bounds cannot be negative"));
    }
    if let (Some(min), Some(max)) = (query.min_followers, query.max_followers) {
        if min > max {
            return Err(ApiError::validation("min_followers cannot exceed max_followers"));
        }
    }
    Ok(())
}

pub async fn search_influencers(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<InfluencerSearchQuery>,
) -> ApiResult<Json<Vec<InfluencerCard>>> {
    require_role(&claims, &[Role::Brand, Role::Admin])?;
    validate_query(&query)?;

    let (verified, available) = (query.verified, query.available);
    let listings = blocking_db(&state, move |db| db.list_influencers(verified, available)).await?;

    let mut cards: Vec<InfluencerCard> = listings
        .into_iter()
        .filter(|listing| matches(listing, &query))
        .map(to_card)
        .collect();
    // Stable sort keeps signup order among equal follower counts.
    cards.sort_by(|a, b| b.total_followers.cmp(&a.total_followers));
    Ok(Json(cards))
}
