use axum::{Extension, Json, extract::State};

use upfluence_db::stats::InboxEntry;
use upfluence_types::api::{
    AdminDashboard, BrandDashboard, InfluencerDashboard, MessagePreview, SessionClaims,
};
use upfluence_types::models::Role;

use crate::error::{ApiError, ApiResult};
use crate::middleware::require_role;
use crate::state::{AppState, blocking_db};

pub const RECENT_LIMIT: u32 = 5;
pub const PREVIEW_CHARS: usize = 100;

/// Truncate on a char boundary, marking the cut with an ellipsis.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn to_preview(entry: InboxEntry) -> MessagePreview {
    MessagePreview {
        id: entry.id,
        sender_name: entry.sender_name,
        subject: entry.subject,
        preview: preview(&entry.content, PREVIEW_CHARS),
        is_read: entry.is_read,
        created_at: entry.created_at,
    }
}

pub async fn brand_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<BrandDashboard>> {
    require_role(&claims, &[Role::Brand])?;
    let brand_id = claims.sub;

    let dashboard = blocking_db(&state, move |db| {
        Ok(BrandDashboard {
            stats: db.brand_stats(brand_id)?,
            recent_campaigns: db.brand_recent_campaigns(brand_id, RECENT_LIMIT)?,
            recent_messages: db
                .recent_inbox(brand_id, RECENT_LIMIT)?
                .into_iter()
                .map(to_preview)
                .collect(),
        })
    })
    .await?;
    Ok(Json(dashboard))
}

pub async fn influencer_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<InfluencerDashboard>> {
    require_role(&claims, &[Role::Influencer])?;
    let user_id = claims.sub;

    let dashboard = blocking_db(&state, move |db| {
        let Some(profile_id) = db.influencer_profile_id(user_id)? else {
            return Ok(None);
        };
        Ok(Some(InfluencerDashboard {
            stats: db.influencer_stats(user_id, profile_id)?,
            campaigns: db.influencer_campaigns(profile_id)?,
            opportunities: db.opportunities(profile_id, RECENT_LIMIT)?,
        }))
    })
    .await?
    .ok_or(ApiError::NotFound("influencer profile"))?;
    Ok(Json(dashboard))
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<AdminDashboard>> {
    require_role(&claims, &[Role::Admin])?;

    let dashboard = blocking_db(&state, |db| {
        Ok(AdminDashboard {
            stats: db.admin_stats()?,
            recent_signups: db.recent_signups(RECENT_LIMIT)?,
        })
    })
    .await?;
    Ok(Json(dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(preview("Hi Sarah", PREVIEW_CHARS), "Hi Sarah");
        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact, PREVIEW_CHARS), exact);
    }

    #[test]
    fn long_content_is_cut_at_the_limit() {
        let long = "a".repeat(150);
        let cut = preview(&long, PREVIEW_CHARS);
        assert_eq!(cut.len(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn cuts_on_char_boundaries() {
        let text = "é".repeat(120);
        let cut = preview(&text, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
    }
}
