use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use upfluence_db::models::{ApplyOutcome, CampaignScope, CampaignUpdate, NewCampaign};
use upfluence_types::api::{
    ApplyRequest, CreateCampaignRequest, ReviewApplicationRequest, SessionClaims,
    UpdateCampaignRequest,
};
use upfluence_types::models::{ApplicationStatus, Campaign, CampaignApplication, CampaignStatus, Role};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::require_role;
use crate::state::{AppState, blocking_db};

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn validate_new_campaign(brand_id: Uuid, req: CreateCampaignRequest) -> ApiResult<NewCampaign> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    let description = req.description.trim().to_string();
    if description.is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    if req.budget < 0 {
        return Err(ApiError::validation("Budget cannot be negative"));
    }
    if req.min_followers.is_some_and(|n| n < 0) || req.max_followers.is_some_and(|n| n < 0) {
        return Err(ApiError::validation("Follower bounds cannot be negative"));
    }
    if let (Some(min), Some(max)) = (req.min_followers, req.max_followers) {
        if min > max {
            return Err(ApiError::validation("min_followers cannot exceed max_followers"));
        }
    }
    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if start > end {
            return Err(ApiError::validation("start_date must not be after end_date"));
        }
    }

    Ok(NewCampaign {
        brand_id,
        title,
        description,
        category: req.category,
        budget: req.budget,
        requirements: trimmed(req.requirements),
        platforms: req.platforms,
        min_followers: req.min_followers,
        max_followers: req.max_followers,
        target_age: trimmed(req.target_age),
        target_gender: trimmed(req.target_gender),
        target_location: req.target_location,
        status: req.status.unwrap_or(CampaignStatus::Draft),
        start_date: req.start_date,
        end_date: req.end_date,
    })
}

pub fn validate_update(req: UpdateCampaignRequest) -> ApiResult<CampaignUpdate> {
    let title = req.title.map(|t| t.trim().to_string());
    if title.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::validation("Title cannot be empty"));
    }
    let description = req.description.map(|d| d.trim().to_string());
    if description.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::validation("Description cannot be empty"));
    }
    if req.budget.is_some_and(|b| b < 0) {
        return Err(ApiError::validation("Budget cannot be negative"));
    }

    Ok(CampaignUpdate {
        title,
        description,
        budget: req.budget,
        // A blank string clears the requirements.
        requirements: req.requirements.map(|r| trimmed(Some(r))),
        status: req.status,
    })
}

/// Whether the session may see a campaign at all. Hidden campaigns answer 404.
pub fn can_view(claims: &SessionClaims, campaign: &Campaign) -> bool {
    match claims.role {
        Role::Admin => true,
        Role::Brand => campaign.brand_id == claims.sub,
        Role::Influencer => campaign.status == CampaignStatus::Active,
    }
}

async fn load_campaign(state: &AppState, id: Uuid) -> ApiResult<Campaign> {
    blocking_db(state, move |db| db.get_campaign(id))
        .await?
        .ok_or(ApiError::NotFound("campaign"))
}

/// Loads a campaign owned by the calling brand. Other brands' campaigns are
/// reported as missing.
async fn load_owned_campaign(state: &AppState, claims: &SessionClaims, id: Uuid) -> ApiResult<Campaign> {
    require_role(claims, &[Role::Brand])?;
    let campaign = load_campaign(state, id).await?;
    if campaign.brand_id != claims.sub {
        return Err(ApiError::NotFound("campaign"));
    }
    Ok(campaign)
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(req): ApiJson<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    require_role(&claims, &[Role::Brand])?;
    let campaign = validate_new_campaign(claims.sub, req)?;

    let created = blocking_db(&state, move |db| db.create_campaign(&campaign)).await?;
    info!(campaign_id = %created.id, brand_id = %created.brand_id, "Campaign created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<Vec<Campaign>>> {
    let scope = match claims.role {
        Role::Brand => CampaignScope::OwnedBy(claims.sub),
        Role::Influencer => CampaignScope::WithStatus(CampaignStatus::Active),
        Role::Admin => CampaignScope::All,
    };
    let campaigns = blocking_db(&state, move |db| db.list_campaigns(scope)).await?;
    Ok(Json(campaigns))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Campaign>> {
    let campaign = load_campaign(&state, id).await?;
    if !can_view(&claims, &campaign) {
        return Err(ApiError::NotFound("campaign"));
    }
    Ok(Json(campaign))
}

pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateCampaignRequest>,
) -> ApiResult<Json<Campaign>> {
    let update = validate_update(req)?;
    load_owned_campaign(&state, &claims, id).await?;

    let updated = blocking_db(&state, move |db| db.update_campaign(id, &update))
        .await?
        .ok_or(ApiError::NotFound("campaign"))?;
    info!(campaign_id = %id, status = %updated.status, "Campaign updated");
    Ok(Json(updated))
}

pub async fn apply_to_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(campaign_id): Path<Uuid>,
    ApiJson(req): ApiJson<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&claims, &[Role::Influencer])?;

    let campaign = load_campaign(&state, campaign_id).await?;
    if campaign.status != CampaignStatus::Active {
        return Err(ApiError::validation("Campaign is not accepting applications"));
    }

    let user_id = claims.sub;
    let message = trimmed(req.message);
    let outcome = blocking_db(&state, move |db| {
        let Some(profile_id) = db.influencer_profile_id(user_id)? else {
            return Ok(None);
        };
        db.apply_to_campaign(campaign_id, profile_id, message.as_deref()).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("influencer profile"))?;

    match outcome {
        ApplyOutcome::Applied(application_id) => {
            info!(%campaign_id, %application_id, "Application submitted");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "application_id": application_id,
                    "campaign_id": campaign_id,
                    "status": ApplicationStatus::Pending,
                })),
            ))
        }
        ApplyOutcome::AlreadyApplied => Err(ApiError::Conflict("Already applied to this campaign".into())),
    }
}

pub async fn list_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(campaign_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CampaignApplication>>> {
    require_role(&claims, &[Role::Brand, Role::Admin])?;
    let campaign = load_campaign(&state, campaign_id).await?;
    if claims.role == Role::Brand && campaign.brand_id != claims.sub {
        return Err(ApiError::NotFound("campaign"));
    }

    let applications = blocking_db(&state, move |db| db.list_applications(campaign_id)).await?;
    Ok(Json(applications))
}

pub async fn review_application(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path((campaign_id, application_id)): Path<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<ReviewApplicationRequest>,
) -> ApiResult<Json<CampaignApplication>> {
    if req.status == ApplicationStatus::Pending {
        return Err(ApiError::validation("Status must be ACCEPTED or REJECTED"));
    }
    load_owned_campaign(&state, &claims, campaign_id).await?;

    let status = req.status;
    let application = blocking_db(&state, move |db| {
        db.set_application_status(campaign_id, application_id, status)
    })
    .await?
    .ok_or(ApiError::NotFound("application"))?;
    info!(%campaign_id, %application_id, %status, "Application reviewed");
    Ok(Json(application))
}
