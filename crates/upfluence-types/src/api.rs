use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ApplicationStatus, CampaignStatus, InfluencerProfile, MessageStatus, PlanType, Role,
    SocialPlatform, Subscription,
};

// -- Session --

/// Bumped whenever the shape of [`SessionClaims`] changes. Tokens minted under
/// another version are treated as unauthenticated.
pub const SESSION_SCHEMA_VERSION: u16 = 2;

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company: Option<String>,
    pub subscription: Subscription,
    pub influencer_profile: Option<InfluencerProfile>,
}

/// What a session remembers about an influencer profile. The full profile is
/// loaded from the database when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub id: Uuid,
    pub profile_completed: bool,
}

/// Session token payload. Issued at login and decoded verbatim on every request,
/// so both sides share this one definition. Travels in a cookie, so it only
/// holds bounded fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub ver: u16,
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company: Option<String>,
    pub subscription: Subscription,
    pub influencer_profile: Option<SessionProfile>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(principal: &Principal, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            ver: SESSION_SCHEMA_VERSION,
            sub: principal.id,
            email: principal.email.clone(),
            name: principal.name.clone(),
            role: principal.role,
            company: principal.company.clone(),
            subscription: principal.subscription.clone(),
            influencer_profile: principal.influencer_profile.as_ref().map(|p| SessionProfile {
                id: p.id,
                profile_completed: p.profile_completed,
            }),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

// -- Auth --

/// Fields default to empty so missing values surface as validation errors
/// rather than body rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub company: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Principal,
}

// -- Dashboards --

#[derive(Debug, Serialize, Deserialize)]
pub struct BrandStats {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_influencers: i64,
    pub committed_budget: i64,
    pub messages_received: i64,
    pub unread_messages: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: Uuid,
    pub title: String,
    pub status: CampaignStatus,
    pub influencer_count: i64,
    pub budget: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagePreview {
    pub id: Uuid,
    pub sender_name: String,
    pub subject: String,
    pub preview: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BrandDashboard {
    pub stats: BrandStats,
    pub recent_campaigns: Vec<CampaignSummary>,
    pub recent_messages: Vec<MessagePreview>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfluencerStats {
    pub total_followers: i64,
    pub avg_engagement: f64,
    pub active_campaigns: i64,
    pub pending_applications: i64,
    pub unread_messages: i64,
}

/// A campaign the influencer has applied to.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfluencerCampaign {
    pub campaign_id: Uuid,
    pub title: String,
    pub brand_name: String,
    pub campaign_status: CampaignStatus,
    pub application_status: ApplicationStatus,
    pub budget: i64,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Opportunity {
    pub campaign_id: Uuid,
    pub title: String,
    pub brand_name: String,
    pub budget: i64,
    pub category: Vec<String>,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub applicants: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfluencerDashboard {
    pub stats: InfluencerStats,
    pub campaigns: Vec<InfluencerCampaign>,
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_brands: i64,
    pub total_influencers: i64,
    pub active_campaigns: i64,
    pub pending_applications: i64,
    pub messages_sent: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentSignup {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub plan_type: PlanType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub recent_signups: Vec<RecentSignup>,
}

// -- Search --

#[derive(Debug, Default, Clone, Deserialize)]
pub struct InfluencerSearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub platform: Option<SocialPlatform>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    #[serde(default)]
    pub verified: bool,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    pub platform: SocialPlatform,
    pub followers: i64,
    pub engagement: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub location: Option<String>,
    pub categories: Vec<String>,
    pub rate: Option<i64>,
    pub is_verified: bool,
    pub is_available: bool,
    pub total_followers: i64,
    pub platforms: Vec<PlatformStats>,
}

// -- Campaigns --

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateCampaignRequest {
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub budget: i64,
    pub requirements: Option<String>,
    pub platforms: Vec<SocialPlatform>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub target_age: Option<String>,
    pub target_gender: Option<String>,
    pub target_location: Vec<String>,
    pub status: Option<CampaignStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i64>,
    pub requirements: Option<String>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplyRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewApplicationRequest {
    pub status: ApplicationStatus,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFolder {
    #[default]
    Inbox,
    Sent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    /// Name of the other party: the sender for inbox, the receiver for sent.
    pub counterpart_name: String,
    pub campaign_id: Option<Uuid>,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

// -- Profile --

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateInfluencerProfileRequest {
    pub bio: String,
    pub location: Option<String>,
    pub category: Vec<String>,
    pub languages: Vec<String>,
    pub rate: Option<i64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddSocialProfileRequest {
    pub platform: SocialPlatform,
    pub username: String,
    pub url: Option<String>,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub avg_likes: i64,
    #[serde(default)]
    pub avg_comments: i64,
}

// -- Diagnostics --

#[derive(Debug, Serialize, Deserialize)]
pub struct DbDiagnostics {
    pub status: String,
    pub database: String,
    pub user_count: Option<i64>,
    pub test_user: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnvDiagnostics {
    pub status: String,
    pub environment: String,
    pub db_path_set: bool,
    pub jwt_secret_set: bool,
    pub static_dir_set: bool,
}
