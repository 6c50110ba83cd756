//! Row types and write inputs. Rows are decoded into typed values at the
//! query boundary so callers never see raw TEXT columns.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use upfluence_types::api::Principal;
use upfluence_types::models::{
    ApplicationStatus, CampaignStatus, InfluencerProfile, MessageStatus, ParseEnumError,
    PlanType, Role, SocialPlatform, Subscription, User,
};

/// A user row including the password hash. Never serialised.
pub struct UserRow {
    pub user: User,
    pub password: String,
}

/// Everything the login path needs about one user.
pub struct AccountRow {
    pub user: User,
    pub password: String,
    pub subscription: Subscription,
    pub influencer_profile: Option<InfluencerProfile>,
}

impl AccountRow {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user.id,
            email: self.user.email.clone(),
            name: self.user.name.clone(),
            role: self.user.role,
            company: self.user.company.clone(),
            subscription: self.subscription.clone(),
            influencer_profile: self.influencer_profile.clone(),
        }
    }
}

/// A profile together with its owning user, as listed by search.
pub struct InfluencerListing {
    pub user: User,
    pub profile: InfluencerProfile,
}

/// Outcome of [`crate::Database::create_account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAccount {
    Created(Uuid),
    EmailTaken,
}

pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub plan_type: PlanType,
    pub influencer_profile: Option<NewInfluencerProfile>,
}

pub struct NewInfluencerProfile {
    pub bio: String,
    pub location: Option<String>,
    pub category: Vec<String>,
    pub languages: Vec<String>,
    pub rate: Option<i64>,
    pub is_verified: bool,
    pub is_available: bool,
    pub profile_completed: bool,
    pub social_profiles: Vec<NewSocialProfile>,
}

impl NewInfluencerProfile {
    /// The empty profile every newly registered influencer starts with.
    pub fn blank() -> Self {
        Self {
            bio: String::new(),
            location: None,
            category: Vec::new(),
            languages: vec!["English".to_string()],
            rate: None,
            is_verified: false,
            is_available: true,
            profile_completed: false,
            social_profiles: Vec::new(),
        }
    }
}

pub struct NewSocialProfile {
    pub platform: SocialPlatform,
    pub username: String,
    pub url: Option<String>,
    pub followers_count: i64,
    pub engagement_rate: f64,
    pub avg_likes: i64,
    pub avg_comments: i64,
    pub is_verified: bool,
}

pub struct InfluencerProfileUpdate {
    pub bio: String,
    pub location: Option<String>,
    pub category: Vec<String>,
    pub languages: Vec<String>,
    pub rate: Option<i64>,
    pub is_available: Option<bool>,
    pub profile_completed: bool,
}

pub struct NewCampaign {
    pub brand_id: Uuid,
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
    pub status: CampaignStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Default)]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i64>,
    /// `None` leaves the column alone, `Some(None)` clears it.
    pub requirements: Option<Option<String>>,
    pub status: Option<CampaignStatus>,
}

/// Which campaigns a listing should include.
#[derive(Debug, Clone, Copy)]
pub enum CampaignScope {
    OwnedBy(Uuid),
    WithStatus(CampaignStatus),
    All,
}

/// Outcome of [`crate::Database::apply_to_campaign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(Uuid),
    AlreadyApplied,
}

pub struct NewMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
}

/// A message joined with the display name of the other party.
pub struct MessageRow {
    pub message: upfluence_types::models::Message,
    pub counterpart_name: String,
}

pub struct ApplicationSeed {
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub status: ApplicationStatus,
    pub message: Option<String>,
}

// -- Column decoding --

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn col_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

pub(crate) fn col_opt_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| s.parse::<Uuid>().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn col_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

/// JSON array columns (categories, languages, platforms, locations).
pub(crate) fn col_list<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<T>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn col_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn col_opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| s.parse::<NaiveDate>().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    raw.parse::<DateTime<Utc>>().or_else(|_| {
        // Plain SQLite datetime() output carries no timezone.
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
    })
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_with_or_without_zone() {
        let a = parse_timestamp("2024-07-01T10:20:30.123Z").unwrap();
        let b = parse_timestamp("2024-07-01 10:20:30").unwrap();
        assert_eq!(a.timestamp(), b.timestamp());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn blank_profile_defaults() {
        let profile = NewInfluencerProfile::blank();
        assert!(profile.bio.is_empty());
        assert!(profile.category.is_empty());
        assert_eq!(profile.languages, vec!["English".to_string()]);
        assert!(profile.is_available);
        assert!(!profile.profile_completed);
    }
}
