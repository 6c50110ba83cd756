use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned when a stored or submitted enum value is not one we know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Closed string enums stored as upper-case TEXT and sent over the wire the same way.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(
    /// Determines which dashboard a user lands on and what they may touch.
    Role, "role" {
        Brand => "BRAND",
        Influencer => "INFLUENCER",
        Admin => "ADMIN",
    }
);

string_enum!(PlanType, "plan type" {
    Free => "FREE",
    Pro => "PRO",
    Agency => "AGENCY",
});

string_enum!(SubscriptionStatus, "subscription status" {
    Active => "ACTIVE",
    Canceled => "CANCELED",
    PastDue => "PAST_DUE",
});

string_enum!(SocialPlatform, "platform" {
    Instagram => "INSTAGRAM",
    Youtube => "YOUTUBE",
    Tiktok => "TIKTOK",
    Twitter => "TWITTER",
    Facebook => "FACEBOOK",
});

string_enum!(CampaignStatus, "campaign status" {
    Draft => "DRAFT",
    Active => "ACTIVE",
    Paused => "PAUSED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

string_enum!(
    /// State of an influencer's application to a campaign.
    ApplicationStatus, "application status" {
        Pending => "PENDING",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
    }
);

string_enum!(MessageStatus, "message status" {
    Sent => "SENT",
    Read => "READ",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub id: Uuid,
    pub platform: SocialPlatform,
    pub username: String,
    pub url: Option<String>,
    pub followers_count: i64,
    pub engagement_rate: f64,
    pub avg_likes: i64,
    pub avg_comments: i64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerProfile {
    pub id: Uuid,
    pub bio: String,
    pub location: Option<String>,
    pub category: Vec<String>,
    pub languages: Vec<String>,
    pub rate: Option<i64>,
    pub is_verified: bool,
    pub is_available: bool,
    pub profile_completed: bool,
    pub social_profiles: Vec<SocialProfile>,
}

impl InfluencerProfile {
    pub fn total_followers(&self) -> i64 {
        self.social_profiles.iter().map(|s| s.followers_count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
}

/// An influencer's application to a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignApplication {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub influencer_name: String,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "SUPERUSER".parse::<Role>().unwrap_err();
        assert_eq!(err.kind, "role");
        assert_eq!(err.to_string(), "unknown role 'SUPERUSER'");
        assert!("brand".parse::<Role>().is_err());
    }

    #[test]
    fn enums_serialize_upper_case() {
        assert_eq!(serde_json::to_string(&Role::Influencer).unwrap(), "\"INFLUENCER\"");
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::PastDue).unwrap(),
            "\"PAST_DUE\""
        );
        let status: CampaignStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, CampaignStatus::Completed);
    }

    #[test]
    fn total_followers_sums_every_platform() {
        let social = |platform, followers_count| SocialProfile {
            id: Uuid::new_v4(),
            platform,
            username: "handle".into(),
            url: None,
            followers_count,
            engagement_rate: 1.0,
            avg_likes: 0,
            avg_comments: 0,
            is_verified: false,
        };
        let profile = InfluencerProfile {
            id: Uuid::new_v4(),
            bio: String::new(),
            location: None,
            category: vec![],
            languages: vec!["English".into()],
            rate: None,
            is_verified: false,
            is_available: true,
            profile_completed: false,
            social_profiles: vec![
                social(SocialPlatform::Instagram, 125_000),
                social(SocialPlatform::Youtube, 45_000),
            ],
        };
        assert_eq!(profile.total_followers(), 170_000);
    }
}
