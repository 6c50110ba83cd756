use std::collections::HashMap;

use crate::Database;
use crate::models::{InfluencerListing, UserRow, col_enum, col_uuid};
use crate::queries::{USER_COLUMNS, map_profile_columns, map_user_row};
use anyhow::Result;
use rusqlite::Connection;
use uuid::Uuid;

use upfluence_types::models::SocialProfile;

impl Database {
    /// Loads influencer profiles with their users and social accounts.
    /// Flag filters run in SQL; text and follower filters are left to the caller.
    pub fn list_influencers(
        &self,
        verified_only: bool,
        available: Option<bool>,
    ) -> Result<Vec<InfluencerListing>> {
        self.with_conn(|conn| {
            let user_columns = USER_COLUMNS
                .split(", ")
                .map(|c| format!("u.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {user_columns},
                        p.id, p.bio, p.location, p.category, p.languages, p.rate,
                        p.is_verified, p.is_available, p.profile_completed
                 FROM influencer_profiles p
                 JOIN users u ON u.id = p.user_id
                 WHERE (?1 = 0 OR p.is_verified = 1)
                   AND (?2 IS NULL OR p.is_available = ?2)
                 ORDER BY u.created_at ASC, u.rowid ASC"
            );

            let mut stmt = conn.prepare(&sql)?;
            let mut listings = stmt
                .query_map(rusqlite::params![verified_only, available], |row| {
                    let UserRow { user, .. } = map_user_row(row)?;
                    let profile = map_profile_columns(row, 10)?;
                    Ok(InfluencerListing { user, profile })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut socials = query_socials_for_listing(conn, verified_only, available)?;
            for listing in &mut listings {
                listing.profile.social_profiles = socials.remove(&listing.profile.id).unwrap_or_default();
            }
            Ok(listings)
        })
    }
}

/// Social profiles for every influencer the listing query selects, grouped by
/// profile. Shares the listing's flag predicates so the two stay in step.
fn query_socials_for_listing(
    conn: &Connection,
    verified_only: bool,
    available: Option<bool>,
) -> Result<HashMap<Uuid, Vec<SocialProfile>>> {
    let mut stmt = conn.prepare(
        "SELECT s.influencer_id, s.id, s.platform, s.username, s.url, s.followers_count,
                s.engagement_rate, s.avg_likes, s.avg_comments, s.is_verified
         FROM social_profiles s
         JOIN influencer_profiles p ON p.id = s.influencer_id
         WHERE (?1 = 0 OR p.is_verified = 1)
           AND (?2 IS NULL OR p.is_available = ?2)
         ORDER BY s.followers_count DESC",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![verified_only, available], |row| {
            Ok((
                col_uuid(row, 0)?,
                SocialProfile {
                    id: col_uuid(row, 1)?,
                    platform: col_enum(row, 2)?,
                    username: row.get(3)?,
                    url: row.get(4)?,
                    followers_count: row.get(5)?,
                    engagement_rate: row.get(6)?,
                    avg_likes: row.get(7)?,
                    avg_comments: row.get(8)?,
                    is_verified: row.get(9)?,
                },
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut grouped: HashMap<Uuid, Vec<SocialProfile>> = HashMap::new();
    for (profile_id, social) in rows {
        grouped.entry(profile_id).or_default().push(social);
    }
    Ok(grouped)
}
