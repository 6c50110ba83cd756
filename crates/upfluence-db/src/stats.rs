//! Aggregate queries backing the role dashboards.

use crate::Database;
use crate::models::{col_enum, col_list, col_opt_date, col_timestamp, col_uuid};
use anyhow::Result;
use rusqlite::params;
use uuid::Uuid;

use upfluence_types::api::{
    AdminStats, BrandStats, CampaignSummary, InfluencerCampaign, InfluencerStats, Opportunity,
    RecentSignup,
};

/// Raw inbox entry; the API layer trims the content into a preview.
pub struct InboxEntry {
    pub id: Uuid,
    pub sender_name: String,
    pub subject: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Database {
    // -- Brand --

    pub fn brand_stats(&self, brand_id: Uuid) -> Result<BrandStats> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM campaigns WHERE brand_id = ?1),
                    (SELECT COUNT(*) FROM campaigns WHERE brand_id = ?1 AND status = 'ACTIVE'),
                    (SELECT COUNT(DISTINCT ci.influencer_id)
                       FROM campaign_influencers ci
                       JOIN campaigns c ON c.id = ci.campaign_id
                      WHERE c.brand_id = ?1 AND ci.status = 'ACCEPTED'),
                    (SELECT COALESCE(SUM(budget), 0) FROM campaigns
                      WHERE brand_id = ?1 AND status IN ('ACTIVE', 'COMPLETED')),
                    (SELECT COUNT(*) FROM messages WHERE receiver_id = ?1),
                    (SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND status = 'SENT')",
                [brand_id.to_string()],
                |row| {
                    Ok(BrandStats {
                        total_campaigns: row.get(0)?,
                        active_campaigns: row.get(1)?,
                        total_influencers: row.get(2)?,
                        committed_budget: row.get(3)?,
                        messages_received: row.get(4)?,
                        unread_messages: row.get(5)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    pub fn brand_recent_campaigns(&self, brand_id: Uuid, limit: u32) -> Result<Vec<CampaignSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title, c.status, c.budget, c.created_at,
                        (SELECT COUNT(*) FROM campaign_influencers ci
                          WHERE ci.campaign_id = c.id AND ci.status = 'ACCEPTED')
                 FROM campaigns c
                 WHERE c.brand_id = ?1
                 ORDER BY c.created_at DESC, c.rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![brand_id.to_string(), limit], |row| {
                    Ok(CampaignSummary {
                        id: col_uuid(row, 0)?,
                        title: row.get(1)?,
                        status: col_enum(row, 2)?,
                        budget: row.get(3)?,
                        created_at: col_timestamp(row, 4)?,
                        influencer_count: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn recent_inbox(&self, user_id: Uuid, limit: u32) -> Result<Vec<InboxEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, u.name, m.subject, m.content, m.status = 'READ', m.created_at
                 FROM messages m
                 JOIN users u ON u.id = m.sender_id
                 WHERE m.receiver_id = ?1
                 ORDER BY m.created_at DESC, m.rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![user_id.to_string(), limit], |row| {
                    Ok(InboxEntry {
                        id: col_uuid(row, 0)?,
                        sender_name: row.get(1)?,
                        subject: row.get(2)?,
                        content: row.get(3)?,
                        is_read: row.get(4)?,
                        created_at: col_timestamp(row, 5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Influencer --

    pub fn influencer_stats(&self, user_id: Uuid, profile_id: Uuid) -> Result<InfluencerStats> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COALESCE(SUM(followers_count), 0) FROM social_profiles WHERE influencer_id = ?1),
                    (SELECT COALESCE(AVG(engagement_rate), 0.0) FROM social_profiles WHERE influencer_id = ?1),
                    (SELECT COUNT(*) FROM campaign_influencers ci
                       JOIN campaigns c ON c.id = ci.campaign_id
                      WHERE ci.influencer_id = ?1 AND ci.status = 'ACCEPTED' AND c.status = 'ACTIVE'),
                    (SELECT COUNT(*) FROM campaign_influencers WHERE influencer_id = ?1 AND status = 'PENDING'),
                    (SELECT COUNT(*) FROM messages WHERE receiver_id = ?2 AND status = 'SENT')",
                params![profile_id.to_string(), user_id.to_string()],
                |row| {
                    let avg: f64 = row.get(1)?;
                    Ok(InfluencerStats {
                        total_followers: row.get(0)?,
                        avg_engagement: (avg * 10.0).round() / 10.0,
                        active_campaigns: row.get(2)?,
                        pending_applications: row.get(3)?,
                        unread_messages: row.get(4)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    pub fn influencer_campaigns(&self, profile_id: Uuid) -> Result<Vec<InfluencerCampaign>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title, COALESCE(u.company, u.name), c.status, ci.status, c.budget, c.end_date
                 FROM campaign_influencers ci
                 JOIN campaigns c ON c.id = ci.campaign_id
                 JOIN users u ON u.id = c.brand_id
                 WHERE ci.influencer_id = ?1
                 ORDER BY ci.created_at DESC, ci.rowid DESC",
            )?;
            let rows = stmt
                .query_map([profile_id.to_string()], |row| {
                    Ok(InfluencerCampaign {
                        campaign_id: col_uuid(row, 0)?,
                        title: row.get(1)?,
                        brand_name: row.get(2)?,
                        campaign_status: col_enum(row, 3)?,
                        application_status: col_enum(row, 4)?,
                        budget: row.get(5)?,
                        deadline: col_opt_date(row, 6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Active campaigns the influencer has not applied to yet.
    pub fn opportunities(&self, profile_id: Uuid, limit: u32) -> Result<Vec<Opportunity>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title, COALESCE(u.company, u.name), c.budget, c.category, c.requirements, c.end_date,
                        (SELECT COUNT(*) FROM campaign_influencers x WHERE x.campaign_id = c.id)
                 FROM campaigns c
                 JOIN users u ON u.id = c.brand_id
                 WHERE c.status = 'ACTIVE'
                   AND NOT EXISTS (SELECT 1 FROM campaign_influencers ci
                                    WHERE ci.campaign_id = c.id AND ci.influencer_id = ?1)
                 ORDER BY c.created_at DESC, c.rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![profile_id.to_string(), limit], |row| {
                    Ok(Opportunity {
                        campaign_id: col_uuid(row, 0)?,
                        title: row.get(1)?,
                        brand_name: row.get(2)?,
                        budget: row.get(3)?,
                        category: col_list(row, 4)?,
                        requirements: row.get(5)?,
                        deadline: col_opt_date(row, 6)?,
                        applicants: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Admin --

    pub fn admin_stats(&self) -> Result<AdminStats> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM users WHERE role = 'BRAND'),
                    (SELECT COUNT(*) FROM users WHERE role = 'INFLUENCER'),
                    (SELECT COUNT(*) FROM campaigns WHERE status = 'ACTIVE'),
                    (SELECT COUNT(*) FROM campaign_influencers WHERE status = 'PENDING'),
                    (SELECT COUNT(*) FROM messages)",
                [],
                |row| {
                    Ok(AdminStats {
                        total_users: row.get(0)?,
                        total_brands: row.get(1)?,
                        total_influencers: row.get(2)?,
                        active_campaigns: row.get(3)?,
                        pending_applications: row.get(4)?,
                        messages_sent: row.get(5)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    pub fn recent_signups(&self, limit: u32) -> Result<Vec<RecentSignup>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name, u.email, u.role, s.plan_type, u.created_at
                 FROM users u
                 JOIN subscriptions s ON s.user_id = u.id
                 ORDER BY u.created_at DESC, u.rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(RecentSignup {
                        id: col_uuid(row, 0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        role: col_enum(row, 3)?,
                        plan_type: col_enum(row, 4)?,
                        created_at: col_timestamp(row, 5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
