use crate::Database;
use crate::models::{
    ApplyOutcome, CampaignScope, CampaignUpdate, NewCampaign, col_enum,
    col_list, col_opt_date, col_timestamp, col_uuid, to_json,
};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use uuid::Uuid;

use upfluence_types::models::{ApplicationStatus, Campaign, CampaignApplication, CampaignStatus};

const CAMPAIGN_COLUMNS: &str = "id, brand_id, title, description, category, budget, requirements, platforms, \
     min_followers, max_followers, target_age, target_gender, target_location, status, \
     start_date, end_date, created_at";

impl Database {
    pub fn create_campaign(&self, campaign: &NewCampaign) -> Result<Campaign> {
        self.with_conn_mut(|conn| insert_campaign(conn, campaign))
    }

    pub fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>> {
        self.with_conn(|conn| query_campaign(conn, id))
    }

    pub fn list_campaigns(&self, scope: CampaignScope) -> Result<Vec<Campaign>> {
        self.with_conn(|conn| {
            let (filter, arg) = match scope {
                CampaignScope::OwnedBy(brand_id) => ("WHERE brand_id = ?1", Some(brand_id.to_string())),
                CampaignScope::WithStatus(status) => ("WHERE status = ?1", Some(status.as_str().to_string())),
                CampaignScope::All => ("", None),
            };
            let sql = format!(
                "SELECT {CAMPAIGN_COLUMNS} FROM campaigns {filter} ORDER BY created_at DESC, rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = match arg {
                Some(arg) => stmt.query_map([arg], map_campaign_row)?,
                None => stmt.query_map([], map_campaign_row)?,
            }
            .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Applies the fields present in `update`; `requirements: Some(None)` clears the
    /// column. Returns `None` if the campaign is gone.
    pub fn update_campaign(&self, id: Uuid, update: &CampaignUpdate) -> Result<Option<Campaign>> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE campaigns SET
                    title = COALESCE(?1, title),
                    description = COALESCE(?2, description),
                    budget = COALESCE(?3, budget),
                    requirements = CASE WHEN ?4 THEN ?5 ELSE requirements END,
                    status = COALESCE(?6, status)
                 WHERE id = ?7",
                params![
                    update.title,
                    update.description,
                    update.budget,
                    update.requirements.is_some(),
                    update.requirements.as_ref().and_then(|r| r.as_deref()),
                    update.status.map(|s| s.as_str()),
                    id.to_string(),
                ],
            )?;
            query_campaign(conn, id)
        })
    }

    // -- Applications --

    pub fn apply_to_campaign(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
        message: Option<&str>,
    ) -> Result<ApplyOutcome> {
        self.with_conn_mut(|conn| {
            insert_application(conn, campaign_id, influencer_id, ApplicationStatus::Pending, message)
        })
    }

    pub fn list_applications(&self, campaign_id: Uuid) -> Result<Vec<CampaignApplication>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT ci.id, ci.campaign_id, ci.influencer_id, u.name, ci.status, ci.message, ci.created_at
                 FROM campaign_influencers ci
                 JOIN influencer_profiles p ON p.id = ci.influencer_id
                 JOIN users u ON u.id = p.user_id
                 WHERE ci.campaign_id = ?1
                 ORDER BY ci.created_at ASC, ci.rowid ASC",
            )?;
            let rows = stmt
                .query_map([campaign_id.to_string()], map_application_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Sets the status of an application belonging to `campaign_id`.
    /// Returns `None` when no such application exists on that campaign.
    pub fn set_application_status(
        &self,
        campaign_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<CampaignApplication>> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE campaign_influencers SET status = ?1 WHERE id = ?2 AND campaign_id = ?3",
                params![status.as_str(), application_id.to_string(), campaign_id.to_string()],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let row = conn
                .query_row(
                    "SELECT ci.id, ci.campaign_id, ci.influencer_id, u.name, ci.status, ci.message, ci.created_at
                     FROM campaign_influencers ci
                     JOIN influencer_profiles p ON p.id = ci.influencer_id
                     JOIN users u ON u.id = p.user_id
                     WHERE ci.id = ?1",
                    [application_id.to_string()],
                    map_application_row,
                )
                .optional()?;
            Ok(row)
        })
    }
}

pub(crate) fn insert_campaign(conn: &Connection, campaign: &NewCampaign) -> Result<Campaign> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO campaigns
            (id, brand_id, title, description, category, budget, requirements, platforms,
             min_followers, max_followers, target_age, target_gender, target_location,
             status, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            id.to_string(),
            campaign.brand_id.to_string(),
            campaign.title,
            campaign.description,
            to_json(&campaign.category)?,
            campaign.budget,
            campaign.requirements,
            to_json(&campaign.platforms)?,
            campaign.min_followers,
            campaign.max_followers,
            campaign.target_age,
            campaign.target_gender,
            to_json(&campaign.target_location)?,
            campaign.status.as_str(),
            campaign.start_date.map(|d| d.to_string()),
            campaign.end_date.map(|d| d.to_string()),
        ],
    )?;
    query_campaign(conn, id)?.ok_or_else(|| anyhow::anyhow!("Campaign {} vanished after insert", id))
}

pub(crate) fn insert_application(
    conn: &Connection,
    campaign_id: Uuid,
    influencer_id: Uuid,
    status: ApplicationStatus,
    message: Option<&str>,
) -> Result<ApplyOutcome> {
    let id = Uuid::new_v4();
    let inserted = conn.execute(
        "INSERT INTO campaign_influencers (id, campaign_id, influencer_id, status, message)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id.to_string(),
            campaign_id.to_string(),
            influencer_id.to_string(),
            status.as_str(),
            message,
        ],
    );
    match inserted {
        Ok(_) => Ok(ApplyOutcome::Applied(id)),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Ok(ApplyOutcome::AlreadyApplied)
        }
        Err(rusqlite::Error::SqliteFailure(e, msg)) if e.code == ErrorCode::ConstraintViolation => {
            anyhow::bail!(
                "Application references a missing campaign or profile: {}",
                msg.unwrap_or_default()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn query_campaign(conn: &Connection, id: Uuid) -> Result<Option<Campaign>> {
    let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = ?1");
    Ok(conn.query_row(&sql, [id.to_string()], map_campaign_row).optional()?)
}

fn map_campaign_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: col_uuid(row, 0)?,
        brand_id: col_uuid(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: col_list(row, 4)?,
        budget: row.get(5)?,
        requirements: row.get(6)?,
        platforms: col_list(row, 7)?,
        min_followers: row.get(8)?,
        max_followers: row.get(9)?,
        target_age: row.get(10)?,
        target_gender: row.get(11)?,
        target_location: col_list(row, 12)?,
        status: col_enum::<CampaignStatus>(row, 13)?,
        start_date: col_opt_date(row, 14)?,
        end_date: col_opt_date(row, 15)?,
        created_at: col_timestamp(row, 16)?,
    })
}

fn map_application_row(row: &Row<'_>) -> rusqlite::Result<CampaignApplication> {
    Ok(CampaignApplication {
        id: col_uuid(row, 0)?,
        campaign_id: col_uuid(row, 1)?,
        influencer_id: col_uuid(row, 2)?,
        influencer_name: row.get(3)?,
        status: col_enum(row, 4)?,
        message: row.get(5)?,
        created_at: col_timestamp(row, 6)?,
    })
}
