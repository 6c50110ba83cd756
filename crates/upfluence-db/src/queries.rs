use crate::Database;
use crate::models::{
    AccountRow, CreateAccount, InfluencerProfileUpdate, NewAccount, NewInfluencerProfile,
    NewSocialProfile, UserRow, col_enum, col_list, col_timestamp, col_uuid, to_json,
};
use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use tracing::debug;
use uuid::Uuid;

use upfluence_types::models::{
    InfluencerProfile, Role, SocialProfile, Subscription, SubscriptionStatus, User,
};

pub(crate) const USER_COLUMNS: &str =
    "id, email, password, name, role, avatar, company, website, description, created_at";

const PROFILE_COLUMNS: &str = "id, bio, location, category, languages, rate, is_verified, is_available, profile_completed";

const SOCIAL_COLUMNS: &str = "id, platform, username, url, followers_count, engagement_rate, avg_likes, avg_comments, is_verified";

impl Database {
    // -- Accounts --

    /// Creates the user, its subscription and, for influencers, the profile in
    /// one transaction. Nothing is written when any step fails.
    pub fn create_account(&self, account: &NewAccount) -> Result<CreateAccount> {
        self.with_tx(|tx| insert_account(tx, account))
    }

    pub fn find_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
            let user = conn.query_row(&sql, [email], map_user_row).optional()?;
            user.map(|u| load_account(conn, u)).transpose()
        })
    }

    pub fn find_account_by_id(&self, id: Uuid) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
            let user = conn
                .query_row(&sql, [id.to_string()], map_user_row)
                .optional()?;
            user.map(|u| load_account(conn, u)).transpose()
        })
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
            let row = conn
                .query_row(&sql, [id.to_string()], map_user_row)
                .optional()?;
            Ok(row.map(|r| r.user))
        })
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?))
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                [email],
                |r| r.get(0),
            )?)
        })
    }

    // -- Influencer profiles --

    pub fn influencer_profile_id(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        self.with_conn(|conn| query_profile_id(conn, user_id))
    }

    pub fn get_influencer_profile(&self, user_id: Uuid) -> Result<Option<InfluencerProfile>> {
        self.with_conn(|conn| query_influencer_profile(conn, user_id))
    }

    /// Returns `None` when the user has no influencer profile.
    pub fn update_influencer_profile(
        &self,
        user_id: Uuid,
        update: &InfluencerProfileUpdate,
    ) -> Result<Option<InfluencerProfile>> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE influencer_profiles
                 SET bio = ?1, location = ?2, category = ?3, languages = ?4, rate = ?5,
                     is_available = COALESCE(?6, is_available), profile_completed = ?7
                 WHERE user_id = ?8",
                params![
                    update.bio,
                    update.location,
                    to_json(&update.category)?,
                    to_json(&update.languages)?,
                    update.rate,
                    update.is_available,
                    update.profile_completed,
                    user_id.to_string(),
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_influencer_profile(conn, user_id)
        })
    }

    /// Adds a social account to the user's profile, replacing any existing
    /// entry for the same platform. Returns `None` when the user has no profile.
    pub fn upsert_social_profile(
        &self,
        user_id: Uuid,
        social: &NewSocialProfile,
    ) -> Result<Option<SocialProfile>> {
        self.with_conn_mut(|conn| {
            let Some(profile_id) = query_profile_id(conn, user_id)? else {
                return Ok(None);
            };
            insert_social_profile(conn, profile_id, social, true)?;

            let sql = format!(
                "SELECT {SOCIAL_COLUMNS} FROM social_profiles WHERE influencer_id = ?1 AND platform = ?2"
            );
            let row = conn.query_row(
                &sql,
                params![profile_id.to_string(), social.platform.as_str()],
                map_social_row,
            )?;
            Ok(Some(row))
        })
    }
}

/// Empties every table, children first.
pub(crate) fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM campaign_influencers;
         DELETE FROM messages;
         DELETE FROM campaigns;
         DELETE FROM social_profiles;
         DELETE FROM influencer_profiles;
         DELETE FROM subscriptions;
         DELETE FROM users;",
    )?;
    Ok(())
}

pub(crate) fn insert_account(conn: &Connection, account: &NewAccount) -> Result<CreateAccount> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        [&account.email],
        |r| r.get(0),
    )?;
    if taken {
        return Ok(CreateAccount::EmailTaken);
    }

    let user_id = Uuid::new_v4();
    let inserted = conn.execute(
        "INSERT INTO users (id, email, password, name, role, avatar, company, website, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id.to_string(),
            account.email,
            account.password_hash,
            account.name,
            account.role.as_str(),
            account.avatar,
            account.company,
            account.website,
            account.description,
        ],
    );
    match inserted {
        Ok(_) => {}
        // Lost a race with a concurrent registration for the same email
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Ok(CreateAccount::EmailTaken);
        }
        Err(e) => return Err(e.into()),
    }

    conn.execute(
        "INSERT INTO subscriptions (id, user_id, plan_type, status) VALUES (?1, ?2, ?3, ?4)",
        params![
            Uuid::new_v4().to_string(),
            user_id.to_string(),
            account.plan_type.as_str(),
            SubscriptionStatus::Active.as_str(),
        ],
    )?;

    match (account.role, &account.influencer_profile) {
        (Role::Influencer, Some(profile)) => insert_influencer_profile(conn, user_id, profile)?,
        (Role::Influencer, None) => {
            insert_influencer_profile(conn, user_id, &NewInfluencerProfile::blank())?
        }
        (role, Some(_)) => bail!("{} accounts cannot carry an influencer profile", role),
        (_, None) => {}
    }

    debug!(user_id = %user_id, role = %account.role, "Account created");
    Ok(CreateAccount::Created(user_id))
}

fn insert_influencer_profile(
    conn: &Connection,
    user_id: Uuid,
    profile: &NewInfluencerProfile,
) -> Result<()> {
    let profile_id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO influencer_profiles
            (id, user_id, bio, location, category, languages, rate, is_verified, is_available, profile_completed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            profile_id.to_string(),
            user_id.to_string(),
            profile.bio,
            profile.location,
            to_json(&profile.category)?,
            to_json(&profile.languages)?,
            profile.rate,
            profile.is_verified,
            profile.is_available,
            profile.profile_completed,
        ],
    )?;

    for social in &profile.social_profiles {
        insert_social_profile(conn, profile_id, social, false)?;
    }
    Ok(())
}

fn insert_social_profile(
    conn: &Connection,
    profile_id: Uuid,
    social: &NewSocialProfile,
    replace: bool,
) -> Result<()> {
    let on_conflict = if replace {
        " ON CONFLICT(influencer_id, platform) DO UPDATE SET
            username = excluded.username,
            url = excluded.url,
            followers_count = excluded.followers_count,
            engagement_rate = excluded.engagement_rate,
            avg_likes = excluded.avg_likes,
            avg_comments = excluded.avg_comments"
    } else {
        ""
    };
    let sql = format!(
        "INSERT INTO social_profiles
            (id, influencer_id, platform, username, url, followers_count, engagement_rate, avg_likes, avg_comments, is_verified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10){on_conflict}"
    );
    conn.execute(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            profile_id.to_string(),
            social.platform.as_str(),
            social.username,
            social.url,
            social.followers_count,
            social.engagement_rate,
            social.avg_likes,
            social.avg_comments,
            social.is_verified,
        ],
    )?;
    Ok(())
}

pub(crate) fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user: User {
            id: col_uuid(row, 0)?,
            email: row.get(1)?,
            name: row.get(3)?,
            role: col_enum(row, 4)?,
            avatar: row.get(5)?,
            company: row.get(6)?,
            website: row.get(7)?,
            description: row.get(8)?,
            created_at: col_timestamp(row, 9)?,
        },
        password: row.get(2)?,
    })
}

fn load_account(conn: &Connection, row: UserRow) -> Result<AccountRow> {
    let subscription = query_subscription(conn, row.user.id)?
        .ok_or_else(|| anyhow!("User {} has no subscription", row.user.id))?;
    let influencer_profile = match row.user.role {
        Role::Influencer => query_influencer_profile(conn, row.user.id)?,
        Role::Brand | Role::Admin => None,
    };

    Ok(AccountRow {
        user: row.user,
        password: row.password,
        subscription,
        influencer_profile,
    })
}

fn query_subscription(conn: &Connection, user_id: Uuid) -> Result<Option<Subscription>> {
    let row = conn
        .query_row(
            "SELECT id, plan_type, status FROM subscriptions WHERE user_id = ?1",
            [user_id.to_string()],
            |row| {
                Ok(Subscription {
                    id: col_uuid(row, 0)?,
                    plan_type: col_enum(row, 1)?,
                    status: col_enum(row, 2)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub(crate) fn query_profile_id(conn: &Connection, user_id: Uuid) -> Result<Option<Uuid>> {
    let row = conn
        .query_row(
            "SELECT id FROM influencer_profiles WHERE user_id = ?1",
            [user_id.to_string()],
            |row| col_uuid(row, 0),
        )
        .optional()?;
    Ok(row)
}

pub(crate) fn query_influencer_profile(
    conn: &Connection,
    user_id: Uuid,
) -> Result<Option<InfluencerProfile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM influencer_profiles WHERE user_id = ?1");
    let profile = conn
        .query_row(&sql, [user_id.to_string()], map_profile_row)
        .optional()?;

    match profile {
        Some(mut profile) => {
            profile.social_profiles = query_social_profiles(conn, profile.id)?;
            Ok(Some(profile))
        }
        None => Ok(None),
    }
}

/// Maps a row selected with `PROFILE_COLUMNS`, starting at `offset`.
/// Social profiles are left empty for the caller to fill.
pub(crate) fn map_profile_columns(row: &Row<'_>, offset: usize) -> rusqlite::Result<InfluencerProfile> {
    Ok(InfluencerProfile {
        id: col_uuid(row, offset)?,
        bio: row.get(offset + 1)?,
        location: row.get(offset + 2)?,
        category: col_list(row, offset + 3)?,
        languages: col_list(row, offset + 4)?,
        rate: row.get(offset + 5)?,
        is_verified: row.get(offset + 6)?,
        is_available: row.get(offset + 7)?,
        profile_completed: row.get(offset + 8)?,
        social_profiles: Vec::new(),
    })
}

fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<InfluencerProfile> {
    map_profile_columns(row, 0)
}

pub(crate) fn query_social_profiles(conn: &Connection, profile_id: Uuid) -> Result<Vec<SocialProfile>> {
    let sql = format!(
        "SELECT {SOCIAL_COLUMNS} FROM social_profiles WHERE influencer_id = ?1 ORDER BY followers_count DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([profile_id.to_string()], map_social_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_social_row(row: &Row<'_>) -> rusqlite::Result<SocialProfile> {
    Ok(SocialProfile {
        id: col_uuid(row, 0)?,
        platform: col_enum(row, 1)?,
        username: row.get(2)?,
        url: row.get(3)?,
        followers_count: row.get(4)?,
        engagement_rate: row.get(5)?,
        avg_likes: row.get(6)?,
        avg_comments: row.get(7)?,
        is_verified: row.get(8)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use upfluence_types::models::{PlanType, SocialPlatform};

    pub(crate) fn new_account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            name: "Test User".into(),
            email: email.into(),
            password_hash: "$argon2id$not-a-real-hash".into(),
            role,
            avatar: None,
            company: (role == Role::Brand).then(|| "Fashion Nova".to_string()),
            website: None,
            description: None,
            plan_type: PlanType::Free,
            influencer_profile: None,
        }
    }

    pub(crate) fn created(outcome: CreateAccount) -> Uuid {
        match outcome {
            CreateAccount::Created(id) => id,
            CreateAccount::EmailTaken => panic!("email unexpectedly taken"),
        }
    }

    fn count(db: &Database, table: &str) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
        })
        .unwrap()
    }

    fn social(platform: SocialPlatform, followers_count: i64) -> NewSocialProfile {
        NewSocialProfile {
            platform,
            username: "handle".into(),
            url: None,
            followers_count,
            engagement_rate: 5.0,
            avg_likes: 10,
            avg_comments: 1,
            is_verified: false,
        }
    }

    #[test]
    fn brand_account_gets_free_subscription_and_no_profile() {
        let db = Database::open_in_memory().unwrap();
        let id = created(
            db.create_account(&new_account("sarah@fashionnova.com", Role::Brand))
                .unwrap(),
        );

        let account = db.find_account_by_email("sarah@fashionnova.com").unwrap().unwrap();
        assert_eq!(account.user.id, id);
        assert_eq!(account.user.role, Role::Brand);
        assert_eq!(account.subscription.plan_type, PlanType::Free);
        assert_eq!(account.subscription.status, SubscriptionStatus::Active);
        assert!(account.influencer_profile.is_none());
        assert_eq!(count(&db, "influencer_profiles"), 0);
    }

    #[test]
    fn influencer_account_gets_exactly_one_blank_profile() {
        let db = Database::open_in_memory().unwrap();
        let id = created(
            db.create_account(&new_account("new@creator.com", Role::Influencer))
                .unwrap(),
        );

        assert_eq!(count(&db, "influencer_profiles"), 1);
        let profile = db.get_influencer_profile(id).unwrap().unwrap();
        assert!(profile.category.is_empty());
        assert_eq!(profile.languages, vec!["English".to_string()]);
        assert!(profile.is_available);
        assert!(!profile.profile_completed);
    }

    #[test]
    fn duplicate_email_is_reported_and_not_inserted() {
        let db = Database::open_in_memory().unwrap();
        created(db.create_account(&new_account("dup@x.com", Role::Brand)).unwrap());

        let second = db
            .create_account(&new_account("dup@x.com", Role::Influencer))
            .unwrap();
        assert_eq!(second, CreateAccount::EmailTaken);
        assert_eq!(count(&db, "users"), 1);
        assert_eq!(count(&db, "subscriptions"), 1);
        assert_eq!(count(&db, "influencer_profiles"), 0);
    }

    #[test]
    fn failing_profile_insert_rolls_back_user_and_subscription() {
        let db = Database::open_in_memory().unwrap();
        let mut account = new_account("broken@creator.com", Role::Influencer);
        let mut profile = NewInfluencerProfile::blank();
        // Two rows for one platform violate UNIQUE(influencer_id, platform)
        profile.social_profiles = vec![
            social(SocialPlatform::Instagram, 10),
            social(SocialPlatform::Instagram, 20),
        ];
        account.influencer_profile = Some(profile);

        assert!(db.create_account(&account).is_err());
        assert_eq!(count(&db, "users"), 0);
        assert_eq!(count(&db, "subscriptions"), 0);
        assert_eq!(count(&db, "influencer_profiles"), 0);
    }

    #[test]
    fn non_influencer_with_profile_is_refused() {
        let db = Database::open_in_memory().unwrap();
        let mut account = new_account("odd@brand.com", Role::Brand);
        account.influencer_profile = Some(NewInfluencerProfile::blank());

        assert!(db.create_account(&account).is_err());
        assert_eq!(count(&db, "users"), 0);
    }

    #[test]
    fn profile_update_and_social_upsert() {
        let db = Database::open_in_memory().unwrap();
        let id = created(
            db.create_account(&new_account("emma@fitness.com", Role::Influencer))
                .unwrap(),
        );

        let updated = db
            .update_influencer_profile(
                id,
                &InfluencerProfileUpdate {
                    bio: "Personal trainer".into(),
                    location: Some("Miami, FL".into()),
                    category: vec!["Fitness".into()],
                    languages: vec!["English".into()],
                    rate: Some(800),
                    is_available: None,
                    profile_completed: true,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.rate, Some(800));
        assert!(updated.is_available);
        assert!(updated.profile_completed);

        let first = db
            .upsert_social_profile(id, &social(SocialPlatform::Tiktok, 100))
            .unwrap()
            .unwrap();
        let second = db
            .upsert_social_profile(id, &social(SocialPlatform::Tiktok, 145_000))
            .unwrap()
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.followers_count, 145_000);

        let account = db.find_account_by_id(id).unwrap().unwrap();
        assert_eq!(account.influencer_profile.unwrap().social_profiles.len(), 1);
    }

    #[test]
    fn brands_have_no_profile_to_update() {
        let db = Database::open_in_memory().unwrap();
        let id = created(db.create_account(&new_account("b@b.com", Role::Brand)).unwrap());
        assert!(
            db.upsert_social_profile(id, &social(SocialPlatform::Youtube, 1))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn reset_all_empties_every_table() {
        let db = Database::open_in_memory().unwrap();
        created(db.create_account(&new_account("a@a.com", Role::Influencer)).unwrap());
        db.batch(|batch| batch.reset_all()).unwrap();
        assert_eq!(db.count_users().unwrap(), 0);
        assert_eq!(count(&db, "influencer_profiles"), 0);
    }
}
