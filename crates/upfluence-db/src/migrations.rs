use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub const LATEST_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE IF NOT EXISTS users (
                id          TEXT PRIMARY KEY,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                name        TEXT NOT NULL,
                role        TEXT NOT NULL CHECK (role IN ('BRAND', 'INFLUENCER', 'ADMIN')),
                avatar      TEXT,
                company     TEXT,
                website     TEXT,
                description TEXT,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS subscriptions (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                plan_type   TEXT NOT NULL,
                status      TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS influencer_profiles (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                bio                 TEXT NOT NULL DEFAULT '',
                location            TEXT,
                category            TEXT NOT NULL DEFAULT '[]',
                languages           TEXT NOT NULL DEFAULT '[]',
                rate                INTEGER,
                is_verified         INTEGER NOT NULL DEFAULT 0,
                is_available        INTEGER NOT NULL DEFAULT 1,
                profile_completed   INTEGER NOT NULL DEFAULT 0,
                created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS social_profiles (
                id              TEXT PRIMARY KEY,
                influencer_id   TEXT NOT NULL REFERENCES influencer_profiles(id) ON DELETE CASCADE,
                platform        TEXT NOT NULL,
                username        TEXT NOT NULL,
                url             TEXT,
                followers_count INTEGER NOT NULL DEFAULT 0,
                engagement_rate REAL NOT NULL DEFAULT 0,
                avg_likes       INTEGER NOT NULL DEFAULT 0,
                avg_comments    INTEGER NOT NULL DEFAULT 0,
                is_verified     INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(influencer_id, platform)
            );

            CREATE TABLE IF NOT EXISTS campaigns (
                id              TEXT PRIMARY KEY,
                brand_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                category        TEXT NOT NULL DEFAULT '[]',
                budget          INTEGER NOT NULL DEFAULT 0,
                requirements    TEXT,
                platforms       TEXT NOT NULL DEFAULT '[]',
                min_followers   INTEGER,
                max_followers   INTEGER,
                target_age      TEXT,
                target_gender   TEXT,
                target_location TEXT NOT NULL DEFAULT '[]',
                status          TEXT NOT NULL DEFAULT 'DRAFT',
                start_date      TEXT,
                end_date        TEXT,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_campaigns_brand
                ON campaigns(brand_id, created_at);

            CREATE TABLE IF NOT EXISTS campaign_influencers (
                id              TEXT PRIMARY KEY,
                campaign_id     TEXT NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
                influencer_id   TEXT NOT NULL REFERENCES influencer_profiles(id) ON DELETE CASCADE,
                status          TEXT NOT NULL DEFAULT 'PENDING',
                message         TEXT,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(campaign_id, influencer_id)
            );

            CREATE INDEX IF NOT EXISTS idx_campaign_influencers_influencer
                ON campaign_influencers(influencer_id);

            CREATE TABLE IF NOT EXISTS messages (
                id          TEXT PRIMARY KEY,
                sender_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                receiver_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                campaign_id TEXT REFERENCES campaigns(id) ON DELETE SET NULL,
                subject     TEXT NOT NULL,
                content     TEXT NOT NULL,
                status      TEXT NOT NULL DEFAULT 'SENT',
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_messages_receiver
                ON messages(receiver_id, created_at);

            CREATE INDEX IF NOT EXISTS idx_messages_sender
                ON messages(sender_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
