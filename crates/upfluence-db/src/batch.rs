use anyhow::Result;
use rusqlite::Connection;
use uuid::Uuid;

use crate::Database;
use crate::campaigns::{insert_application, insert_campaign};
use crate::messages::insert_message;
use crate::models::{ApplicationSeed, ApplyOutcome, CreateAccount, NewAccount, NewCampaign, NewMessage};
use crate::queries::{clear_all, insert_account, query_profile_id};

use upfluence_types::models::{Campaign, Message};

/// Writes bound to one open transaction, handed out by [`Database::batch`].
/// They commit together when the closure returns `Ok` and roll back together
/// otherwise.
pub struct Batch<'c> {
    conn: &'c Connection,
}

impl Database {
    pub fn batch<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Batch<'_>) -> Result<T>,
    {
        self.with_tx(|tx| f(&Batch { conn: tx }))
    }
}

impl Batch<'_> {
    /// Empties every table, children first.
    pub fn reset_all(&self) -> Result<()> {
        clear_all(self.conn)
    }

    pub fn create_account(&self, account: &NewAccount) -> Result<CreateAccount> {
        insert_account(self.conn, account)
    }

    pub fn influencer_profile_id(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        query_profile_id(self.conn, user_id)
    }

    pub fn create_campaign(&self, campaign: &NewCampaign) -> Result<Campaign> {
        insert_campaign(self.conn, campaign)
    }

    /// Inserts an application with an explicit status.
    pub fn insert_application(&self, seed: &ApplicationSeed) -> Result<ApplyOutcome> {
        insert_application(
            self.conn,
            seed.campaign_id,
            seed.influencer_id,
            seed.status,
            seed.message.as_deref(),
        )
    }

    pub fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        insert_message(self.conn, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::tests::new_account;
    use anyhow::anyhow;
    use upfluence_types::models::Role;

    #[test]
    fn failure_rolls_back_every_write() {
        let db = Database::open_in_memory().unwrap();
        db.create_account(&new_account("keep@brand.com", Role::Brand)).unwrap();

        let result: Result<()> = db.batch(|batch| {
            batch.reset_all()?;
            batch.create_account(&new_account("new@brand.com", Role::Brand))?;
            Err(anyhow!("seed data is broken"))
        });
        assert!(result.is_err());

        assert_eq!(db.count_users().unwrap(), 1);
        assert!(db.find_account_by_email("keep@brand.com").unwrap().is_some());
        assert!(db.find_account_by_email("new@brand.com").unwrap().is_none());
    }

    #[test]
    fn writes_are_visible_inside_the_batch() {
        let db = Database::open_in_memory().unwrap();
        let profile = db
            .batch(|batch| {
                let CreateAccount::Created(user_id) =
                    batch.create_account(&new_account("i@creator.com", Role::Influencer))?
                else {
                    return Err(anyhow!("email taken"));
                };
                batch.influencer_profile_id(user_id)
            })
            .unwrap();
        assert!(profile.is_some());
    }
}
