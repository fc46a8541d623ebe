use super::helpers::{fetch_account_for_update, update_account};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::AccountAPI,
    auth::{Platform, User},
    entities::{Account, AccountPatch},
    error::Error,
};

#[async_trait]
impl AccountAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_accounts(&self, user: User) -> Result<Vec<Account>, Error> {
        self.authorize(user.clone(), "list_accounts", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM accounts"))
            .await?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(account): Json<Account> = row.try_get("data")?;
            accounts.push(account);
        }

        Ok(accounts)
    }

    #[tracing::instrument(skip(self))]
    async fn find_account(&self, user: User, id: Uuid) -> Result<Account, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(account): Json<Account> = conn
            .fetch_optional(sqlx::query("SELECT data FROM accounts WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("account"))?
            .try_get("data")?;

        self.authorize(user.clone(), "read", account.clone())?;

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn update_account(
        &self,
        user: User,
        id: Uuid,
        patch: AccountPatch,
    ) -> Result<Account, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut account = fetch_account_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "update", account.clone())?;

        // roles are immutable except through admin tooling
        if patch.role.is_some() && !user.is_admin() {
            return Err(Error::Unauthorized);
        }

        account.apply(patch)?;

        update_account(&mut tx, &account).await.map_err(|err| {
            if let Error::Database(sqlx::Error::Database(db_err)) = &err {
                if db_err.code().as_deref() == Some("23505") {
                    return Error::conflict("email is already registered");
                }
            }
            err
        })?;

        tx.commit().await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_account(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let account = fetch_account_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "delete", account.clone())?;

        tx.execute(sqlx::query("DELETE FROM accounts WHERE id = $1").bind(&account.id))
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
