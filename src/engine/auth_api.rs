use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};

use crate::{
    api::AuthAPI,
    auth::{password, token, Session},
    entities::{Account, Role},
    error::Error,
};

fn map_unique_email(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Error::conflict("email is already registered")
        }
        _ => Error::Database(err),
    }
}

#[async_trait]
impl AuthAPI for Engine {
    #[tracing::instrument(skip(self, password))]
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<Session, Error> {
        if role == Role::Admin {
            return Err(Error::validation(
                "admin accounts are provisioned out of band",
            ));
        }

        if password.len() < 8 {
            return Err(Error::validation("password must be at least 8 characters"));
        }

        let account = Account::new(name, email, role)?;
        let password_hash = password::hash_password(&password)?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO accounts (id, email, role, password_hash, data) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&account.id)
            .bind(&account.email)
            .bind(account.role.name())
            .bind(&password_hash)
            .bind(Json(&account)),
        )
        .await
        .map_err(map_unique_email)?;

        let token = token::create(&account, &self.tokens)?;

        Ok(Session { token, account })
    }

    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: String, password: String) -> Result<Session, Error> {
        let mut conn = self.pool.acquire().await?;

        let row = conn
            .fetch_optional(
                sqlx::query("SELECT password_hash, data FROM accounts WHERE email = $1")
                    .bind(&email),
            )
            .await?
            .ok_or(Error::InvalidCredentials)?;

        let password_hash: String = row.try_get("password_hash")?;

        if !password::verify_password(&password, &password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        let Json(account): Json<Account> = row.try_get("data")?;

        let token = token::create(&account, &self.tokens)?;

        Ok(Session { token, account })
    }
}
