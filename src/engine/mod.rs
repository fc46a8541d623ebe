mod account_api;
mod auth_api;
mod bid_api;
mod car_api;
mod helpers;
mod rental_api;
pub mod visibility;

use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::{authorizor, TokenConfig},
    error::Error,
};

type Database = Postgres;

/// The lifecycle engine: the only writer of rental and bid state. Every
/// operation authorizes against the policy first and performs its
/// cross-record effects inside one transaction.
pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
    tokens: TokenConfig,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, tokens: TokenConfig) -> Result<Self, Error> {
        // TODO: move table creation into sqlx migrations
        pool.execute(
            "CREATE TABLE IF NOT EXISTS accounts (id UUID PRIMARY KEY, email VARCHAR NOT NULL UNIQUE, role VARCHAR NOT NULL, password_hash VARCHAR NOT NULL, data JSONB NOT NULL)",
        )
        .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS cars (id UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS rentals (id UUID PRIMARY KEY, status VARCHAR NOT NULL, data JSONB NOT NULL)",
        )
        .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS bids (id UUID PRIMARY KEY, rental_id UUID NOT NULL, driver_id UUID NOT NULL, status VARCHAR NOT NULL, data JSONB NOT NULL)",
        )
        .await?;

        Ok(Self {
            pool,
            authorizor: authorizor::new(),
            tokens,
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(Error::Unauthorized)
    }
}

impl API for Engine {}
