use super::helpers::{fetch_rental_for_update, update_rental};
use super::{visibility, Engine};

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::RentalAPI,
    auth::{Platform, User},
    entities::{Bid, Rental, RentalStatus},
    error::Error,
};

#[async_trait]
impl RentalAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_rental(
        &self,
        user: User,
        car_id: Uuid,
        starting_point: String,
        destination: String,
    ) -> Result<Rental, Error> {
        self.authorize(user.clone(), "create_rental", Platform::default())?;

        if starting_point.trim().is_empty() || destination.trim().is_empty() {
            return Err(Error::validation(
                "starting point and destination are required",
            ));
        }

        let mut conn = self.pool.acquire().await?;

        conn.fetch_optional(sqlx::query("SELECT id FROM cars WHERE id = $1").bind(&car_id))
            .await?
            .ok_or(Error::NotFound("car"))?;

        let rental = Rental::new(user.id, car_id, starting_point, destination);

        conn.execute(
            sqlx::query("INSERT INTO rentals (id, status, data) VALUES ($1, $2, $3)")
                .bind(&rental.id)
                .bind(rental.status.name())
                .bind(Json(&rental)),
        )
        .await?;

        Ok(rental)
    }

    #[tracing::instrument(skip(self))]
    async fn find_rental(&self, user: User, id: Uuid) -> Result<Rental, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(rental): Json<Rental> = conn
            .fetch_optional(sqlx::query("SELECT data FROM rentals WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("rental"))?
            .try_get("data")?;

        self.authorize(user.clone(), "read", rental.clone())?;

        Ok(rental)
    }

    #[tracing::instrument(skip(self))]
    async fn list_rentals(&self, user: User) -> Result<Vec<Rental>, Error> {
        self.authorize(user.clone(), "list_rentals", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn.fetch_all(sqlx::query("SELECT data FROM rentals")).await?;

        let mut rentals = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(rental): Json<Rental> = row.try_get("data")?;
            rentals.push(rental);
        }

        Ok(visibility::visible_rentals(&user, &rentals))
    }

    #[tracing::instrument(skip(self))]
    async fn available_rentals(&self, user: User) -> Result<Vec<Rental>, Error> {
        self.authorize(user.clone(), "list_available", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn.fetch_all(sqlx::query("SELECT data FROM rentals")).await?;

        let mut rentals = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(rental): Json<Rental> = row.try_get("data")?;
            rentals.push(rental);
        }

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM bids WHERE driver_id = $1").bind(&user.id))
            .await?;

        let mut bids = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(bid): Json<Bid> = row.try_get("data")?;
            bids.push(bid);
        }

        Ok(visibility::available_rentals(&user, &rentals, &bids))
    }

    #[tracing::instrument(skip(self))]
    async fn complete_rental(&self, user: User, id: Uuid) -> Result<Rental, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut rental = fetch_rental_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "complete", rental.clone())?;

        rental.complete()?;

        update_rental(&mut tx, &rental).await?;

        tx.commit().await?;

        Ok(rental)
    }

    #[tracing::instrument(skip(self))]
    async fn set_rental_status(
        &self,
        user: User,
        id: Uuid,
        status: RentalStatus,
    ) -> Result<Rental, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut rental = fetch_rental_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "override_status", rental.clone())?;

        tracing::warn!(
            "admin override: rental {} forced from {} to {}",
            rental.id,
            rental.status.name(),
            status.name()
        );

        rental.force_status(status);

        update_rental(&mut tx, &rental).await?;

        tx.commit().await?;

        Ok(rental)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_rental(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let rental = fetch_rental_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "delete", rental.clone())?;

        // bids never outlive their rental
        tx.execute(sqlx::query("DELETE FROM bids WHERE rental_id = $1").bind(&rental.id))
            .await?;

        tx.execute(sqlx::query("DELETE FROM rentals WHERE id = $1").bind(&rental.id))
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
