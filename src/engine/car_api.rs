use super::helpers::{fetch_car_for_update, update_car};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::CarAPI,
    auth::{Platform, User},
    entities::{Car, CarDetails, CarPatch},
    error::Error,
};

#[async_trait]
impl CarAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_car(&self, user: User, details: CarDetails) -> Result<Car, Error> {
        self.authorize(user.clone(), "create_car", Platform::default())?;

        let car = Car::new(details)?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO cars (id, data) VALUES ($1, $2)")
                .bind(&car.id)
                .bind(Json(&car)),
        )
        .await?;

        Ok(car)
    }

    #[tracing::instrument(skip(self))]
    async fn find_car(&self, user: User, id: Uuid) -> Result<Car, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(car): Json<Car> = conn
            .fetch_optional(sqlx::query("SELECT data FROM cars WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("car"))?
            .try_get("data")?;

        self.authorize(user.clone(), "read", car.clone())?;

        Ok(car)
    }

    #[tracing::instrument(skip(self))]
    async fn list_cars(&self, user: User) -> Result<Vec<Car>, Error> {
        self.authorize(user.clone(), "list_cars", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn.fetch_all(sqlx::query("SELECT data FROM cars")).await?;

        let mut cars = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(car): Json<Car> = row.try_get("data")?;
            cars.push(car);
        }

        Ok(cars)
    }

    #[tracing::instrument(skip(self))]
    async fn update_car(&self, user: User, id: Uuid, patch: CarPatch) -> Result<Car, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut car = fetch_car_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "update", car.clone())?;

        car.apply(patch)?;

        update_car(&mut tx, &car).await?;

        tx.commit().await?;

        Ok(car)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_car(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let car = fetch_car_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "delete", car.clone())?;

        tx.execute(sqlx::query("DELETE FROM cars WHERE id = $1").bind(&car.id))
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
