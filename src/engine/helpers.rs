use super::Database;

use sqlx::{types::Json, Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{Account, Bid, Car, Rental},
    error::Error,
};

#[tracing::instrument(skip(tx))]
pub async fn fetch_rental_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Rental, Error> {
    let Json(rental): Json<Rental> = tx
        .fetch_optional(sqlx::query("SELECT data FROM rentals WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or(Error::NotFound("rental"))?
        .try_get("data")?;

    Ok(rental)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_bid_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Bid, Error> {
    let Json(bid): Json<Bid> = tx
        .fetch_optional(sqlx::query("SELECT data FROM bids WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or(Error::NotFound("bid"))?
        .try_get("data")?;

    Ok(bid)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_account_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Account, Error> {
    let Json(account): Json<Account> = tx
        .fetch_optional(sqlx::query("SELECT data FROM accounts WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or(Error::NotFound("account"))?
        .try_get("data")?;

    Ok(account)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_car_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Car, Error> {
    let Json(car): Json<Car> = tx
        .fetch_optional(sqlx::query("SELECT data FROM cars WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or(Error::NotFound("car"))?
        .try_get("data")?;

    Ok(car)
}

#[tracing::instrument(skip(tx))]
pub async fn update_rental(
    tx: &mut Transaction<'_, Database>,
    rental: &Rental,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE rentals SET status = $2, data = $3 WHERE id = $1")
            .bind(&rental.id)
            .bind(rental.status.name())
            .bind(Json(rental)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_bid(tx: &mut Transaction<'_, Database>, bid: &Bid) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE bids SET status = $2, data = $3 WHERE id = $1")
            .bind(&bid.id)
            .bind(bid.status.name())
            .bind(Json(bid)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_account(
    tx: &mut Transaction<'_, Database>,
    account: &Account,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE accounts SET email = $2, role = $3, data = $4 WHERE id = $1")
            .bind(&account.id)
            .bind(&account.email)
            .bind(account.role.name())
            .bind(Json(account)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_car(tx: &mut Transaction<'_, Database>, car: &Car) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE cars SET data = $2 WHERE id = $1")
            .bind(&car.id)
            .bind(Json(car)),
    )
    .await?;

    Ok(())
}
