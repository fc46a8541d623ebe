use super::helpers::{fetch_bid_for_update, fetch_rental_for_update, update_bid, update_rental};
use super::{visibility, Engine};

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::{BidAcceptance, BidAPI},
    auth::{Platform, User},
    entities::{Bid, Rental},
    error::Error,
};

/// The whole effect of accepting a bid: the winner is accepted, the rental
/// leaves pending with the winner's driver, and every remaining pending
/// sibling is rejected. Callers persist all of it under one transaction.
fn resolve_acceptance(
    rental: &mut Rental,
    bid: &mut Bid,
    siblings: &mut [Bid],
) -> Result<(), Error> {
    bid.accept()?;
    rental.assign_driver(bid.driver_id)?;

    for sibling in siblings.iter_mut() {
        sibling.reject()?;
    }

    Ok(())
}

#[async_trait]
impl BidAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_bid(
        &self,
        user: User,
        rental_id: Uuid,
        amount: f64,
        driver_location: String,
    ) -> Result<Bid, Error> {
        self.authorize(user.clone(), "create_bid", Platform::default())?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // lock the rental so its status cannot change under the new bid
        let rental = fetch_rental_for_update(&mut tx, &rental_id).await?;

        if !rental.is_pending() {
            return Err(Error::conflict("rental is not open for bidding"));
        }

        let existing = tx
            .fetch_optional(
                sqlx::query("SELECT id FROM bids WHERE rental_id = $1 AND driver_id = $2")
                    .bind(&rental_id)
                    .bind(&user.id),
            )
            .await?;

        if existing.is_some() {
            return Err(Error::conflict("driver already has a bid on this rental"));
        }

        let bid = Bid::new(rental_id, user.id, amount, driver_location)?;

        tx.execute(
            sqlx::query(
                "INSERT INTO bids (id, rental_id, driver_id, status, data) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&bid.id)
            .bind(&bid.rental_id)
            .bind(&bid.driver_id)
            .bind(bid.status.name())
            .bind(Json(&bid)),
        )
        .await?;

        tx.commit().await?;

        Ok(bid)
    }

    #[tracing::instrument(skip(self))]
    async fn find_bid(&self, user: User, id: Uuid) -> Result<Bid, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(bid): Json<Bid> = conn
            .fetch_optional(sqlx::query("SELECT data FROM bids WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("bid"))?
            .try_get("data")?;

        if self.authorize(user.clone(), "read", bid.clone()).is_ok() {
            return Ok(bid);
        }

        // the owning customer reaches a bid through its parent rental
        let Json(rental): Json<Rental> = conn
            .fetch_optional(sqlx::query("SELECT data FROM rentals WHERE id = $1").bind(&bid.rental_id))
            .await?
            .ok_or(Error::NotFound("rental"))?
            .try_get("data")?;

        self.authorize(user.clone(), "read_bids", rental)?;

        Ok(bid)
    }

    #[tracing::instrument(skip(self))]
    async fn list_bids(&self, user: User) -> Result<Vec<Bid>, Error> {
        self.authorize(user.clone(), "list_bids", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn.fetch_all(sqlx::query("SELECT data FROM bids")).await?;

        let mut bids = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(bid): Json<Bid> = row.try_get("data")?;
            bids.push(bid);
        }

        let rows = conn.fetch_all(sqlx::query("SELECT data FROM rentals")).await?;

        let mut rentals = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(rental): Json<Rental> = row.try_get("data")?;
            rentals.push(rental);
        }

        Ok(visibility::visible_bids(&user, &rentals, &bids))
    }

    #[tracing::instrument(skip(self))]
    async fn accept_bid(&self, user: User, id: Uuid) -> Result<BidAcceptance, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // rentals lock before their bids, the same order delete_rental takes
        let Json(found): Json<Bid> = tx
            .fetch_optional(sqlx::query("SELECT data FROM bids WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("bid"))?
            .try_get("data")?;

        let mut rental = fetch_rental_for_update(&mut tx, &found.rental_id).await?;
        let mut bid = fetch_bid_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "accept_bid", rental.clone())?;

        let rows = tx
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM bids WHERE rental_id = $1 AND id <> $2 AND status = 'pending' FOR UPDATE",
                )
                .bind(&rental.id)
                .bind(&bid.id),
            )
            .await?;

        let mut siblings = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let Json(sibling): Json<Bid> = row.try_get("data")?;
            siblings.push(sibling);
        }

        resolve_acceptance(&mut rental, &mut bid, &mut siblings)?;

        for sibling in siblings.iter() {
            update_bid(&mut tx, sibling).await?;
        }

        update_bid(&mut tx, &bid).await?;
        update_rental(&mut tx, &rental).await?;

        tx.commit().await?;

        tracing::info!(
            "bid {} accepted, rental {} ongoing with driver {}",
            bid.id,
            rental.id,
            bid.driver_id
        );

        Ok(BidAcceptance { rental, bid })
    }

    #[tracing::instrument(skip(self))]
    async fn reject_bid(&self, user: User, id: Uuid) -> Result<Bid, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // rentals lock before their bids, the same order delete_rental takes
        let Json(found): Json<Bid> = tx
            .fetch_optional(sqlx::query("SELECT data FROM bids WHERE id = $1").bind(&id))
            .await?
            .ok_or(Error::NotFound("bid"))?
            .try_get("data")?;

        let rental = fetch_rental_for_update(&mut tx, &found.rental_id).await?;

        self.authorize(user.clone(), "reject_bid", rental)?;

        let mut bid = fetch_bid_for_update(&mut tx, &id).await?;

        bid.reject()?;

        update_bid(&mut tx, &bid).await?;

        tx.commit().await?;

        Ok(bid)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_bid(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let bid = fetch_bid_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "delete", bid.clone())?;

        tx.execute(sqlx::query("DELETE FROM bids WHERE id = $1").bind(&bid.id))
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BidStatus, RentalStatus};

    fn pending_rental() -> Rental {
        Rental::new(Uuid::new_v4(), Uuid::new_v4(), "Gulshan".into(), "Uttara".into())
    }

    fn pending_bid(rental_id: Uuid) -> Bid {
        Bid::new(rental_id, Uuid::new_v4(), 50.0, "Mohakhali".into()).unwrap()
    }

    #[test]
    fn acceptance_resolves_every_record_together() {
        let mut rental = pending_rental();
        let mut winner = pending_bid(rental.id);
        let mut siblings = vec![pending_bid(rental.id), pending_bid(rental.id)];

        resolve_acceptance(&mut rental, &mut winner, &mut siblings).unwrap();

        assert_eq!(winner.status, BidStatus::Accepted);
        assert_eq!(rental.status, RentalStatus::Ongoing);
        assert_eq!(rental.driver_id, Some(winner.driver_id));
        assert!(siblings
            .iter()
            .all(|sibling| sibling.status == BidStatus::Rejected));
    }

    #[test]
    fn acceptance_with_no_siblings() {
        let mut rental = pending_rental();
        let mut winner = pending_bid(rental.id);

        resolve_acceptance(&mut rental, &mut winner, &mut []).unwrap();

        assert_eq!(winner.status, BidStatus::Accepted);
        assert_eq!(rental.status, RentalStatus::Ongoing);
    }

    #[test]
    fn resolved_bid_cannot_win() {
        let mut rental = pending_rental();
        let mut loser = pending_bid(rental.id);
        loser.reject().unwrap();

        let mut siblings = vec![pending_bid(rental.id)];

        let err = resolve_acceptance(&mut rental, &mut loser, &mut siblings).unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(rental.status, RentalStatus::Pending);
        assert!(rental.driver_id.is_none());
        assert_eq!(siblings[0].status, BidStatus::Pending);
    }

    #[test]
    fn ongoing_rental_cannot_accept_again() {
        let mut rental = pending_rental();
        rental.assign_driver(Uuid::new_v4()).unwrap();

        let mut late = pending_bid(rental.id);
        let mut siblings = vec![pending_bid(rental.id)];

        let err = resolve_acceptance(&mut rental, &mut late, &mut siblings).unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(siblings[0].status, BidStatus::Pending);
    }
}
