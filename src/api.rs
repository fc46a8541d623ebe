use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Session, User};
use crate::entities::{
    Account, AccountPatch, Bid, Car, CarDetails, CarPatch, Rental, RentalStatus, Role,
};
use crate::error::Error;

/// The two effects of a successful acceptance, returned together so the
/// caller sees the rental and the winning bid move in lockstep.
#[derive(Clone, Debug, Serialize)]
pub struct BidAcceptance {
    pub rental: Rental,
    pub bid: Bid,
}

#[async_trait]
pub trait AuthAPI {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<Session, Error>;

    async fn login(&self, email: String, password: String) -> Result<Session, Error>;
}

#[async_trait]
pub trait AccountAPI {
    async fn list_accounts(&self, user: User) -> Result<Vec<Account>, Error>;
    async fn find_account(&self, user: User, id: Uuid) -> Result<Account, Error>;
    async fn update_account(
        &self,
        user: User,
        id: Uuid,
        patch: AccountPatch,
    ) -> Result<Account, Error>;
    async fn delete_account(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait CarAPI {
    async fn create_car(&self, user: User, details: CarDetails) -> Result<Car, Error>;
    async fn find_car(&self, user: User, id: Uuid) -> Result<Car, Error>;
    async fn list_cars(&self, user: User) -> Result<Vec<Car>, Error>;
    async fn update_car(&self, user: User, id: Uuid, patch: CarPatch) -> Result<Car, Error>;
    async fn delete_car(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait RentalAPI {
    async fn create_rental(
        &self,
        user: User,
        car_id: Uuid,
        starting_point: String,
        destination: String,
    ) -> Result<Rental, Error>;

    async fn find_rental(&self, user: User, id: Uuid) -> Result<Rental, Error>;

    async fn list_rentals(&self, user: User) -> Result<Vec<Rental>, Error>;

    /// The driver jobs feed: pending rentals the driver has not bid on.
    async fn available_rentals(&self, user: User) -> Result<Vec<Rental>, Error>;

    async fn complete_rental(&self, user: User, id: Uuid) -> Result<Rental, Error>;

    /// Admin-only unconstrained override; not part of the normal path.
    async fn set_rental_status(
        &self,
        user: User,
        id: Uuid,
        status: RentalStatus,
    ) -> Result<Rental, Error>;

    async fn delete_rental(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait BidAPI {
    async fn create_bid(
        &self,
        user: User,
        rental_id: Uuid,
        amount: f64,
        driver_location: String,
    ) -> Result<Bid, Error>;

    async fn find_bid(&self, user: User, id: Uuid) -> Result<Bid, Error>;

    async fn list_bids(&self, user: User) -> Result<Vec<Bid>, Error>;

    async fn accept_bid(&self, user: User, id: Uuid) -> Result<BidAcceptance, Error>;

    async fn reject_bid(&self, user: User, id: Uuid) -> Result<Bid, Error>;

    async fn delete_bid(&self, user: User, id: Uuid) -> Result<(), Error>;
}

pub trait API: AuthAPI + AccountAPI + CarAPI + RentalAPI + BidAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
