use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{BidAcceptance, DynAPI};
use crate::auth::User;
use crate::entities::Bid;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    rental_id: Uuid,
    amount: f64,
    driver_location: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Bid>, Error> {
    let bid = api
        .create_bid(user, params.rental_id, params.amount, params.driver_location)
        .await?;

    Ok(bid.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Bid>, Error> {
    let bid = api.find_bid(user, id).await?;

    Ok(bid.into())
}

pub async fn list(Extension(api): Extension<DynAPI>, user: User) -> Result<Json<Vec<Bid>>, Error> {
    let bids = api.list_bids(user).await?;

    Ok(bids.into())
}

pub async fn accept(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<BidAcceptance>, Error> {
    let acceptance = api.accept_bid(user, id).await?;

    Ok(acceptance.into())
}

pub async fn reject(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Bid>, Error> {
    let bid = api.reject_bid(user, id).await?;

    Ok(bid.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_bid(user, id).await?;

    Ok(().into())
}
