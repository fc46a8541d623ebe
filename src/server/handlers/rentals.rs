use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{Rental, RentalStatus};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    car_id: Uuid,
    starting_point: String,
    destination: String,
}

#[derive(Serialize, Deserialize)]
pub struct SetStatusParams {
    status: RentalStatus,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Rental>, Error> {
    let rental = api
        .create_rental(
            user,
            params.car_id,
            params.starting_point,
            params.destination,
        )
        .await?;

    Ok(rental.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rental>, Error> {
    let rental = api.find_rental(user, id).await?;

    Ok(rental.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Rental>>, Error> {
    let rentals = api.list_rentals(user).await?;

    Ok(rentals.into())
}

pub async fn available(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Rental>>, Error> {
    let rentals = api.available_rentals(user).await?;

    Ok(rentals.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rental>, Error> {
    let rental = api.complete_rental(user, id).await?;

    Ok(rental.into())
}

pub async fn set_status(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<SetStatusParams>,
) -> Result<Json<Rental>, Error> {
    let rental = api.set_rental_status(user, id, params.status).await?;

    Ok(rental.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_rental(user, id).await?;

    Ok(().into())
}
