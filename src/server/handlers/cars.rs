use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{Car, CarDetails, CarPatch};
use crate::error::Error;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(details): Json<CarDetails>,
) -> Result<Json<Car>, Error> {
    let car = api.create_car(user, details).await?;

    Ok(car.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, Error> {
    let car = api.find_car(user, id).await?;

    Ok(car.into())
}

pub async fn list(Extension(api): Extension<DynAPI>, user: User) -> Result<Json<Vec<Car>>, Error> {
    let cars = api.list_cars(user).await?;

    Ok(cars.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(patch): Json<CarPatch>,
) -> Result<Json<Car>, Error> {
    let car = api.update_car(user, id, patch).await?;

    Ok(car.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_car(user, id).await?;

    Ok(().into())
}
