use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::Session;
use crate::entities::Role;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct RegisterParams {
    name: String,
    email: String,
    password: String,
    role: Role,
}

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    email: String,
    password: String,
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<RegisterParams>,
) -> Result<Json<Session>, Error> {
    let session = api
        .register(params.name, params.email, params.password, params.role)
        .await?;

    Ok(session.into())
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<Session>, Error> {
    let session = api.login(params.email, params.password).await?;

    Ok(session.into())
}
