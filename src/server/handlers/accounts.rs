use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{Account, AccountPatch};
use crate::error::Error;

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Account>>, Error> {
    let accounts = api.list_accounts(user).await?;

    Ok(accounts.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, Error> {
    let account = api.find_account(user, id).await?;

    Ok(account.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(patch): Json<AccountPatch>,
) -> Result<Json<Account>, Error> {
    let account = api.update_account(user, id, patch).await?;

    Ok(account.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_account(user, id).await?;

    Ok(().into())
}
