mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequest, RequestParts},
    http::header,
    routing::{get, patch, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::auth::{token, TokenConfig, User};
use crate::error::Error;
use crate::server::handlers::{accounts, auth, bids, cars, rentals};

/// Decode the bearer credential into the acting user. Route guards are a
/// convenience; the engine re-checks authorization on every operation.
#[async_trait]
impl<B: Send> FromRequest<B> for User {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let config = req
            .extensions()
            .get::<TokenConfig>()
            .cloned()
            .ok_or(Error::MissingCredentials)?;

        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::MissingCredentials)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(Error::MissingCredentials)?;

        let claims = token::verify(token, &config)?;

        Ok(User::from_role_name(claims.sub, claims.role))
    }
}

pub async fn serve<T: API + Send + Sync + 'static>(api: T, tokens: TokenConfig, addr: SocketAddr) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/cars", get(cars::list).post(cars::create))
        .route(
            "/cars/:id",
            get(cars::find).patch(cars::update).delete(cars::remove),
        )
        .route("/accounts", get(accounts::list))
        .route(
            "/accounts/:id",
            get(accounts::find)
                .patch(accounts::update)
                .delete(accounts::remove),
        )
        .route("/rents", get(rentals::list).post(rentals::create))
        .route("/rents/available", get(rentals::available))
        .route("/rents/:id", get(rentals::find).delete(rentals::remove))
        .route("/rents/:id/complete", patch(rentals::complete))
        .route("/rents/:id/status", patch(rentals::set_status))
        .route("/bids", get(bids::list).post(bids::create))
        .route("/bids/:id", get(bids::find).delete(bids::remove))
        .route("/bids/:id/accept", patch(bids::accept))
        .route("/bids/:id/reject", patch(bids::reject))
        .layer(Extension(api))
        .layer(Extension(tokens));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}

#[cfg(test)]
fn test_token_config() -> TokenConfig {
    TokenConfig {
        secret: "test-secret".into(),
        expiry_hours: 1,
        issuer: "hackney".into(),
    }
}

#[test]
fn bearer_token_extractor_test() {
    use axum::http::Request;
    use tokio_test::block_on;

    use crate::entities::{Account, Role};

    let config = test_token_config();

    let account = Account::new("Rafi".into(), "rafi@example.com".into(), Role::Driver).unwrap();
    let token = token::create(&account, &config).unwrap();

    let request = Request::builder()
        .uri("/rents")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .extension(config)
        .body(())
        .unwrap();

    let mut parts = RequestParts::new(request);
    let user = block_on(User::from_request(&mut parts)).unwrap();

    assert_eq!(user.id, account.id);
    assert!(user.is_driver());
}

#[test]
fn missing_bearer_token_is_rejected() {
    use axum::http::Request;
    use tokio_test::block_on;

    let request = Request::builder()
        .uri("/rents")
        .extension(test_token_config())
        .body(())
        .unwrap();

    let mut parts = RequestParts::new(request);
    let err = block_on(User::from_request(&mut parts)).unwrap_err();

    assert!(matches!(err, Error::MissingCredentials));
}
