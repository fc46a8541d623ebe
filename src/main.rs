use dotenv::dotenv;

use hackney::auth::TokenConfig;
use hackney::config::Config;
use hackney::db::PgPool;
use hackney::engine::Engine;
use hackney::server::serve;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().unwrap();
    let tokens = TokenConfig::from_env();

    let PgPool(pool) = PgPool::new(&config.database_url, config.max_connections)
        .await
        .unwrap();

    let engine = Engine::new(pool, tokens.clone()).await.unwrap();

    serve(engine, tokens, config.listen_addr()).await;
}
