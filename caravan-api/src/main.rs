use std::net::SocketAddr;
use std::sync::Arc;

use caravan_api::{
    app,
    state::{AppState, ProviderHealth},
};
use caravan_providers::{DuffelClient, RatehawkClient, ResolutionTables, TboClient};
use caravan_store::{Config, DbClient, PgHotelStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caravan_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Caravan API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    let store = PgHotelStore::new(db.pool.clone(), config.database.hotels_table.clone());

    let ratehawk = RatehawkClient::new(
        config.ratehawk.base_url.clone(),
        config.ratehawk.key_id.clone(),
        config.ratehawk.api_key.clone(),
    );
    let tbo = TboClient::new(
        config.tbo.base_url.clone(),
        config.tbo.username.clone(),
        config.tbo.password.clone(),
        ResolutionTables::builtin(),
    );
    let duffel = DuffelClient::new(config.duffel.base_url.clone(), config.duffel.token.clone());

    let health = ProviderHealth {
        store: "connected",
        ratehawk: if config.ratehawk.key_id.is_empty() {
            "not configured"
        } else {
            "configured"
        },
        tbo: if config.tbo.username.is_empty() {
            "not configured"
        } else {
            "configured"
        },
        duffel: if config.duffel.token.is_empty() {
            "not configured"
        } else {
            "configured"
        },
    };
    tracing::info!("Hotels table: {}", config.database.hotels_table);
    tracing::info!("Ratehawk: {}", health.ratehawk);
    tracing::info!("TBO: {}", health.tbo);
    tracing::info!("Duffel: {}", health.duffel);

    let app_state = AppState {
        store: Arc::new(store),
        ratehawk: Arc::new(ratehawk),
        tbo: Arc::new(tbo),
        flights: Arc::new(duffel),
        health,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
