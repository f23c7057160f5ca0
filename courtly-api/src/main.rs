use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtly_api::{app, AppState};
use courtly_booking::{MockCheckoutProvider, StripeCheckoutProvider};
use courtly_core::clock::SystemClock;
use courtly_core::payment::CheckoutProvider;
use courtly_core::repository::{CourtRepository, ReservationRepository};
use courtly_store::app_config::{Config, ProviderKind, StoreBackend};
use courtly_store::{
    DbClient, InMemoryReservationRepository, PgCourtRepository, PgReservationRepository, StaticCourtRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtly_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Courtly API on port {}", config.server.port);

    let (reservations, courts): (Arc<dyn ReservationRepository>, Arc<dyn CourtRepository>) =
        match config.database.backend {
            StoreBackend::Postgres => {
                let db = DbClient::from_config(&config.database)
                    .await
                    .context("Failed to connect to Postgres")?;
                db.migrate().await.context("Failed to run migrations")?;
                let reservations: Arc<dyn ReservationRepository> =
                    Arc::new(PgReservationRepository::new(db.pool.clone()));
                let courts: Arc<dyn CourtRepository> = Arc::new(PgCourtRepository::new(db.pool.clone()));
                (reservations, courts)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory reservation store; bookings are lost on restart");
                let reservations: Arc<dyn ReservationRepository> = Arc::new(InMemoryReservationRepository::new());
                let courts: Arc<dyn CourtRepository> = Arc::new(StaticCourtRepository::seeded());
                (reservations, courts)
            }
        };

    let provider: Arc<dyn CheckoutProvider> = match config.payment.provider {
        ProviderKind::Stripe => {
            let secret_key = config
                .payment
                .secret_key
                .clone()
                .context("payment.secret_key is required for the stripe provider")?;
            Arc::new(StripeCheckoutProvider::new(
                secret_key,
                config.payment.api_base.as_str(),
                Duration::from_millis(config.payment.timeout_ms),
            )?)
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock checkout provider; every session is marked paid");
            Arc::new(MockCheckoutProvider::new())
        }
    };
    tracing::info!(
        "Checkout via {}, {} {} per slot, venue zone {}",
        provider.name(),
        config.pricing.price_per_slot,
        config.pricing.currency,
        config.venue.time_zone
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let app_state = AppState::new(config, reservations, courts, provider, Arc::new(SystemClock));
    let app = app(app_state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
