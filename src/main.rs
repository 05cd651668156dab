//! Address-book server: reads settings, prepares the store, mounts routes and serves.

use address_book::{
    app, ensure_contacts_table, ensure_database_exists, seed_demo_contacts, AppState, ContactStore,
    MemoryContactStore, PgContactStore, Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("address_book=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn ContactStore> = match settings.store {
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_contacts_table(&pool, &settings.schema).await?;
            tracing::info!(schema = %settings.schema, "postgres store ready");
            Arc::new(PgContactStore::new(pool, &settings.schema))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; contacts are lost on exit");
            Arc::new(MemoryContactStore::new())
        }
    };

    if settings.seed_demo_data {
        seed_demo_contacts(store.as_ref()).await?;
    }

    let router = app(AppState::new(store), settings.max_body_bytes);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
