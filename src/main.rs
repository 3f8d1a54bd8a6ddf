use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use calorie_service::{
    config::Config,
    db::{DocumentStore, MemoryStore, PostgresStore},
    routes::{cors_layer, create_router, AppState},
    services::{seed, Catalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("calorie_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PostgresStore::connect(url, config.max_db_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let catalog = Catalog::new(store);

    if let Some(path) = &config.seed_path {
        seed::load_seed_file(&catalog, path).await?;
    }

    let state = Arc::new(AppState::new(catalog));
    let app = create_router(state).layer(cors_layer(&config.cors_allowed_origin)?);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
