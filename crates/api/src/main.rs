use std::sync::Arc;

use talenthq_analytics::EngineConfig;
use talenthq_store::HrStore;

#[tokio::main]
async fn main() {
    talenthq_observability::init();

    let config = EngineConfig::default();
    config.validate().expect("engine configuration is invalid");

    let store = build_store().await;
    let app = talenthq_api::app::build_app(store, config);

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

async fn build_store() -> Arc<dyn HrStore> {
    #[cfg(feature = "postgres")]
    {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("failed to connect to postgres");
            tracing::info!("serving from postgres");
            return Arc::new(talenthq_store::PostgresHrStore::new(pool));
        }
    }

    tracing::warn!("DATABASE_URL not set; serving from an empty in-memory store");
    Arc::new(talenthq_store::InMemoryHrStore::new())
}
