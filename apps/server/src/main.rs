use tracing_subscriber::EnvFilter;

use bodega_db::{Database, DbConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("BODEGA_DB").unwrap_or_else(|_| "./bodega.db".to_string());
    let addr = std::env::var("BODEGA_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .expect("failed to open database");

    let app = bodega_server::build_router(db);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!(%addr, db = %db_path, "bodega-server listening");

    axum::serve(listener, app)
        .await
        .expect("server exited with error");
}
