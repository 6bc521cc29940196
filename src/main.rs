use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use gradus::config::{get_config, CliArgs};
use gradus::{create_app, db, run_migrations};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gradus=info,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    if std::fs::metadata(".env").is_ok() {
        info!("Loading .env file");
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let config = get_config(args);

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(db::init_pool(&config.database_url));
    {
        let mut conn = pool.get().expect("Failed to get connection for migrations");
        run_migrations(&mut conn);
    }

    let app = create_app(pool);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
