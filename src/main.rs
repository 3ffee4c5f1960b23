//! Lessons API server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lessons_api::{
    config::{redact_uri, Args},
    db::{MongoClient, MongoStore},
    server::{self, AppState},
    store::{LessonStore, MemoryStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lessons_api={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("Lessons API v{}", env!("CARGO_PKG_VERSION"));
    info!("Listen: {}", args.listen_addr());
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Database: {}", args.mongodb_db);

    let store = open_store(&args).await;
    let state = Arc::new(AppState::new(args, store));

    server::run(state).await?;

    Ok(())
}

/// Connect to MongoDB; dev mode falls back to the in-memory store
async fn open_store(args: &Args) -> Arc<dyn LessonStore> {
    let Some(uri) = args.mongodb_connection_string() else {
        warn!("No MongoDB configured, using in-memory store");
        return Arc::new(MemoryStore::new());
    };
    info!("MongoDB: {}", redact_uri(&uri));

    let connected = match MongoClient::new(&uri, &args.mongodb_db).await {
        Ok(client) => MongoStore::new(client).await,
        Err(e) => Err(e),
    };

    match connected {
        Ok(store) => {
            info!("MongoDB connected successfully");
            Arc::new(store)
        }
        Err(e) if args.dev_mode => {
            warn!("MongoDB unavailable (dev mode, using in-memory store): {}", e);
            Arc::new(MemoryStore::new())
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    }
}
