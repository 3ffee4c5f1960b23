//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per connection.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::routes;
use crate::services::EngagementService;
use crate::store::LessonStore;
use crate::types::ApiError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Store handle shared by every request
    pub store: Arc<dyn LessonStore>,
    pub engagement: EngagementService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn LessonStore>) -> Self {
        Self {
            args,
            engagement: EngagementService::new(Arc::clone(&store)),
            store,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), ApiError> {
    let addr = state.args.listen_addr();
    let listener = TcpListener::bind(addr).await?;

    info!(
        "Lessons API listening on {} (store: {})",
        addr,
        state.store.backend_name()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    let body = req.into_body().collect().await?.to_bytes();
    let response = routes::dispatch(&state, &method, &path, query.as_deref(), body).await;

    if response.status().is_server_error() {
        warn!("[{}] {} {} -> {}", addr, method, path, response.status());
    }

    Ok(response)
}
