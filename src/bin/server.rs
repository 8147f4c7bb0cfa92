use std::{net::SocketAddr, process::exit, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    AppConfig, AppState, DEFAULT_SEED_URL, HttpSeedSource, PaginationConfig, build_router,
    graceful_shutdown, logging_middleware,
};

/// The REST API server for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH", default_value = "transactions.db")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The URL of the JSON document that the seed endpoint loads.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// Requests that take longer than this many seconds are aborted.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// SQL statements that run longer than this many milliseconds are interrupted.
    #[arg(long, default_value_t = 5000)]
    sql_timeout_ms: u64,

    /// The number of transactions per page when the client does not ask for a page size.
    #[arg(long, default_value_t = 10)]
    default_page_size: u64,

    /// The largest page size a client may ask for.
    #[arg(long, default_value_t = 100)]
    max_page_size: u64,
}

impl Args {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            pagination: PaginationConfig {
                default_page_size: self.default_page_size,
                max_page_size: self.max_page_size,
                ..Default::default()
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            sql_timeout: Duration::from_millis(self.sql_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if args.default_page_size == 0 || args.default_page_size > args.max_page_size {
        eprintln!(
            "The default page size must be between 1 and the max page size ({}), got {}.",
            args.max_page_size, args.default_page_size
        );
        exit(1);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let seed_source = Arc::new(HttpSeedSource::new(&args.seed_url));
    let state = match AppState::new(conn, seed_source, args.app_config()) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
