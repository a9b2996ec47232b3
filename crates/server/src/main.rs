//! Pricewatch server binary: composition point for the domain services.

use tower_http::trace::TraceLayer;

use pricewatch_server::config::AppConfig;
use pricewatch_server::db::{self, ProductRepository, UserRepository};
use pricewatch_server::routes;
use pricewatch_server::services::{PriceChangeNotifier, ProductService, SmtpMailer, UserService};
use pricewatch_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pricewatch_server=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let product_repo = ProductRepository::new(pool.clone(), config.db_op_timeout);
    let user_repo = UserRepository::new(pool, config.db_op_timeout);
    let mailer = SmtpMailer::new(&config.email).expect("Failed to build SMTP transport");

    let users = UserService::new(user_repo);
    let catalog = ProductService::new(product_repo, users.clone(), PriceChangeNotifier::new(mailer));

    let state = AppState { catalog, users };
    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    tracing::info!(%addr, "pricewatch server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
