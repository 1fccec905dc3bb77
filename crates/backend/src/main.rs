pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::{ServeDir, ServeFile};

    use crate::shared::config;
    use crate::system::middleware::request_logger::request_logger;

    system::tracing::initialize()?;

    let cfg = config::load_config()?;
    config::init(cfg);
    let cfg = config::get();

    let db_path = config::get_database_path(cfg);
    tracing::info!("Database: {}", db_path.display());
    shared::data::db::initialize_database(&db_path).await?;

    // Resolve (or create) the signing secret before the first request
    system::auth::jwt::get_jwt_secret().await?;
    system::initialization::ensure_admin_user_exists().await?;

    if cfg.seed.demo_data {
        if let Err(e) = system::initialization::seed_demo_data().await {
            tracing::error!("Demo data seeding failed: {:#}", e);
        }
    }

    let uploads_dir = config::get_uploads_dir(cfg);
    std::fs::create_dir_all(&uploads_dir)?;
    let static_dir = config::resolve_path(&cfg.server.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Unknown paths fall back to index.html so client-side routes survive a reload
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let app = routes::configure_routes()
        .nest_service("/uploads", ServeDir::new(&uploads_dir))
        .fallback_service(spa)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let ip: std::net::IpAddr = cfg.server.host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid host '{}', listening on 0.0.0.0", cfg.server.host);
        std::net::IpAddr::from([0, 0, 0, 0])
    });
    let addr = SocketAddr::new(ip, cfg.server.port);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Stop the other process or change [server] port in config.toml.",
                    cfg.server.port
                );
            } else {
                tracing::error!("Failed to bind to {}: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;
    Ok(())
}
