//! API Server Entry Point
//!
//! Wires the feature routers onto one axum app. Uses `anyhow` for startup
//! errors; request errors go through each crate's error type.
//!
//! Without `DATABASE_URL` every store is in memory and nothing survives a
//! restart.

mod config;

use std::sync::Arc;

use admin::admin_router_generic;
use auth::{InMemoryUserRepository, PgUserRepository, UserRepository, auth_router_generic};
use axum::routing::get;
use axum::{
    Json, Router, http,
    http::{Method, header},
};
use catalog::{
    InMemoryProductRepository, PgProductRepository, ProductRepository, catalog_router_generic,
};
use orders::{InMemoryOrderRepository, OrderRepository, PgOrderRepository, orders_router_generic};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,orders=info,admin=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let api = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            api_router(
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgProductRepository::new(pool.clone())),
                Arc::new(PgOrderRepository::new(pool)),
                &config,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            memory_router(&config)
        }
    };

    let app = api
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors(&config.frontend_origins));

    let addr = config.socket_addr();
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Every feature router, nested under its prefix and sharing one user
/// store and token signer.
fn api_router<U, P, O>(users: Arc<U>, products: Arc<P>, orders: Arc<O>, config: &ApiConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    let auth_config = Arc::new(config.auth.clone());
    let tokens = Arc::new(auth_config.token_signer());

    Router::new()
        .nest("/auth", auth_router_generic(users.clone(), auth_config))
        .nest(
            "/products",
            catalog_router_generic(products.clone(), users.clone(), tokens.clone()),
        )
        .nest(
            "/admin",
            admin_router_generic(users.clone(), products.clone(), tokens.clone()),
        )
        .nest(
            "/orders",
            orders_router_generic(
                orders,
                products,
                users,
                tokens,
                Arc::new(config.orders.clone()),
            ),
        )
}

fn memory_router(config: &ApiConfig) -> Router {
    let products = InMemoryProductRepository::new();
    api_router(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(products.clone()),
        Arc::new(InMemoryOrderRepository::new(products)),
        config,
    )
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let config = ApiConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        memory_router(&config).route("/health", get(health))
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), get_req("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_prefixes_are_wired() {
        let app = app();

        let (status, body) = call(&app, get_req("/products", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, _) = call(&app, get_req("/orders", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, get_req("/admin/stats", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_client_can_register_login_and_order_nothing() {
        let app = app();

        let (status, _) = call(
            &app,
            post(
                "/auth/register",
                json!({"name": "Ana", "email": "ana@example.com", "password": "Sup3r-Secret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            &app,
            post(
                "/auth/login",
                json!({"email": "ana@example.com", "password": "Sup3r-Secret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = call(&app, get_req("/orders", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, _) = call(&app, get_req("/admin/users", Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
