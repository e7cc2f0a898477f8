/*
 * Responsibility
 * - Config読み込み → 依存生成 (repos / token codec / AuthService) → Router 組み立て
 * - Middleware の適用 (authorize / access / http / CORS)
 * - axum::serve() で起動 (graceful shutdown)
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::middleware::auth::Authenticator;
use crate::repos::{book_repo::BookRepo, food_repo::FoodRepo, memory, pg, user_repo::UserStore};
use crate::services::auth::{AccessPolicy, AuthService, TokenCodec, build_token_codec};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,libros_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast. production: default behaviour, server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let (state, tokens) = build_state(&config).await?;

    // The filter and the rule table are built here and handed to the router.
    let authenticator = Arc::new(Authenticator::new(tokens, state.users.clone()));
    let policy = Arc::new(AccessPolicy::standard());
    tracing::info!(rules = policy.rules().len(), "access policy loaded");
    let app = build_router(state, authenticator, policy, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

struct Repos {
    users: Arc<dyn UserStore>,
    books: Arc<dyn BookRepo>,
    foods: Arc<dyn FoodRepo>,
}

async fn build_repos(config: &Config) -> Result<Repos> {
    let Some(url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; using in-memory stores");
        return Ok(Repos {
            users: Arc::new(memory::InMemoryUserStore::new()),
            books: Arc::new(memory::InMemoryBookRepo::new()),
            foods: Arc::new(memory::InMemoryFoodRepo::new()),
        });
    };

    let pool = pg::connect(url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;

    Ok(Repos {
        users: Arc::new(pg::PgUserStore::new(pool.clone())),
        books: Arc::new(pg::PgBookRepo::new(pool.clone())),
        foods: Arc::new(pg::PgFoodRepo::new(pool)),
    })
}

/// Repositories (Postgres when `DATABASE_URL` is set, in-memory otherwise),
/// the token codec and the auth service. Creates the bootstrap admin if configured.
pub async fn build_state(config: &Config) -> Result<(AppState, Arc<TokenCodec>)> {
    let tokens = build_token_codec(config)?;
    let Repos { users, books, foods } = build_repos(config).await?;
    tracing::info!(backend = users.backend_name(), "credential store ready");

    let auth = Arc::new(AuthService::new(users.clone(), tokens.clone()));

    if let Some(admin) = &config.bootstrap_admin {
        auth.ensure_admin(&admin.email, &admin.password)
            .await
            .context("failed to create bootstrap admin")?;
    }

    Ok((AppState::new(users, books, foods, auth), tokens))
}

/// Layer order, outermost first: CORS, http (request-id / trace / limit / timeout),
/// access (principal), authorize (policy), handler.
pub fn build_router(
    state: AppState,
    authenticator: Arc<Authenticator>,
    policy: Arc<AccessPolicy>,
    config: &Config,
) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes());

    let router = middleware::auth::authorize::apply(router, policy);
    let router = middleware::auth::access::apply(router, authenticator);
    let router = router.with_state(state);
    let router = middleware::http::apply(router);

    middleware::cors::apply(router, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping...");
}
