use std::{process, sync::Arc};

use storefront::{
    application::{
        error::AppError,
        repos::{CatalogStats, StoreWriteRepo, StorefrontRepo},
        storefront::{MediaUrls, StorefrontService},
        vendor::VendorStoreService,
    },
    config,
    freshness::CachePolicy,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HealthCheck, HttpState},
        telemetry,
    },
};
use tokio::{signal, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::Migration(err.to_string())))?;
    info!(target = "storefront::migrate", "Migrations applied");
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::Migration(err.to_string())))?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let (http_state, admin_state) = build_states(repositories, &settings);

    serve_http(&settings, http_state, admin_state).await
}

async fn connect(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))
}

fn build_states(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> (HttpState, AdminState) {
    let storefront_repo: Arc<dyn StorefrontRepo> = repositories.clone();
    let catalog_stats: Arc<CatalogStats> = repositories.clone();
    let write_repo: Arc<dyn StoreWriteRepo> = repositories.clone();
    let health: Arc<dyn HealthCheck> = repositories;

    let storefront = Arc::new(StorefrontService::new(
        storefront_repo.clone(),
        catalog_stats,
        MediaUrls::new(settings.media.base_url.clone()),
    ));
    let vendors = Arc::new(VendorStoreService::new(write_repo, storefront_repo));

    let cache_policy = CachePolicy::new(
        settings.freshness.enabled,
        settings.freshness.vary.clone(),
    );
    if !cache_policy.is_enabled() {
        warn!(
            target = "storefront::serve",
            "Conditional revalidation disabled; public reads will not emit validators"
        );
    }

    let http_state = HttpState {
        storefront,
        cache_policy,
        health: health.clone(),
    };
    let admin_state = AdminState { vendors, health };

    (http_state, admin_state)
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "storefront::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "Listening"
    );

    let grace = settings.server.graceful_shutdown;
    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(shutdown_signal());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    let servers = async { try_join!(public_server, admin_server) };
    let drained = async {
        shutdown_signal().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = servers => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drained => {
            warn!(
                target = "storefront::serve",
                seconds = grace.as_secs(),
                "Graceful shutdown timed out; exiting"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(target = "storefront::serve", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "storefront::serve", "Shutdown signal received");
}
