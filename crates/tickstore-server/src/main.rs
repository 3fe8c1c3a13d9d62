use anyhow::Context;
use clap::Parser;
use tickstore_core::UtcDateTime;
use tickstore_server::config::{SeedArgs, Settings};
use tickstore_server::seed::{self, SeedPlan};
use tickstore_server::{create_router, init_tracing, AppState, Cli, Command};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = &cli.settings;

    let store = settings.open_store().context("failed to open store")?;
    let state = AppState::with_store(
        store,
        settings.service_config(),
        settings.environment.clone(),
    );
    tracing::info!(store = state.service.store_name(), "store ready");

    match cli.resolved_command() {
        Command::Serve => serve(state, settings).await,
        Command::Seed(args) => run_seed(state, args).await,
    }
}

async fn serve(state: AppState, settings: &Settings) -> anyhow::Result<()> {
    let app = create_router(state, &settings.cors_origins);
    let listener = TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    tracing::info!(addr = %settings.bind, environment = %settings.environment, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shut down");
    Ok(())
}

async fn run_seed(state: AppState, args: SeedArgs) -> anyhow::Result<()> {
    let mut rng = args
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let plan = SeedPlan {
        days: args.days,
        step_minutes: args.step_minutes,
        end: UtcDateTime::now(),
    };

    let summary = seed::run(&state.service, plan, &mut rng)
        .await
        .context("seeding failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
