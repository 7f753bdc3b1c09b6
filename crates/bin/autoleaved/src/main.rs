//! # autoleaved
//!
//! The autoleave daemon.
//!
//! Composition root that wires all adapters together and runs the poll
//! scheduler until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Seed the keyword preference when configured
//! - Build the host tree source (JSON script or built-in demo)
//! - Construct the step machine and the scheduler, injecting adapters via port traits
//! - Stop the scheduler on Ctrl+C and wait for the running tick to finish
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use autoleave_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteKeywordStore};
use autoleave_adapter_virtual::{ScriptedHost, demo_script};
use autoleave_app::scheduler::PollScheduler;
use autoleave_app::step_machine::StepMachine;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.logging.filter)?)
        .with(fmt::layer().with_target(true))
        .init();

    // Storage
    let db = StorageConfig::new(config.database_url()).build().await?;
    let keywords = SqliteKeywordStore::new(db.pool().clone());
    if let Some(seed) = &config.storage.seed_keywords {
        keywords.set_keywords(seed).await?;
    }
    tracing::info!(keywords = %keywords.raw_keywords().await?, "keyword preference loaded");

    // Host
    let host = match &config.host.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading screen script");
            ScriptedHost::from_path(path)?
        }
        None => {
            tracing::info!("no screen script configured, using the built-in demo");
            ScriptedHost::new(&demo_script())?
        }
    };

    // Automation
    let machine = StepMachine::new(host, keywords, config.target.clone());
    let scheduler = PollScheduler::new(machine, config.polling.interval_policy());
    let handle = scheduler.spawn();
    tracing::info!(
        package = %config.target.package,
        policy = ?config.polling.policy,
        "autoleaved running, press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    handle.stop();
    let status_rx = handle.subscribe();
    handle.join().await?;
    let status = status_rx.borrow().clone();
    db.close().await;

    tracing::info!(
        ticks = status.ticks,
        failed_ticks = status.failed_ticks,
        completed_cycles = status.completed_cycles,
        "autoleaved stopped"
    );
    Ok(())
}
