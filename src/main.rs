mod app;
use mindflash::*;

use anyhow::Context as _;
use app::MyApp;
use clap::Parser;
use config::Config;
use database::SqliteStore;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .init();

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let (clock, pinned_clock) = config.clock();

    let mut ctx = StudyContext::open(Box::new(store), clock, config.seed)
        .context("failed to load library")?;

    if !config.no_demo {
        ctx.seed_demo().context("failed to create sample decks")?;
    }

    tracing::info!("loaded {} decks", ctx.decks().len());
    for deck in ctx.decks() {
        tracing::info!("  - {} ({} cards)", deck.name, deck.cards.len());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MindFlash",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(ctx, pinned_clock)))),
    )
    .map_err(|e| anyhow::anyhow!("ui error: {e}"))
}
