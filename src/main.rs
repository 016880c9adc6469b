//! Price Tracker
//!
//! Opens the price database, applies migrations, optionally installs the
//! starter catalog, logs the current price overview and optionally writes
//! the JSON export.

use price_tracker::config::AppConfig;
use price_tracker::database::{create_pool, run_migrations};
use price_tracker::error::{AppError, AppResult};
use price_tracker::services::write_export;
use price_tracker::AppState;
use tracing::{error, info};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config; JSON lines in production
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("price_tracker={},sqlx=warn", config.log_level).into()
    });
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Price Tracker starting");
    info!("Environment: {}", config.environment);
    info!("Database: {}", config.database_url());

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;
    info!("Database ready");

    let state = AppState::new(pool, &config.tracker);

    if config.seed_starter_catalog {
        info!("Installing starter catalog...");
        state.catalog.seed_starter_catalog().await?;
    }

    // =========================================================================
    // REPORTS
    // =========================================================================
    log_price_overview(&state, &config).await?;

    if let Some(path) = &config.export_path {
        let export = state
            .reports
            .build_export(
                config.tracker.stats_window_days,
                config.tracker.recent_limit,
                config.tracker.deal_threshold,
            )
            .await?;
        write_export(path, &export)?;
    }

    state.database.close().await;
    Ok(())
}

/// Log current price, deal marker and window stats for every product and retailer
async fn log_price_overview(state: &AppState, config: &AppConfig) -> AppResult<()> {
    let window_days = config.tracker.stats_window_days;
    let products = state.catalog.list_products().await?;
    let retailers = state.catalog.list_retailers().await?;

    info!("=== Current Price Overview ({} day window) ===", window_days);

    for product in &products {
        info!("{}", product);

        let per_retailer = state
            .statistics
            .stats_by_retailer(&product.id, &retailers, window_days)
            .await?;

        for (retailer, stats) in per_retailer {
            match stats {
                Some(stats) => {
                    let deal = if stats.is_good_deal(config.tracker.deal_threshold) {
                        " DEAL!"
                    } else {
                        ""
                    };
                    info!(
                        "  {:15} ${:>6.2}{} | avg ${:.2} | min ${:.2} | max ${:.2}",
                        retailer.name,
                        stats.current_price,
                        deal,
                        stats.avg_price,
                        stats.min_price,
                        stats.max_price
                    );
                }
                None => info!("  {:15} No data yet", retailer.name),
            }
        }
    }

    Ok(())
}
