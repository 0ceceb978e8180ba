//! tradepulse: personal trading-performance tracker.
//!
//! Logs discrete trades and derives the compounding savings ledger, a
//! composite account health score, and multi-horizon growth projections.

mod db;
mod engine;
mod models;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::db::Database;
use crate::engine::{
    compute_ledger, health_score, pip_count, ProjectionInputs, Projector, StatsCalculator,
};
use crate::models::{Trade, TradeDirection};

/// Trading journal CLI.
#[derive(Parser)]
#[command(name = "tradepulse")]
#[command(about = "Track trading performance, compounding savings, and account health", long_about = None)]
struct Cli {
    /// Database file path
    #[arg(
        short,
        long,
        env = "TRADEPULSE_DATABASE",
        default_value = "sqlite:./tradepulse.db?mode=rwc"
    )]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new trade
    Add {
        /// Instrument symbol (e.g. EURUSD, XAUUSD, NAS100)
        #[arg(short, long)]
        instrument: String,

        /// Trade direction (long or short)
        #[arg(short = 'D', long, default_value = "long")]
        direction: String,

        /// Position size in lots
        #[arg(short, long, default_value = "0.01")]
        lots: f64,

        /// Entry price
        #[arg(short, long)]
        entry: Option<f64>,

        /// Exit price
        #[arg(short = 'x', long)]
        exit: Option<f64>,

        /// Realized profit/loss in dollars
        #[arg(short, long, allow_hyphen_values = true)]
        profit: f64,
    },

    /// Delete a trade by id
    Delete {
        /// Trade id as shown by 'list'
        id: String,
    },

    /// List logged trades
    List {
        /// Maximum number of trades to show (most recent first)
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Emit the full journal as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the account ledger and journal statistics
    Status,

    /// Show the composite account health score
    Health,

    /// Project account growth across fixed horizons
    Project {
        /// Also print the 12-month growth-chart checkpoints
        #[arg(long)]
        chart: bool,
    },

    /// Show or update account configuration
    Config {
        /// Starting capital in dollars
        #[arg(long)]
        capital: Option<f64>,

        /// Daily risk limit as a percentage of starting capital
        #[arg(long)]
        risk: Option<f64>,

        /// Percentage of each winning trade's profit diverted into savings
        #[arg(long)]
        compounding: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize database
    let db = Database::new(&cli.database).await?;

    match cli.command {
        Commands::Add {
            instrument,
            direction,
            lots,
            entry,
            exit,
            profit,
        } => {
            let instrument = instrument.to_uppercase();
            let direction = TradeDirection::from_str(&direction);
            let entry = entry.map(Decimal::try_from).transpose()?;
            let exit = exit.map(Decimal::try_from).transpose()?;

            // Pips are normalized once, at entry time; profit stays authoritative
            let pips = pip_count(&instrument, direction, entry, exit);

            let trade = Trade::new(
                instrument,
                direction,
                Decimal::try_from(lots)?,
                entry,
                exit,
                pips,
                Decimal::try_from(profit)?,
            );

            db.insert_trade(&trade).await?;
            info!(id = %trade.id, instrument = %trade.instrument, "Trade logged");

            println!(
                "Logged {} {} {} lots | {} pips | P&L ${:.2}",
                trade.instrument,
                trade.direction.as_str(),
                trade.lot_size,
                trade.pips,
                trade.profit
            );
            println!("Id: {}", trade.id);
        }

        Commands::Delete { id } => {
            if db.delete_trade(&id).await? {
                println!("Deleted trade {}", id);
            } else {
                println!("No trade with id {}", id);
            }
        }

        Commands::List { limit, json } => {
            let trades = db.get_trades().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&trades)?);
                return Ok(());
            }

            if trades.is_empty() {
                println!("No trades logged yet. Use 'tradepulse add' to log one.");
                return Ok(());
            }

            println!(
                "\n{:<36} {:<16} {:<10} {:>5} {:>8} {:>10}",
                "ID", "DATE", "INSTRUMENT", "DIR", "PIPS", "P&L"
            );
            println!("{}", "-".repeat(92));

            for trade in trades.iter().rev().take(limit) {
                println!(
                    "{:<36} {:<16} {:<10} {:>5} {:>8} {:>10.2}",
                    trade.id,
                    trade.created_at.format("%Y-%m-%d %H:%M"),
                    truncate(&trade.instrument, 10),
                    trade.direction.as_str(),
                    trade.pips,
                    trade.profit
                );
            }
        }

        Commands::Status => {
            let config = db.get_account().await?;
            let trades = db.get_trades().await?;

            let ledger =
                compute_ledger(&trades, config.starting_capital, config.compounding_percent);
            let stats = StatsCalculator::calculate(&trades, &config, Utc::now().date_naive());

            println!("\n=== Account ===");
            println!("Starting Capital: ${:.2}", config.starting_capital);
            println!("Available:        ${:.2}", ledger.available);
            println!("Saved:            ${:.2}", ledger.saved);
            println!("Total Value:      ${:.2}", ledger.total());
            println!("Realized P&L:     ${:.2}", ledger.realized_profit);
            println!("ROI:              {:.1}%", stats.roi_percent);

            println!("\n=== Journal ===");
            println!("Total Trades:     {}", stats.total_trades);
            println!(
                "Win Rate:         {:.1}% ({}/{})",
                stats.win_rate, stats.winning_trades, stats.total_trades
            );
            println!("Avg Win:          ${:.2}", stats.avg_win);
            println!("Avg Loss:         ${:.2}", stats.avg_loss);
            println!("Profit Factor:    {:.2}", stats.profit_factor);
            println!("Trading Days:     {}", stats.unique_trading_days);
            println!("Avg Daily P&L:    ${:.2}", stats.avg_daily_profit);
            println!("Daily Volatility: ${:.2}", stats.daily_volatility);

            println!("\n=== Today ===");
            println!("P&L:              ${:.2}", stats.today_pl);
            println!(
                "Risk Used:        {:.1}% of ${:.2}",
                stats.risk_used_percent,
                config.daily_risk_limit()
            );
        }

        Commands::Health => {
            let config = db.get_account().await?;
            let trades = db.get_trades().await?;

            let stats = StatsCalculator::calculate(&trades, &config, Utc::now().date_naive());
            let health = health_score(
                stats.win_rate,
                stats.risk_used_percent,
                stats.roi_percent,
                stats.today_pl,
            );

            println!("{}", health);
        }

        Commands::Project { chart } => {
            let config = db.get_account().await?;
            let trades = db.get_trades().await?;

            let ledger =
                compute_ledger(&trades, config.starting_capital, config.compounding_percent);
            let stats = StatsCalculator::calculate(&trades, &config, Utc::now().date_naive());

            let inputs = ProjectionInputs {
                ledger,
                avg_daily_profit: stats.avg_daily_profit,
                win_rate_percent: (stats.total_trades > 0).then_some(stats.win_rate),
                daily_risk_limit: config.daily_risk_limit(),
                compounding_percent: config.compounding_percent,
            };

            let projector = Projector::default();
            let snapshots = projector.project(&inputs);

            println!("\n{:=^76}", " GROWTH PROJECTION ");
            println!("Starting from: ${:.2} total", ledger.total());
            println!();
            println!(
                "{:<10} {:>12} {:>12} {:>12} {:>12} {:>8}",
                "HORIZON", "AVAILABLE", "SAVED", "TOTAL", "GROWTH", "MULT"
            );
            println!("{}", "-".repeat(72));

            for snapshot in &snapshots {
                println!(
                    "{:<10} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>7.2}x",
                    snapshot.label,
                    snapshot.available,
                    snapshot.saved,
                    snapshot.total_value,
                    snapshot.growth,
                    snapshot.multiplier
                );
            }

            if chart {
                println!("\n--- Monthly Checkpoints ---");
                println!(
                    "{:<6} {:>12} {:>12} {:>12}",
                    "MONTH", "AVAILABLE", "SAVED", "TOTAL"
                );
                println!("{}", "-".repeat(46));

                for point in projector.monthly_checkpoints(&inputs) {
                    println!(
                        "{:<6} {:>12.2} {:>12.2} {:>12.2}",
                        point.month, point.available, point.saved, point.total_value
                    );
                }
            }
        }

        Commands::Config {
            capital,
            risk,
            compounding,
        } => {
            let mut config = db.get_account().await?;
            let mut changed = false;

            if let Some(capital) = capital {
                config.starting_capital = Decimal::try_from(capital)?;
                changed = true;
            }
            if let Some(risk) = risk {
                config.daily_risk_limit_percent = Decimal::try_from(risk)?;
                changed = true;
            }
            if let Some(compounding) = compounding {
                config.compounding_percent = Decimal::try_from(compounding)?;
                changed = true;
            }

            if changed {
                db.save_account(&config).await?;
                info!("Account configuration updated");
            }

            println!("\n=== Account Configuration ===");
            println!("Starting Capital:  ${:.2}", config.starting_capital);
            println!(
                "Daily Risk Limit:  {:.1}% (${:.2}/day)",
                config.daily_risk_limit_percent,
                config.daily_risk_limit()
            );
            println!(
                "Compounding:       {:.1}% of winning profit",
                config.compounding_percent
            );
        }
    }

    Ok(())
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
