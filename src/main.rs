//! Trade planning CLI for a CHF account.
//!
//! Sizes positions under a fixed fractional-risk model, derives SL/TP from
//! an R-multiple, and keeps a SQLite trade journal.

mod calc;
mod db;
mod models;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::calc::{
    compute_position_size, compute_trade_plan, Currency, Direction, PlanInput, SizingInput,
    SizingResult, SymbolKey,
};
use crate::db::{Database, StoredTrade};
use crate::models::TradeRecord;

/// Position sizing and trade planning CLI.
#[derive(Parser)]
#[command(name = "tradeplan")]
#[command(about = "Size positions and plan SL/TP for a CHF account", long_about = None)]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "sqlite:./tradeplan.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct SizingArgs {
    /// Account balance in CHF
    #[arg(short, long)]
    balance: f64,

    /// Percent of balance to risk (0 < x <= 5)
    #[arg(short, long)]
    risk_pct: f64,

    /// Symbol (XAUUSD, EURUSD, USDCHF, USDJPY)
    #[arg(short, long)]
    symbol: SymbolKey,

    /// Stop distance in pips (FX) or ticks (gold)
    #[arg(long)]
    stop_distance: f64,

    /// USD->CHF conversion rate
    #[arg(long, default_value = "0.9")]
    rate: f64,

    /// Broker lot step
    #[arg(long, default_value = "0.01")]
    lot_step: f64,

    /// Gold ounces per 1.0 lot
    #[arg(long, default_value = "100")]
    contract_size: f64,

    /// Gold tick size
    #[arg(long, default_value = "0.01")]
    tick_size: f64,

    /// Account currency (MVP: CHF only)
    #[arg(long, default_value = "CHF")]
    account_ccy: Currency,
}

#[derive(clap::Args, Clone)]
struct PlanArgs {
    /// Trade direction (LONG or SHORT)
    #[arg(long)]
    direction: Direction,

    /// Entry price
    #[arg(short, long)]
    entry: f64,

    /// Take-profit distance as a multiple of risk, e.g. 2 = 2R
    #[arg(long, default_value = "2")]
    rr: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a lot size from balance, risk % and stop distance
    Size {
        #[command(flatten)]
        sizing: SizingArgs,
    },

    /// Derive SL/TP prices from an entry and an R-multiple
    Plan {
        /// Symbol (XAUUSD, EURUSD, USDCHF, USDJPY)
        #[arg(short, long)]
        symbol: SymbolKey,

        /// Stop distance in pips (FX) or ticks (gold)
        #[arg(long)]
        stop_distance: f64,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Compute sizing + plan and save the trade to the journal
    Save {
        #[command(flatten)]
        sizing: SizingArgs,

        #[command(flatten)]
        plan: PlanArgs,

        /// Free-text journal note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List journaled trades
    List,

    /// Show one journaled trade in full
    Show {
        /// Trade id
        id: String,
    },

    /// Mark a planned trade as opened
    Open {
        /// Trade id
        id: String,
    },

    /// Close an open trade with its realized P&L
    Close {
        /// Trade id
        id: String,

        /// Realized P&L in CHF
        #[arg(long)]
        pnl: f64,
    },

    /// Cancel a planned trade
    Cancel {
        /// Trade id
        id: String,
    },
}

impl SizingArgs {
    fn to_input(&self) -> Result<SizingInput> {
        Ok(SizingInput {
            account_currency: self.account_ccy,
            balance: Decimal::try_from(self.balance)?,
            risk_pct: Decimal::try_from(self.risk_pct)?,
            symbol: self.symbol,
            stop_distance: Decimal::try_from(self.stop_distance)?,
            conversion_rate: Decimal::try_from(self.rate)?,
            lot_step: Decimal::try_from(self.lot_step)?,
            contract_size: Decimal::try_from(self.contract_size)?,
            tick_size: Decimal::try_from(self.tick_size)?,
        })
    }
}

impl PlanArgs {
    fn to_input(&self, symbol: SymbolKey, stop_distance: f64) -> Result<PlanInput> {
        Ok(PlanInput {
            symbol,
            direction: self.direction,
            entry_price: Decimal::try_from(self.entry)?,
            stop_distance: Decimal::try_from(stop_distance)?,
            reward_to_risk: Decimal::try_from(self.rr)?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Size { sizing } => {
            let input = sizing.to_input()?;
            let result = compute_position_size(&input)?;
            print_sizing(input.symbol, &result);
        }

        Commands::Plan {
            symbol,
            stop_distance,
            plan,
        } => {
            let input = plan.to_input(symbol, stop_distance)?;
            let result = compute_trade_plan(&input)?;

            println!("\n=== Trade Plan: {} {} ===", symbol, input.direction);
            println!("Entry:           {}", input.entry_price);
            println!("Stop loss:       {}", result.sl_price);
            println!("Take profit:     {}", result.tp_price);
            println!("Risk distance:   {}", result.risk_distance_price);
            println!("Reward distance: {}", result.reward_distance_price);
        }

        Commands::Save { sizing, plan, note } => {
            let sizing_input = sizing.to_input()?;
            let plan_input = plan.to_input(sizing.symbol, sizing.stop_distance)?;

            let sized = compute_position_size(&sizing_input)?;
            let planned = compute_trade_plan(&plan_input)?;
            let record =
                TradeRecord::from_calc(&sizing_input, &plan_input, &sized, &planned, note);

            let db = Database::new(&cli.database).await?;
            db.save_trade(&record).await?;
            info!(id = %record.id, "Trade saved");

            print_sizing(record.symbol, &sized);
            println!("Stop loss:       {}", planned.sl_price);
            println!("Take profit:     {}", planned.tp_price);
            println!("\nSaved as: {}", record.id);
        }

        Commands::List => {
            let db = Database::new(&cli.database).await?;
            let trades = db.list_trades().await?;

            if trades.is_empty() {
                println!("Journal is empty. Use 'tradeplan save' to add a trade.");
                return Ok(());
            }

            println!(
                "\n{:<36} {:<8} {:<6} {:>10} {:>8} {:>10} {:<10}",
                "ID", "SYMBOL", "DIR", "ENTRY", "LOTS", "RISK CHF", "STATUS"
            );
            println!("{}", "-".repeat(94));

            for trade in trades {
                println!(
                    "{:<36} {:<8} {:<6} {:>10} {:>8} {:>10.2} {:<10}",
                    trade.id,
                    trade.symbol,
                    trade.direction,
                    trade.entry_price,
                    trade.lots,
                    trade.risk_chf,
                    trade.status
                );
            }
        }

        Commands::Show { id } => {
            let db = Database::new(&cli.database).await?;
            let trade = db
                .get_trade(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No trade with id {id}"))?;
            print_stored(&trade);
        }

        Commands::Open { id } => {
            let db = Database::new(&cli.database).await?;
            db.open_trade(&id).await?;
            println!("Trade {id} is now OPEN");
        }

        Commands::Close { id, pnl } => {
            let db = Database::new(&cli.database).await?;
            let trade = db
                .get_trade(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No trade with id {id}"))?;

            let realized_r = if trade.risk_chf > 0.0 {
                Some(pnl / trade.risk_chf)
            } else {
                None
            };
            db.close_trade(&id, pnl, realized_r).await?;

            print!("Trade {id} CLOSED with {pnl:.2} CHF");
            match realized_r {
                Some(r) => println!(" ({r:+.2}R)"),
                None => println!(),
            }
        }

        Commands::Cancel { id } => {
            let db = Database::new(&cli.database).await?;
            db.cancel_trade(&id).await?;
            println!("Trade {id} CANCELLED");
        }
    }

    Ok(())
}

fn print_sizing(symbol: SymbolKey, result: &SizingResult) {
    println!("\n=== Position Size: {} ===", symbol);
    println!("Risk budget:     {} CHF", result.risk_money);
    println!(
        "Value per {}: {} CHF per 1.0 lot",
        result.distance_label.trim_end_matches('s'),
        result.value_per_unit_per_lot
    );
    println!("Stop value:      {} CHF per 1.0 lot", result.stop_value_per_lot);
    println!("Lots:            {}", result.lots);
    println!(
        "Exposure:        {} {}",
        result.exposure_units, result.unit_label
    );
}

fn print_stored(trade: &StoredTrade) {
    println!("\n=== Trade {} ===", trade.id);
    println!("Symbol:     {} {}", trade.symbol, trade.direction);
    println!("Status:     {}", trade.status);
    println!("Created:    {}", trade.created_at);

    println!("\n--- Inputs ---");
    println!("Balance:        {:.2} CHF", trade.balance_chf);
    println!("Risk:           {}%", trade.risk_pct);
    println!(
        "Stop distance:  {} {}",
        trade.stop_distance,
        trade.stop_unit.to_lowercase()
    );
    println!("Lot step:       {}", trade.lot_step);
    println!("USD->CHF rate:  {}", trade.usdchf_rate);
    if let (Some(contract), Some(tick)) = (trade.contract_size, trade.tick_size) {
        println!("Contract size:  {contract} oz");
        println!("Tick size:      {tick}");
    }

    println!("\n--- Outputs ---");
    println!("Entry:          {}", trade.entry_price);
    println!("Stop loss:      {}", trade.sl_price);
    println!("Take profit:    {}", trade.tp_price);
    println!("Lots:           {}", trade.lots);
    println!("Exposure:       {}", trade.exposure_units);
    println!("Risk:           {:.2} CHF", trade.risk_chf);
    println!(
        "Reward:         {:.2} CHF ({}R)",
        trade.reward_chf, trade.reward_to_risk
    );

    println!("\n--- Journal ---");
    if let Some(note) = &trade.note {
        println!("Note:       {note}");
    }
    if let Some(opened) = &trade.opened_at {
        println!("Opened:     {opened}");
    }
    if let Some(closed) = &trade.closed_at {
        println!("Closed:     {closed}");
    }
    if let Some(pnl) = trade.realized_pnl_chf {
        println!("Realized:   {pnl:.2} CHF");
    }
    if let Some(r) = trade.realized_r_multiple {
        println!("Realized R: {r:+.2}");
    }
}
