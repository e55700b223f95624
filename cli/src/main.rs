//! XYK CLI - local driver for the constant product pool
//!
//! Loads the pool record and holder ledger from a JSON state file, runs one
//! pool transition through `xyk_model`, and writes both back atomically.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use xyk_model::{PoolInstruction, SwapDirection, MAX_FEE_BPS};

mod commands;
mod config;
mod ledger;
mod store;

use config::XykConfig;

#[derive(Parser)]
#[command(name = "xyk")]
#[command(about = "Constant product (x*y=k) pool driver", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (defaults to ./xyk.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file (overrides config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    /// Supply asset A, receive asset B
    AToB,
    /// Supply asset B, receive asset A
    BToA,
}

impl From<DirectionArg> for SwapDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::AToB => SwapDirection::AToB,
            DirectionArg::BToA => SwapDirection::BToA,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the pool with seed reserves
    Init {
        /// Seed amount of asset A
        amount_a: u64,

        /// Seed amount of asset B
        amount_b: u64,

        /// Swap fee in basis points (defaults to config)
        #[arg(long)]
        fee_bps: Option<u16>,
    },

    /// Deposit both assets and mint shares
    Add {
        /// Amount of asset A
        amount_a: u64,

        /// Amount of asset B
        amount_b: u64,

        /// Holder credited with the minted shares
        #[arg(long, default_value = "default")]
        holder: String,
    },

    /// Swap one asset for the other
    Swap {
        /// Input amount
        amount_in: u64,

        /// Minimum acceptable output
        #[arg(long, default_value = "0")]
        min_out: u64,

        /// Swap direction
        #[arg(short, long, value_enum, default_value = "a-to-b")]
        direction: DirectionArg,
    },

    /// Burn shares and withdraw both assets
    Remove {
        /// Shares to burn
        shares: u64,

        /// Holder whose shares are burned
        #[arg(long, default_value = "default")]
        holder: String,
    },

    /// Preview a swap without changing state
    Quote {
        /// Input amount
        amount_in: u64,

        /// Swap direction
        #[arg(short, long, value_enum, default_value = "a-to-b")]
        direction: DirectionArg,
    },

    /// Show pool and holders
    Show,

    /// Apply a JSON array of instructions in order
    Replay {
        /// Instruction file
        file: PathBuf,

        /// Holder used for add and remove steps
        #[arg(long, default_value = "default")]
        holder: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = XykConfig::load(cli.config.as_deref())?.with_state_path(cli.state);

    if cli.verbose {
        println!("{} {}", "State file:".bright_cyan(), config.state_path.display());
        println!("{} {}", "Default fee (bps):".bright_cyan(), config.fee_bps);
    }

    match cli.command {
        Commands::Init { amount_a, amount_b, fee_bps } => {
            let fee_bps = fee_bps.unwrap_or(config.fee_bps);
            if fee_bps > MAX_FEE_BPS {
                anyhow::bail!("fee_bps {} exceeds maximum {}", fee_bps, MAX_FEE_BPS);
            }
            let instruction = PoolInstruction::Initialize { amount_a, amount_b, fee_bps };
            commands::run_instruction(&config, instruction, "default")?;
        }
        Commands::Add { amount_a, amount_b, holder } => {
            let instruction = PoolInstruction::AddLiquidity { amount_a, amount_b };
            commands::run_instruction(&config, instruction, &holder)?;
        }
        Commands::Swap { amount_in, min_out, direction } => {
            let instruction = PoolInstruction::Swap {
                amount_in,
                min_amount_out: min_out,
                direction: direction.into(),
            };
            commands::run_instruction(&config, instruction, "default")?;
        }
        Commands::Remove { shares, holder } => {
            let instruction = PoolInstruction::RemoveLiquidity { shares };
            commands::run_instruction(&config, instruction, &holder)?;
        }
        Commands::Quote { amount_in, direction } => {
            commands::quote(&config, amount_in, direction.into())?;
        }
        Commands::Show => {
            commands::show(&config)?;
        }
        Commands::Replay { file, holder } => {
            commands::replay(&config, &file, &holder)?;
        }
    }

    Ok(())
}
