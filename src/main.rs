use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{info, warn};
use std::error::Error;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal::ctrl_c;

mod config;
mod errors;
mod models;
mod repositories;
mod screens;
mod services;
mod utils;

use crate::config::Config;
use crate::errors::FetchError;
use crate::screens::{delegators, slots, validator_details, validators, Screen};
use crate::services::api_client::{ApiClient, ReqwestTransport};
use crate::services::cache_store::CacheStore;
use crate::services::database;
use crate::services::fetch_service::{FetchService, Resource};
use crate::services::resources::{
    DelegatorsResource, DelegatorsService, SlotsResource, SlotsService, ValidatorDetailResource,
    ValidatorDetailService, ValidatorsResource, ValidatorsService,
};

#[derive(Debug, Parser)]
#[command(name = "solana-beach", version, about = "Browse Solana validators from the terminal")]
struct Cli {
    /// Offer to retry after a failed request
    #[arg(long, short)]
    interactive: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Network statistics and the top validators
    Validators,
    /// Details of one validator
    Validator { pubkey: String },
    /// Stake accounts delegating to a validator
    Delegators { pubkey: String },
    /// Proposed slots of a validator, by epoch
    Slots { pubkey: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    info!("Starting Solana Beach explorer");
    let config = Config::from_env()?;

    let store = database::open_store(&config).await?;
    let cache = CacheStore::new(store, config.cache_ttl);
    let api = ApiClient::new(&config, Arc::new(ReqwestTransport::new()));
    info!("Using API at {}", config.api_url);

    match cli.command {
        Command::Validators => {
            let service: ValidatorsService = FetchService::new(ValidatorsResource, api, cache);
            if service.warm(&()).await {
                info!("Showing cached validators while refreshing");
            }
            run_screen(Screen::new(service, (), validators::present), cli.interactive, ctrl_c).await
        }
        Command::Validator { pubkey } => {
            let service: ValidatorDetailService = FetchService::new(ValidatorDetailResource, api, cache);
            run_screen(
                Screen::new(service, pubkey, validator_details::present),
                cli.interactive,
                ctrl_c,
            )
            .await
        }
        Command::Delegators { pubkey } => {
            let service: DelegatorsService = FetchService::new(DelegatorsResource, api, cache);
            run_screen(Screen::new(service, pubkey, delegators::present), cli.interactive, ctrl_c).await
        }
        Command::Slots { pubkey } => {
            let service: SlotsService = FetchService::new(SlotsResource, api, cache);
            run_screen(Screen::new(service, pubkey, slots::present), cli.interactive, ctrl_c).await
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Interrupted,
}

/// Shows a screen until it loads. An interrupt abandons the request and
/// ends the run with [`FetchError::Cancelled`] without rendering.
async fn run_screen<R, I, F>(mut screen: Screen<R>, interactive: bool, interrupt: I) -> Result<(), Box<dyn Error>>
where
    R: Resource,
    I: Fn() -> F,
    F: Future<Output = io::Result<()>>,
{
    let service = Arc::clone(screen.service());
    if until_interrupted(&*service, screen.mount(), interrupt()).await == Outcome::Interrupted {
        return Err(FetchError::Cancelled.into());
    }

    loop {
        let view = screen.view();
        println!("{}", view);

        if !view.is_failed() {
            return Ok(());
        }
        if !interactive || !confirm_retry().await? {
            return Err(format!("{} could not be loaded", view.title).into());
        }
        if until_interrupted(&*service, screen.retry(), interrupt()).await == Outcome::Interrupted {
            return Err(FetchError::Cancelled.into());
        }
    }
}

/// Runs a fetch, cancelling it when `interrupt` resolves instead of
/// killing the process.
async fn until_interrupted<R: Resource>(
    service: &FetchService<R>,
    fetch: impl Future<Output = ()>,
    interrupt: impl Future<Output = io::Result<()>>,
) -> Outcome {
    tokio::pin!(fetch);
    tokio::select! {
        _ = &mut fetch => Outcome::Finished,
        signal = interrupt => match signal {
            Ok(()) => {
                warn!("Interrupted, cancelling request");
                service.cancel();
                fetch.await;
                Outcome::Interrupted
            }
            Err(e) => {
                warn!("Could not listen for Ctrl-C: {}", e);
                fetch.await;
                Outcome::Finished
            }
        },
    }
}

async fn confirm_retry() -> std::io::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Retry? [y/N] ").await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
