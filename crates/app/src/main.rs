//! formid - publish, update, and resolve long-lived document identities

mod args;
mod op;
mod ops;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use common::store::ContentStore;
use service::{Config, State};

use args::Args;
use op::{Op, OpContext};
use ops::{Create, Domain, Inspect, Publish, Resolve, Restore, Retire, Rotate};

crate::command_enum! {
    (Create, Create),
    (Publish, Publish),
    (Resolve, Resolve),
    (Domain, Domain),
    (Retire, Retire),
    (Restore, Restore),
    (Rotate, Rotate),
    (Inspect, Inspect),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    let config = match &args.config {
        Some(path) => match Config::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let wallet_path = args.wallet.clone().unwrap_or_else(default_wallet_path);

    // The content store is an HTTP gateway when configured, otherwise
    // in-memory
    let code = if config.gateway_url.is_some() {
        match State::with_gateway(&config) {
            Ok(state) => run(&args.command, OpContext::new(state, wallet_path)).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    } else {
        let state = State::from_config(&config);
        run(&args.command, OpContext::new(state, wallet_path)).await
    };
    std::process::exit(code);
}

async fn run<C: ContentStore>(command: &Command, ctx: OpContext<C>) -> i32 {
    match command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn default_wallet_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".formid").join("wallet.pem"))
        .unwrap_or_else(|| PathBuf::from("wallet.pem"))
}
