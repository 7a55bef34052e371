//! CLI module for nexttrack.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Running one recommendation session and printing its progress
//!
//! # Usage
//!
//! ```ignore
//! use nexttrack::cli::{parse_args, run_recommend, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Recommend(args) => {
//!         let state = run_recommend(args).await?;
//!         std::process::exit(exit_code(&state));
//!     }
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, RecommendArgs, USAGE};
pub use output::{exit_code, final_report, SnapshotPrinter};
pub use version::{handle_version_command, version_line, VERSION};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing::debug;

use crate::client::RecommendationClient;
use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::models::{Preferences, RecommendationRequest};
use crate::session::SessionController;
use crate::state::StreamState;

/// Layer `--config` (or the default file) and the environment, then the
/// `--endpoint` flag.
pub fn build_config(args: &RecommendArgs) -> Result<ClientConfig> {
    let config = match &args.config {
        Some(path) => ClientConfig::load_file(path)?.apply_env()?,
        None => ClientConfig::load()?,
    };
    Ok(match &args.endpoint {
        Some(endpoint) => config.with_endpoint(endpoint.clone()),
        None => config,
    })
}

/// Build the request, defaulting unset preferences.
pub fn build_request(args: &RecommendArgs) -> Result<RecommendationRequest, RequestError> {
    let defaults = Preferences::default();
    let preferences = Preferences::new(
        args.energy.unwrap_or(defaults.energy),
        args.obscurity.unwrap_or(defaults.obscurity),
        args.mood.unwrap_or(defaults.mood),
    )?;
    RecommendationRequest::new(args.tracks.iter().cloned(), preferences)
}

/// Run one session, printing progress to stdout, and return its final state.
///
/// With `--json` only the final state is printed.
pub async fn run_recommend(args: RecommendArgs) -> Result<StreamState> {
    let config = build_config(&args).wrap_err("failed to load configuration")?;
    let request = build_request(&args).wrap_err("invalid request")?;
    debug!(endpoint = %config.endpoint, "Using configuration");

    let client = RecommendationClient::from_config(&config)
        .wrap_err("failed to create HTTP client")?;
    let controller = SessionController::new(client);
    let mut updates = controller.subscribe();
    let mut printer = SnapshotPrinter::new().verbose(tracing::enabled!(tracing::Level::DEBUG));

    let handle = controller.submit(request);
    if let Some(deadline) = args.deadline {
        handle.cancel_after(deadline);
    }

    let printing = async {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.session_id != handle.id() {
                continue;
            }
            let lines = printer.changes(&state);
            if !args.json {
                for line in lines {
                    println!("{}", line);
                }
            }
            if !state.is_streaming {
                break;
            }
        }
    };

    // a cancelled session publishes nothing further, so stop watching
    tokio::select! {
        _ = printing => {}
        _ = handle.cancelled() => {}
        _ = tokio::signal::ctrl_c() => handle.cancel(),
    }

    let state = handle.wait().await.wrap_err("recommendation session panicked")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", final_report(&state));
    }
    Ok(state)
}
