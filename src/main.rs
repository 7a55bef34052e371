use nexttrack::cli::{
    exit_code, handle_version_command, parse_args, run_recommend, CliCommand, USAGE,
};

use color_eyre::Result;
use tracing_subscriber::prelude::*;

/// Logs go to stderr so stdout carries only the recommendation output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexttrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Recommend(args) => {
            init_tracing();
            let state = run_recommend(args).await?;
            let code = exit_code(&state);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
