use clap::Parser;
use leisure_client::command::Cli;
use leisure_client::handlers::{self, Outcome};
use leisure_client::{App, ClientConfig};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = ClientConfig::from_env()?;
    info!(api = %config.api_url, "starting");
    let app = App::from_config(&config)?;

    match handlers::handle(&app, cli.command, &mut confirm).await {
        Outcome::Done(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failed(text) => {
            eprintln!("{text}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn confirm(message: &str) -> bool {
    print!("{message} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
