use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use hnjobs::api::HnClient;
use hnjobs::core::config::{self, HnjobsConfig};
use hnjobs::core::state::App;
use hnjobs::screens;
use hnjobs::tui::TerminalConsole;
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(
    name = "hnjobs",
    version,
    about = "Triage Hacker News \"Who is hiring?\" threads from the terminal"
)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to hnjobs.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("hnjobs.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    info!("hnjobs starting up");

    let raw_config = config::load_config().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        HnjobsConfig::default()
    });
    let resolved = config::resolve(&raw_config);
    let client = Arc::new(HnClient::new(Some(resolved.api_base_url.clone())));

    let mut app = match App::load(client, resolved) {
        Ok(app) => app,
        Err(e) => {
            error!("Refusing to start: {}", e);
            eprintln!("hnjobs: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The console is dropped, restoring the terminal, before anything is printed
    let end = match TerminalConsole::new(app.config.colors) {
        Ok(mut console) => screens::run_session(&mut app, &mut console).await,
        Err(e) => {
            error!("Failed to initialize terminal: {}", e);
            eprintln!("hnjobs: terminal error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut code = ExitCode::SUCCESS;
    if let Some(e) = end.ui_error() {
        eprintln!("hnjobs: terminal error: {e}");
        code = ExitCode::FAILURE;
    }
    if let Err(e) = &end.save {
        eprintln!("hnjobs: {e}");
        code = ExitCode::FAILURE;
    }
    code
}
