use managedb::config::{self, Config};
use managedb::core::db::DatabaseHandle;
use managedb::repl::Menu;
use std::io;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Filter applied when neither RUST_LOG nor the config file sets one
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging(config: &Config) {
    let directive = config.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Logs go to stderr so the menu on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let (config, config_error) = match config::load_default_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Ignoring configuration file: {}", e);
    }

    info!("Starting managedb...");
    println!("ManageDB v{}", env!("CARGO_PKG_VERSION"));

    // A path on the command line is opened right away
    let args: Vec<String> = std::env::args().collect();
    let handle = match args.get(1) {
        Some(db_path) => {
            let mut handle = DatabaseHandle::new(db_path.as_str());
            if !handle.open(None) {
                eprintln!("failed to open DB '{}'", db_path);
            }
            handle
        }
        None => DatabaseHandle::with_auto_open(
            config.database.default_path.as_str(),
            config.database.auto_open,
        ),
    };

    println!("\nManageDB interactive\n");

    let stdin = io::stdin();
    let mut menu = Menu::new(handle, stdin.lock(), io::stdout());
    match menu.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
