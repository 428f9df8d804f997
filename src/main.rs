// AlumnosAdmin - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. Command execution

use alumnos_admin::app::session;
use alumnos_admin::cli::{self, Cli, Context};
use alumnos_admin::platform::config::{self, PlatformPaths};
use alumnos_admin::util;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();

    // Explicit --config must load; the platform default may be absent or broken.
    let (app_config, config_warnings) = match cli.config {
        Some(ref path) => match config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                util::logging::init(cli.debug, None, None);
                tracing::error!(error = %e, "Cannot load config file");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => config::load_config(&platform_paths.config_file()),
    };

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "{} starting",
        util::constants::APP_NAME
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let session_file = Some(session::session_path(&platform_paths.data_dir));
    let ctx = Context::from_cli(&cli, app_config, session_file);

    match cli::execute(&cli.command, &ctx) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
