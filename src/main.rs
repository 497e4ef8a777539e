use gmetrics::cli::Cli;
use gmetrics::logging::Logger;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = match Logger::new(&cli.log_config()) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to set up logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = logger.install();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Script failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
