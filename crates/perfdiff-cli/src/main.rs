mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Command};

const EXIT_ISSUES: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = cli.report_paths();

    // Chart mode keeps its log next to the charts, so the directory has to
    // exist before the subscriber is installed.
    if cli.command() == Command::Charts {
        if let Err(e) = tokio::fs::create_dir_all(&paths.charts_dir).await {
            logging::init(None);
            tracing::error!(
                "Failed to create charts directory {}: {e}",
                paths.charts_dir.display()
            );
            return ExitCode::from(EXIT_FAILURE);
        }
        println!("Charts directory created/verified at: {}", paths.charts_dir.display());
        logging::init(Some(&paths.log_file));
    } else {
        logging::init(None);
    }

    match commands::run(&cli, &paths).await {
        Ok(outcome) if outcome.has_issues && cli.fail_on_issues => ExitCode::from(EXIT_ISSUES),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("An error occurred during execution: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
