use super::analyse::analyse;
use super::output::write_report;
use crate::cli::CommonArgs;
use crate::git::{BranchHistory, GitCli, GitRepo};
use crate::model::DateWindow;
use crate::util::{branch_report_file_name, default_start_date, today};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use console::style;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub struct BranchArgs {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub default_branch: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn exec(common: CommonArgs, args: BranchArgs) -> anyhow::Result<()> {
    let window = DateWindow::new(
        args.start_date.unwrap_or_else(default_start_date),
        args.end_date.unwrap_or_else(today),
    )
    .context("Failed to resolve date range")?;
    info!(
        "Starting branch analysis for date range: {} to {}",
        window.start, window.end
    );

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let git = GitCli::new(repo.path());

    let default_branch = match args.default_branch {
        Some(branch) => branch,
        None => match git.default_branch() {
            Ok(branch) => branch,
            Err(e) => {
                error!(event = "branches.default_branch_failed", error = %e, "Default branch detection failed. Exiting.");
                return Ok(());
            }
        },
    };
    info!("Default branch: {default_branch}");

    let records = analyse(&git, &default_branch, &window, Utc::now());
    if records.is_empty() {
        warn!("No branches match the specified date range.");
        return Ok(());
    }

    let path = args.output.unwrap_or_else(|| {
        PathBuf::from(branch_report_file_name(repo.path(), window.start, window.end))
    });
    let written = write_report(&path, &records).context("Failed to write branch report")?;

    println!(
        "{} {} branches to {}",
        style("Wrote").green().bold(),
        style(written).cyan(),
        path.display()
    );
    Ok(())
}
