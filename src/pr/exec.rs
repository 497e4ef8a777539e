use super::azure::AzureDevOpsClient;
use super::metrics::{calculate_git_metrics, get_pr_metrics, mean_lead_time_hours};
use super::output::{write_commit_report, write_pr_report};
use crate::cli::CommonArgs;
use anyhow::Context;
use console::style;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct PrArgs {
    pub org_url: String,
    pub project: String,
    pub pat: String,
    pub test_connectivity: bool,
    pub output: PathBuf,
    pub git_output: PathBuf,
}

pub fn exec(common: CommonArgs, args: PrArgs) -> anyhow::Result<()> {
    let client = AzureDevOpsClient::new(&args.org_url, &args.project, &args.pat);

    if args.test_connectivity {
        if client.test_connectivity() {
            info!("Connectivity test successful.");
            println!("{}", style("Connectivity test successful.").green());
        } else {
            error!("Connectivity test failed.");
            println!("{}", style("Connectivity test failed.").red());
        }
        return Ok(());
    }

    info!("Starting analysis...");
    let git_metrics = calculate_git_metrics(common.repo.as_deref());
    for metric in &git_metrics {
        info!("{metric:?}");
    }

    let pr_metrics = if args.org_url.is_empty() || args.project.is_empty() {
        warn!("Azure DevOps organisation URL or project not set; skipping PR metrics.");
        Vec::new()
    } else {
        get_pr_metrics(&client)
    };
    for metric in &pr_metrics {
        info!("{metric:?}");
    }

    write_commit_report(&args.git_output, &git_metrics).context("Failed to write git metrics")?;
    write_pr_report(&args.output, &pr_metrics).context("Failed to write PR metrics")?;

    println!("{}", style("PR Metrics Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Commits analysed: {}", style(git_metrics.len()).cyan());
    println!(
        "Commits referencing an issue: {}",
        style(git_metrics.iter().filter(|m| m.issue_ref.is_some()).count()).cyan()
    );
    println!("Completed pull requests: {}", style(pr_metrics.len()).cyan());
    if let Some(hours) = mean_lead_time_hours(&pr_metrics) {
        let lead = Duration::from_secs((hours * 3600.0).round() as u64);
        println!(
            "Mean lead time: {}",
            style(humantime::format_duration(lead)).yellow()
        );
    }
    println!(
        "\nWrote {} and {}",
        args.git_output.display(),
        args.output.display()
    );

    info!("Analysis completed.");
    Ok(())
}
