use crate::branches::BranchArgs;
use crate::churn::ChurnArgs;
use crate::logging::{LogConfig, LogLevel};
use crate::pr::PrArgs;
use crate::util::parse_iso_date;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gmetrics")]
#[command(about = "Git reporting tool for commit churn, branch lifecycle and pull request lead time")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, alias = "repo-path", help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, help = "Write log lines to this file instead of the terminal")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        ignore_case = true,
        help = "Logging level (default: INFO, WARNING for pr-metrics)"
    )]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-commit added/removed/modified line counts for one branch
    Churn {
        #[arg(long, help = "Git branch to analyze (default: current branch)")]
        branch: Option<String>,

        #[arg(long, value_parser = parse_iso_date, help = "Start date, YYYY-MM-DD (default: 180 days ago)")]
        start_date: Option<NaiveDate>,

        #[arg(long, value_parser = parse_iso_date, help = "End date, YYYY-MM-DD (default: today)")]
        end_date: Option<NaiveDate>,

        #[arg(long, help = "CSV path (default: <branch>_<start>_<end>_commit_churn.csv)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Skip the merge-aware modified_lines column")]
        simple: bool,
    },
    /// Creation date, parent, age and merge state of local branches
    Branches {
        #[arg(long, value_parser = parse_iso_date, help = "Start date, YYYY-MM-DD (default: 180 days ago)")]
        start_date: Option<NaiveDate>,

        #[arg(long, value_parser = parse_iso_date, help = "End date, YYYY-MM-DD (default: today)")]
        end_date: Option<NaiveDate>,

        #[arg(long, help = "Branch others are compared to (default: origin/HEAD)")]
        default_branch: Option<String>,

        #[arg(long, help = "CSV path (default: <repo>_<start>_<end>.csv)")]
        output: Option<PathBuf>,
    },
    /// Commit issue references and Azure DevOps pull request lead times
    PrMetrics {
        #[arg(long = "azure-org-url", default_value = "", help = "Azure DevOps organisation URL")]
        org_url: String,

        #[arg(long = "azure-project", default_value = "", help = "Azure DevOps project name")]
        project: String,

        #[arg(
            long,
            env = "AZURE_DEVOPS_PAT",
            hide_env_values = true,
            default_value = "",
            help = "Personal Access Token for Azure DevOps"
        )]
        pat: String,

        #[arg(long, help = "Only test connectivity to Azure DevOps")]
        test_connectivity: bool,

        #[arg(long, default_value = "pr_metrics.csv", help = "CSV path for pull request metrics")]
        output: PathBuf,

        #[arg(long, default_value = "git_metrics.csv", help = "CSV path for commit metrics")]
        git_output: PathBuf,
    },
}

impl Commands {
    pub fn default_log_level(&self) -> LogLevel {
        match self {
            Commands::PrMetrics { .. } => LogLevel::Warning,
            Commands::Churn { .. } | Commands::Branches { .. } => LogLevel::Info,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self
                .common
                .log_level
                .unwrap_or_else(|| self.command.default_log_level()),
            file: self.common.log_file.clone(),
        }
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Churn {
                branch,
                start_date,
                end_date,
                output,
                simple,
            } => crate::churn::exec(
                self.common,
                ChurnArgs {
                    branch,
                    start_date,
                    end_date,
                    output,
                    simple,
                },
            ),
            Commands::Branches {
                start_date,
                end_date,
                default_branch,
                output,
            } => crate::branches::exec(
                self.common,
                BranchArgs {
                    start_date,
                    end_date,
                    default_branch,
                    output,
                },
            ),
            Commands::PrMetrics {
                org_url,
                project,
                pat,
                test_connectivity,
                output,
                git_output,
            } => crate::pr::exec(
                self.common,
                PrArgs {
                    org_url,
                    project,
                    pat,
                    test_connectivity,
                    output,
                    git_output,
                },
            ),
        }
    }
}
