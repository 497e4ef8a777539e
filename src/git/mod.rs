pub mod cli;
pub mod provider;
pub mod repo;
pub mod runner;

pub use cli::GitCli;
pub use provider::{BranchHistory, DiffSpec, HistoryProvider};
pub use repo::GitRepo;
pub use runner::{CommandOutput, CommandRunner};
