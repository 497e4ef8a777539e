pub mod analyse;
pub mod exec;
pub mod output;

pub use analyse::analyse;
pub use exec::{exec, BranchArgs};
pub use output::{write_records, write_report};
