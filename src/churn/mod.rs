pub mod exec;
pub mod modified;
pub mod output;
pub mod parse;

pub use exec::{exec, run, ChurnArgs};
pub use modified::{diff_spec_for, MergeAwareCounter};
pub use output::{sort_by_date, write_records, write_report, ChurnColumns};
pub use parse::{parse_header, parse_log, Header, ModifiedLines};
