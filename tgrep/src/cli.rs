use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// JSON dataset: `{"headers": [..], "rows": [[..]]}` or a bare array of
    /// rows whose first entry is the header row.
    pub path: PathBuf,
    #[clap(long)]
    /// Dataset to compare against `path`, which then acts as the keyword
    /// reference.
    pub compare: Option<PathBuf>,
    #[clap(long, default_value = "false")]
    pub case_sensitive: bool,
    #[clap(long, default_value = "false")]
    /// Match whole cells only.
    pub exact: bool,
    #[clap(long = "column")]
    /// Restrict matching to this column key, e.g. `col.Name`. Repeatable.
    pub columns: Vec<String>,
    #[clap(long)]
    /// Run one query and exit instead of starting the prompt.
    pub query: Option<String>,
    #[clap(long, default_value = "false")]
    /// Mark matches with terminal bold instead of `<mark>` tags.
    pub ansi: bool,
}
