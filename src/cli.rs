use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pagesync",
    version,
    about = "Sync spreadsheet grids into the report deck and its page data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Sync(SyncArgs),
    Inspect(InspectArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[arg(long, env = "PAGESYNC_GRID_DIR", default_value = ".cache/pagesync/grids")]
    pub grid_dir: PathBuf,

    /// Explicit sheet for a page role, e.g. `--sheet page3=exports/p3.json`.
    #[arg(long = "sheet", value_name = "ROLE=PATH")]
    pub sheets: Vec<String>,

    #[arg(long, env = "PAGESYNC_HTML_TARGET", default_value = "deck/PPT1.html")]
    pub html_target: PathBuf,

    #[arg(long, env = "PAGESYNC_PAGE_DATA", default_value = "deck/page-data.js")]
    pub page_data: PathBuf,

    #[arg(long, default_value = ".cache/pagesync")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub grid: PathBuf,

    #[arg(long, default_value = "page1")]
    pub role: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, env = "PAGESYNC_PAGE_DATA", default_value = "deck/page-data.js")]
    pub page_data: PathBuf,

    #[arg(long, default_value = ".cache/pagesync")]
    pub cache_root: PathBuf,
}
