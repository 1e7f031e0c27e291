use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ct", about = concat!("[x] checktree v", env!("CARGO_PKG_VERSION"), " - tick off every line"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create checklist.toml in the current directory
    Init(InitArgs),
    /// Print the visible tree with check marks
    List(ListArgs),
    /// Check one or more keys
    Check(KeysArgs),
    /// Uncheck one or more keys
    Uncheck(KeysArgs),
    /// Check every key
    CheckAll,
    /// Uncheck every key
    UncheckAll,
    /// Forget all saved checks
    Clear,
    /// Show the checked count
    Count,
    /// Show or switch the view mode
    View(ViewArgs),
    /// List the level tags available as filters
    Levels,
    /// Export checked keys to a JSON snapshot
    Export(ExportArgs),
    /// Replace checked keys from a JSON snapshot
    Import(ImportArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Display name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Storage namespace (default: derived from the name)
    #[arg(long)]
    pub id: Option<String>,
    /// Outline file, relative to the project
    #[arg(long, default_value = "checklist.txt")]
    pub source: String,
    /// Overwrite an existing checklist.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Lines,
    Id,
}

#[derive(Args)]
pub struct ListArgs {
    /// View to print (default: the saved view mode)
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,
    /// Case-insensitive search term
    #[arg(short = 'q', long)]
    pub query: Option<String>,
    /// Only show these level tags (repeatable)
    #[arg(long = "level")]
    pub levels: Vec<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct KeysArgs {
    /// Keys like `#001` or `mystery-egg`
    #[arg(required = true)]
    pub keys: Vec<String>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// `lines`, `id` or `toggle` (omit to show the current mode)
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write the snapshot into (default: current directory)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Snapshot file to import
    pub file: String,
}
