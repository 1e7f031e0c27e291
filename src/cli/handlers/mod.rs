mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Serialize;

/// Global override for project directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

use crate::checklist::Checklist;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::file_access::{DirDownload, FsFileSource};
use crate::io::project_io::{self, ProjectError};
use crate::model::project::Project;
use crate::model::state::ViewMode;
use crate::ops::view_mode;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    if let Some(ref dir) = cli.project_dir {
        set_project_dir(dir)?;
    }

    match cli.command {
        None => {
            eprintln!("No subcommand given (try `ct --help`).");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs before project discovery
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Count => cmd_count(json),
            Commands::Levels => cmd_levels(json),

            // Write commands
            Commands::Check(args) => cmd_set_keys(args, true, json),
            Commands::Uncheck(args) => cmd_set_keys(args, false, json),
            Commands::CheckAll => cmd_set_all(true, json),
            Commands::UncheckAll => cmd_set_all(false, json),
            Commands::Clear => cmd_clear(json),
            Commands::View(args) => cmd_view(args, json),

            // Snapshots
            Commands::Export(args) => cmd_export(args, json),
            Commands::Import(args) => cmd_import(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Record the -C directory for later project discovery
pub fn set_project_dir(dir: &str) -> CmdResult {
    let abs = std::fs::canonicalize(dir)
        .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
    let _ = PROJECT_DIR_OVERRIDE.set(abs);
    Ok(())
}

fn load_project_cwd() -> Result<Project, ProjectError> {
    let start = match PROJECT_DIR_OVERRIDE.get() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ProjectError::IoError)?,
    };
    let root = project_io::discover_project(&start)?;
    project_io::load_project(&root)
}

fn open_checklist() -> Result<Checklist, ProjectError> {
    let project = load_project_cwd()?;
    let storage = project_io::open_storage(&project);
    Ok(Checklist::open(project, Box::new(storage)))
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_count(checklist: &Checklist, json: bool) -> CmdResult {
    let count = checklist.count();
    if json {
        print_json(&count_to_json(count))
    } else {
        println!("{}", count);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;

    for tag in &args.levels {
        if !checklist.set_level(tag, true) {
            return Err(format!("unknown level: {}", tag).into());
        }
    }
    if let Some(ref query) = args.query {
        checklist.set_term(query);
    }

    let mode = match args.view {
        Some(ViewArg::Lines) => ViewMode::ByLines,
        Some(ViewArg::Id) => ViewMode::ById,
        None => checklist.view_mode(),
    };

    if json {
        return print_json(&list_to_json(&checklist, mode));
    }

    let lines = format_listing(&checklist, mode);
    if lines.is_empty() {
        println!("(nothing matches)");
    } else {
        for line in &lines {
            println!("{}", line);
        }
    }
    println!();
    println!("{}", checklist.count());
    Ok(())
}

fn cmd_count(json: bool) -> CmdResult {
    let checklist = open_checklist()?;
    print_count(&checklist, json)
}

fn cmd_levels(json: bool) -> CmdResult {
    let checklist = open_checklist()?;
    let levels: Vec<LevelJson> = checklist
        .levels()
        .iter()
        .map(|l| LevelJson {
            tag: l.tag.clone(),
            nodes: checklist
                .tree()
                .id_rows
                .iter()
                .filter(|n| n.level == l.tag)
                .count(),
        })
        .collect();

    if json {
        return print_json(&levels);
    }
    if levels.is_empty() {
        println!("(no level tags)");
    }
    for level in &levels {
        println!("{:<16} {}", level.tag, level.nodes);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_set_keys(args: KeysArgs, checked: bool, json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;

    // Reject the whole batch before touching anything
    if let Some(unknown) = args.keys.iter().find(|k| !checklist.index().contains(k)) {
        return Err(format!("unknown key: {}", unknown).into());
    }
    for key in &args.keys {
        checklist.on_toggle(key, checked)?;
    }

    if !json {
        let verb = if checked { "checked" } else { "unchecked" };
        for key in &args.keys {
            println!("{} {}", verb, key);
        }
    }
    print_count(&checklist, json)
}

fn cmd_set_all(value: bool, json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;
    checklist.set_all(value)?;
    print_count(&checklist, json)
}

fn cmd_clear(json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;
    checklist.clear_state()?;
    if !json {
        println!("Cleared saved checks.");
    }
    print_count(&checklist, json)
}

#[derive(Serialize)]
struct ViewJson {
    view: &'static str,
    label: &'static str,
}

fn cmd_view(args: ViewArgs, json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;

    if let Some(ref arg) = args.mode {
        let target = view_mode::resolve_target(checklist.view_mode(), arg)
            .ok_or_else(|| format!("unknown view mode: {} (use lines, id or toggle)", arg))?;
        checklist.set_view_mode(target)?;
    }

    let mode = checklist.view_mode();
    if json {
        print_json(&ViewJson {
            view: mode.token(),
            label: mode.label(),
        })
    } else {
        println!("{}", mode.label());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ExportJson {
    file: String,
    checked: usize,
}

#[derive(Serialize)]
struct ImportJson {
    imported: usize,
    unknown: usize,
    message: String,
}

fn cmd_export(args: ExportArgs, json: bool) -> CmdResult {
    let checklist = open_checklist()?;
    let dir = match args.out {
        Some(out) => PathBuf::from(out),
        None => std::env::current_dir()?,
    };
    let report = checklist.export(&DirDownload::new(dir))?;

    if json {
        print_json(&ExportJson {
            file: report.location,
            checked: report.snapshot.checked.len(),
        })
    } else {
        println!(
            "Exported {} checked items to {}",
            report.snapshot.checked.len(),
            report.location
        );
        Ok(())
    }
}

fn cmd_import(args: ImportArgs, json: bool) -> CmdResult {
    let mut checklist = open_checklist()?;
    let report = checklist.import_file(&FsFileSource, &args.file)?;

    if json {
        print_json(&ImportJson {
            imported: report.imported,
            unknown: report.unknown,
            message: report.message(),
        })
    } else {
        println!("{}", report.message());
        Ok(())
    }
}
