use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, CONFIG_FILE};

const CHECKLIST_TOML_TEMPLATE: &str = r##"[checklist]
name = "{name}"
id = "{id}"
source = "{source}"

# --- Outline ---
# Blank lines separate evolution lines. Indentation nests items.
# Every line after the standalone marker is an item with no line.
#
# [outline]
# standalone_marker = "The following Digimon have no evolution line"
# indent_step = 0                  # spaces per level, 0 = infer

# --- Storage ---
# Saved checks live under `dir`, one JSON file per storage key.
#
# [storage]
# dir = ".checktree"
# state_key = "{id}_evo_checklist"
# view_key = "{id}_viewmode"
# export_prefix = "{id}"

# --- Levels ---
# Level tags offered as filters. Omit to use the tags found in the outline.
#
# [levels]
# tags = ["I", "R", "C", "U", "M"]
"##;

/// Infer a display name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Storage namespace from a display name: lowercase alphanumerics joined by `_`.
fn derive_id(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect();
    if words.is_empty() {
        "checklist".to_string()
    } else {
        words.join("_")
    }
}

/// Validate that an id only uses characters safe in storage file names.
fn validate_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("checklist id cannot be empty".to_string());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!(
            "invalid checklist id \"{}\": use letters, digits, '_' or '-'",
            id
        ));
    }
    Ok(())
}

fn render_checklist_toml(name: &str, id: &str, source: &str) -> String {
    CHECKLIST_TOML_TEMPLATE
        .replace("{name}", &name.replace('"', "\\\""))
        .replace("{id}", id)
        .replace("{source}", source)
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE);

    if config_path.is_file() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!("Note: parent checklist found at {}/", parent_root.display());
    }

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Checklist".to_string())
    });
    let id = args.id.unwrap_or_else(|| derive_id(&name));
    validate_id(&id)?;

    fs::write(&config_path, render_checklist_toml(&name, &id, &args.source))?;

    let source_path = cwd.join(&args.source);
    if !source_path.exists() {
        if let Some(dir) = source_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&source_path, "")?;
    }

    println!("Initialized checklist: {} ({})", name, id);
    Ok(())
}
