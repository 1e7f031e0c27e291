use std::fs;
use std::path::{Path, PathBuf};

use crate::io::storage::FileStorage;
use crate::model::config::ChecklistConfig;
use crate::model::project::Project;
use crate::parse::{OutlineOptions, parse_outline};

/// Name of the project config file
pub const CONFIG_FILE: &str = "checklist.toml";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a checklist project: no checklist.toml found")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse checklist.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the project by walking up from the given directory, looking for
/// a `checklist.toml`.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Read and parse checklist.toml in `root`
pub fn read_config(root: &Path) -> Result<ChecklistConfig, ProjectError> {
    let config_path = root.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}

/// Load the config and build the tree from the outline source.
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    if !root.join(CONFIG_FILE).is_file() {
        return Err(ProjectError::NotAProject);
    }
    let config = read_config(root)?;

    let source_path = root.join(&config.checklist.source);
    let source = fs::read_to_string(&source_path).map_err(|e| ProjectError::ReadError {
        path: source_path.clone(),
        source: e,
    })?;
    let opts = OutlineOptions {
        standalone_marker: config.outline.standalone_marker.clone(),
        indent_step: config.outline.indent_step,
    };
    let tree = parse_outline(&source, &opts);
    tracing::debug!(
        sections = tree.sections.len(),
        rows = tree.id_rows.len(),
        "loaded outline {}",
        source_path.display()
    );

    Ok(Project {
        root: root.to_path_buf(),
        config,
        tree,
    })
}

/// File-backed storage for a loaded project
pub fn open_storage(project: &Project) -> FileStorage {
    FileStorage::new(project.storage_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(root: &Path) {
        fs::write(
            root.join(CONFIG_FILE),
            "[checklist]\nname = \"Test\"\nid = \"test\"\nsource = \"lines.txt\"\n",
        )
        .unwrap();
        fs::write(root.join("lines.txt"), "Koromon (I) #002\n  Agumon (R) #005\n").unwrap();
    }

    #[test]
    fn discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path());
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_project(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn discover_fails_outside_project() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_project(tmp.path()),
            Err(ProjectError::NotAProject)
        ));
    }

    #[test]
    fn load_builds_tree() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path());
        let project = load_project(tmp.path()).unwrap();
        assert_eq!(project.config.checklist.name, "Test");
        assert_eq!(project.tree.sections.len(), 1);
        assert_eq!(project.tree.id_rows.len(), 2);
        assert_eq!(project.level_tags(), vec!["I", "R"]);
        assert_eq!(project.storage_dir(), tmp.path().join(".checktree"));
    }

    #[test]
    fn missing_source_is_read_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[checklist]\nname = \"Test\"\nid = \"test\"\nsource = \"gone.txt\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_project(tmp.path()),
            Err(ProjectError::ReadError { .. })
        ));
    }

    #[test]
    fn bad_config_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[checklist\nname=").unwrap();
        assert!(matches!(
            load_project(tmp.path()),
            Err(ProjectError::ConfigParseError(_))
        ));
    }
}
