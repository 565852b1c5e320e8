use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod cleaner;
pub mod mover;
pub mod rules;

pub use cleaner::{clean_name, NamingStyle, UnknownStyle};
pub use mover::{move_entry, MoveError};
pub use rules::{RuleError, RuleTable, DEFAULT_RULES};

/// Directory names skipped when the caller does not provide its own ignore set.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[".git", "node_modules", ".venv"];

#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("Target does not exist: {0:?}")]
    RootNotFound(PathBuf),
    #[error("Failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A rename failed part way through an apply run. `applied` holds the renames
    /// that already happened, in order; nothing is rolled back.
    #[error("Failed to rename {old:?} -> {new:?} ({} earlier renames were applied): {source}", .applied.len())]
    Apply {
        old: PathBuf,
        new: PathBuf,
        applied: RenamePlan,
        #[source]
        source: MoveError,
    },
    #[error("Confirmation failed: {0}")]
    Confirm(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub old: PathBuf,
    pub new: PathBuf,
}

pub type RenamePlan = Vec<RenameEntry>;

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub apply: bool,
    pub ignore_dirs: HashSet<String>,
    pub use_git: bool,
    pub style: NamingStyle,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            apply: false,
            ignore_dirs: default_ignore_dirs(),
            use_git: false,
            style: NamingStyle::default(),
        }
    }
}

pub fn default_ignore_dirs() -> HashSet<String> {
    DEFAULT_IGNORE_DIRS.iter().map(|d| d.to_string()).collect()
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// Computes the rename plan for everything below `root` and, when `options.apply`
/// is set, performs each rename as soon as it is planned.
///
/// The walk is bottom-up: every entry inside a directory is handled before the
/// directory itself, so planned paths never go stale. The returned plan is the same
/// in dry-run and apply mode.
pub fn rename_recursive(
    root: &Path,
    options: &RenameOptions,
    rules: &RuleTable,
) -> Result<RenamePlan, RenameError> {
    rename_recursive_interactive(root, options, rules, |_, _| Ok(true))
}

/// Like [`rename_recursive`], but asks `confirm` before each rename. Declined
/// entries are left out of the plan and never touched.
pub fn rename_recursive_interactive<F>(
    root: &Path,
    options: &RenameOptions,
    rules: &RuleTable,
    confirm: F,
) -> Result<RenamePlan, RenameError>
where
    F: Fn(&Path, &Path) -> anyhow::Result<bool>,
{
    if !root.exists() {
        return Err(RenameError::RootNotFound(root.to_path_buf()));
    }

    info!("Starting rename walk: {:?} (style: {})", root, options.style);
    if !options.apply {
        debug!("Dry run, nothing will be renamed");
    }

    let mut plan = RenamePlan::new();

    if root.is_dir() {
        rename_directory_recursive(root, root, options, rules, &confirm, &mut plan)?;
    } else {
        debug!("Target is not a directory, nothing to walk: {:?}", root);
    }

    info!(
        "Rename walk complete: {} {}",
        plan.len(),
        if options.apply { "renamed" } else { "to rename" }
    );

    Ok(plan)
}

fn rename_directory_recursive<F>(
    dir: &Path,
    root: &Path,
    options: &RenameOptions,
    rules: &RuleTable,
    confirm: &F,
    plan: &mut RenamePlan,
) -> Result<(), RenameError>
where
    F: Fn(&Path, &Path) -> anyhow::Result<bool>,
{
    if has_ignored_segment(dir, root, &options.ignore_dirs) {
        debug!("Skipping ignored directory: {:?}", dir);
        return Ok(());
    }

    debug!("Processing directory: {:?}", dir);

    let read_error = |source| RenameError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    // (path, descend): links to directories are renamed as directories but never entered
    let mut dirs = Vec::new();

    for entry in &entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(read_error)?;
        let is_real_dir = file_type.is_dir();
        let is_linked_dir =
            file_type.is_symlink() && fs::metadata(&path).is_ok_and(|target| target.is_dir());

        if !is_real_dir && !is_linked_dir {
            files.push(path);
            continue;
        }

        let ignored = entry
            .file_name()
            .to_str()
            .is_some_and(|name| options.ignore_dirs.contains(name));
        if ignored {
            debug!("Pruning ignored directory: {:?}", path);
        } else {
            dirs.push((path, is_real_dir));
        }
    }

    for (subdir, _) in dirs.iter().filter(|(_, descend)| *descend) {
        rename_directory_recursive(subdir, root, options, rules, confirm, plan)?;
    }

    for file in &files {
        rename_entry(dir, file, EntryKind::File, options, rules, confirm, plan)?;
    }

    // Directories last, once everything inside them is settled
    for (subdir, _) in &dirs {
        rename_entry(dir, subdir, EntryKind::Directory, options, rules, confirm, plan)?;
    }

    Ok(())
}

fn rename_entry<F>(
    dir: &Path,
    path: &Path,
    kind: EntryKind,
    options: &RenameOptions,
    rules: &RuleTable,
    confirm: &F,
    plan: &mut RenamePlan,
) -> Result<(), RenameError>
where
    F: Fn(&Path, &Path) -> anyhow::Result<bool>,
{
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        warn!("Skipping {} with non UTF-8 name: {:?}", kind.label(), path);
        return Ok(());
    };

    let new_name = clean_name(name, options.style, rules);
    if new_name == name {
        return Ok(());
    }

    if new_name.is_empty() {
        warn!("Name cleans to nothing: {:?}", path);
    }

    let new_path = dir.join(&new_name);

    if !confirm(path, &new_path).map_err(RenameError::Confirm)? {
        debug!("Declined {} rename: {:?}", kind.label(), path);
        return Ok(());
    }

    if options.apply {
        info!("Renaming {}: {:?} -> {:?}", kind.label(), path, new_path);
        if let Err(source) = move_entry(path, &new_path, options.use_git) {
            return Err(RenameError::Apply {
                old: path.to_path_buf(),
                new: new_path,
                applied: std::mem::take(plan),
                source,
            });
        }
    } else {
        info!("Would rename {}: {:?} -> {:?}", kind.label(), path, new_path);
    }

    plan.push(RenameEntry {
        old: path.to_path_buf(),
        new: new_path,
    });

    Ok(())
}

/// True when the root's own name, or any segment between the root and `dir`, is in
/// the ignore set. Ancestors above the root are not consulted.
fn has_ignored_segment(dir: &Path, root: &Path, ignore_dirs: &HashSet<String>) -> bool {
    let root_name = root.file_name().into_iter();
    let below_root = dir
        .strip_prefix(root)
        .ok()
        .into_iter()
        .flat_map(|rel| rel.iter());

    root_name
        .chain(below_root)
        .filter_map(|segment| segment.to_str())
        .any(|segment| ignore_dirs.contains(segment))
}
