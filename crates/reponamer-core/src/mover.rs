use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum MoveError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("could not run git: {0}")]
    GitSpawn(#[source] io::Error),
    #[error("git mv exited with {status}: {stderr}")]
    Git { status: ExitStatus, stderr: String },
}

/// Renames `old` to `new`, either directly or through `git mv` so the repository
/// records the move. Both paths must share a parent directory.
pub fn move_entry(old: &Path, new: &Path, use_git: bool) -> Result<(), MoveError> {
    if use_git {
        git_mv(old, new)
    } else {
        ensure_target_free(old, new)?;
        fs::rename(old, new)?;
        Ok(())
    }
}

/// `fs::rename` silently replaces an existing file, so refuse any target that is
/// already taken by a different entry. A target that resolves to `old` itself
/// (a case-only rename on a case-insensitive filesystem) is allowed.
fn ensure_target_free(old: &Path, new: &Path) -> Result<(), MoveError> {
    let target = match fs::symlink_metadata(new) {
        Ok(target) => target,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if is_same_entry(&fs::symlink_metadata(old)?, &target) {
        return Ok(());
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("target already exists: {}", new.display()),
    )
    .into())
}

#[cfg(unix)]
fn is_same_entry(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn is_same_entry(_a: &fs::Metadata, _b: &fs::Metadata) -> bool {
    false
}

fn git_mv(old: &Path, new: &Path) -> Result<(), MoveError> {
    // git runs from the shared parent so the target tree need not contain the cwd
    let parent = old
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let old_name = old.strip_prefix(parent).unwrap_or(old);
    let new_name = new.strip_prefix(parent).unwrap_or(new);

    debug!("git mv {:?} {:?} (in {:?})", old_name, new_name, parent);

    let output = Command::new("git")
        .arg("mv")
        .arg("--")
        .arg(old_name)
        .arg(new_name)
        .current_dir(parent)
        .output()
        .map_err(MoveError::GitSpawn)?;

    if !output.status.success() {
        return Err(MoveError::Git {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_direct_rename() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("Old Name.txt");
        let new = dir.path().join("old-name.txt");
        fs::write(&old, "content").unwrap();

        move_entry(&old, &new, false).unwrap();

        assert!(!old.exists());
        assert_eq!(fs::read_to_string(&new).unwrap(), "content");
    }

    #[test]
    fn test_direct_rename_missing_source_fails() {
        let dir = tempdir().unwrap();
        let result = move_entry(&dir.path().join("missing"), &dir.path().join("other"), false);
        assert!(matches!(result, Err(MoveError::Io(_))));
    }

    #[test]
    fn test_direct_rename_refuses_to_overwrite_file() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("A+B.txt");
        let new = dir.path().join("ab.txt");
        fs::write(&old, "first").unwrap();
        fs::write(&new, "second").unwrap();

        let result = move_entry(&old, &new, false);

        match result {
            Err(MoveError::Io(e)) => assert_eq!(e.kind(), ErrorKind::AlreadyExists),
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&old).unwrap(), "first");
        assert_eq!(fs::read_to_string(&new).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_link_to_same_entry_is_not_a_collision() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("Shared.txt");
        let new = dir.path().join("shared.txt");
        fs::write(&old, "same").unwrap();
        fs::hard_link(&old, &new).unwrap();

        move_entry(&old, &new, false).unwrap();

        assert!(!old.exists());
        assert_eq!(fs::read_to_string(&new).unwrap(), "same");
    }

    #[test]
    fn test_git_mv_tracks_rename() {
        if !git_available() {
            return;
        }
        let dir = tempdir().unwrap();
        assert!(git(dir.path(), &["init", "-q"]));
        fs::write(dir.path().join("My File.txt"), "tracked").unwrap();
        assert!(git(dir.path(), &["add", "My File.txt"]));

        move_entry(&dir.path().join("My File.txt"), &dir.path().join("my-file.txt"), true).unwrap();

        assert!(dir.path().join("my-file.txt").exists());
        assert!(git(dir.path(), &["ls-files", "--error-unmatch", "my-file.txt"]));
    }

    #[test]
    fn test_git_mv_untracked_file_fails_loudly() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("Untracked.txt");
        fs::write(&old, "x").unwrap();

        let result = move_entry(&old, &dir.path().join("untracked.txt"), true);

        assert!(matches!(result, Err(MoveError::Git { .. }) | Err(MoveError::GitSpawn(_))));
        assert!(old.exists());
    }
}
