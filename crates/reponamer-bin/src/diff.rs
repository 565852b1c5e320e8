use anyhow::Result;
use inquire::Confirm;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

/// Renders the old and new names with the changed characters highlighted.
pub fn highlight_name_change(old_name: &str, new_name: &str) -> Result<(String, String)> {
    let diff = TextDiff::from_chars(old_name, new_name);
    let mut old_line = String::new();
    let mut new_line = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => write!(old_line, "\x1b[1;31m{}\x1b[0m", change.value())?, // Red
            ChangeTag::Insert => write!(new_line, "\x1b[1;32m{}\x1b[0m", change.value())?, // Green
            ChangeTag::Equal => {
                old_line.push_str(change.value());
                new_line.push_str(change.value());
            }
        }
    }

    Ok((old_line, new_line))
}

pub fn show_rename_and_confirm(old_path: &Path, new_path: &Path) -> Result<bool> {
    let old_name = old_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let new_name = new_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (old_line, new_line) = highlight_name_change(&old_name, &new_name)?;

    println!("\n📁 {}", old_path.parent().unwrap_or(Path::new("")).display());
    println!("  - {}", old_line);
    println!("  + {}", new_line);

    let apply_change = Confirm::new("Rename this item?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}
