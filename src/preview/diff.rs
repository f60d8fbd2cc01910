use crossterm::style::Stylize;
use similar::{ChangeTag, DiffTag, TextDiff};
use std::fs;
use std::io;
use std::path::Path;

/// What writing proposed content to a file would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffPreview {
    /// The file does not exist yet
    WillCreate,
    /// Existing content matches the proposal
    Unchanged,
    /// Unified diff from current to proposed content
    Changed(String),
}

/// Compare `path` against `proposed` without touching the filesystem
pub fn preview(path: &Path, proposed: &str) -> io::Result<DiffPreview> {
    if !path.exists() {
        return Ok(DiffPreview::WillCreate);
    }

    let current = fs::read_to_string(path)?;
    let diff = unified_diff(&current, proposed);

    if diff.is_empty() {
        Ok(DiffPreview::Unchanged)
    } else {
        Ok(DiffPreview::Changed(diff))
    }
}

/// Line-based unified diff with `current`/`ai` headers
///
/// Empty when both sides have the same lines.
pub fn unified_diff(current: &str, proposed: &str) -> String {
    // Compare line content only, so a missing final newline is not a change
    let old: Vec<&str> = current.lines().collect();
    let new: Vec<&str> = proposed.lines().collect();

    let diff = TextDiff::from_slices(old.as_slice(), new.as_slice());
    if diff.ops().iter().all(|op| op.tag() == DiffTag::Equal) {
        return String::new();
    }

    let mut out = String::from("--- current\n+++ ai\n");
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        out.push_str(&hunk.header().to_string());
        out.push('\n');
        for change in hunk.iter_changes() {
            out.push(match change.tag() {
                ChangeTag::Equal => ' ',
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
            });
            out.push_str(change.value());
            out.push('\n');
        }
    }

    out
}

/// Print a preview the way the assistant reports it
pub fn print_preview(path: &Path, preview: &DiffPreview) {
    match preview {
        DiffPreview::WillCreate => {
            println!("{} File will be created: {}", "[+]".green(), path.display());
        }
        DiffPreview::Unchanged => {}
        DiffPreview::Changed(diff) => {
            println!("\n===== FILE DIFF =====");
            for line in diff.lines() {
                if line.starts_with("+++") || line.starts_with("---") {
                    println!("{}", line.bold());
                } else if line.starts_with('+') {
                    println!("{}", line.green());
                } else if line.starts_with('-') {
                    println!("{}", line.red());
                } else if line.starts_with("@@") {
                    println!("{}", line.cyan());
                } else {
                    println!("{}", line);
                }
            }
            println!("=====================");
        }
    }
}
