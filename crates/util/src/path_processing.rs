use std::path::{Path, PathBuf};

use dirs_next::home_dir;

/// Expand a leading `~` in user-supplied paths (config overrides, upload
/// paths typed into the TUI).
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// File name component of a path as an owned string, falling back to the
/// whole path when there is none (e.g. `..`).
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_trimmed_and_unchanged() {
        assert_eq!(expand_tilde("  /tmp/report.pdf "), PathBuf::from("/tmp/report.pdf"));
        assert_eq!(expand_tilde("notes/~draft.txt"), PathBuf::from("notes/~draft.txt"));
    }

    #[test]
    fn tilde_prefix_joins_home() {
        let Some(home) = home_dir() else {
            return;
        };
        assert_eq!(expand_tilde("~/uploads/a.png"), home.join("uploads/a.png"));
        assert_eq!(expand_tilde("~"), home);
    }

    #[test]
    fn display_name_prefers_file_name() {
        assert_eq!(display_file_name(Path::new("/var/data/budget.xlsx")), "budget.xlsx");
        assert_eq!(display_file_name(Path::new("..")), "..");
    }
}
