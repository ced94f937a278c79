use std::path::{Path, PathBuf};

use dirs_next::home_dir;

/// Expand a leading `~` (followed by `/` or `\`) to the user's home directory.
///
/// Surrounding whitespace is trimmed. Without a home directory the `~` is kept.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));

    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Join `file_name` under `<base>/<app>`, falling back to the working directory
/// when no base directory is known.
pub fn app_file_path(base: Option<PathBuf>, app: &str, file_name: &str) -> PathBuf {
    base.unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(app)
        .join(file_name)
}
