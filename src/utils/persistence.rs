//! The ~/.polyrolly/ application directory and user-typed save paths.

use crate::core::constants::{APP_DIR_NAME, DEFAULT_SAVE_NAME, SAVE_EXTENSION};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn home_dir() -> io::Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })
}

/// Get the ~/.polyrolly/ directory path, creating it if needed.
pub fn app_dir() -> io::Result<PathBuf> {
    let dir = home_dir()?.join(APP_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Suggested path for a session that has never been saved.
pub fn default_save_path() -> io::Result<PathBuf> {
    Ok(app_dir()?.join(DEFAULT_SAVE_NAME))
}

/// Turns what the user typed into a save file path.
///
/// `~/` expands to the home directory, a bare file name lands in `base`,
/// and a missing extension becomes `.json`. Blank input is rejected.
pub fn resolve_save_path(input: &str, base: &Path) -> io::Result<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "file name cannot be empty",
        ));
    }

    let mut path = if let Some(rest) = input.strip_prefix("~/") {
        home_dir()?.join(rest)
    } else {
        let typed = PathBuf::from(input);
        if typed.is_absolute() || typed.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
            typed
        } else {
            base.join(typed)
        }
    };

    if path.extension().is_none() {
        path.set_extension(SAVE_EXTENSION);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_exists() {
        let dir = app_dir().expect("app_dir should succeed");
        assert!(dir.exists());
        assert!(dir.ends_with(".polyrolly"));
    }

    #[test]
    fn test_default_save_path_format() {
        let path = default_save_path().expect("default_save_path should succeed");
        assert!(path.to_string_lossy().ends_with(".polyrolly/rolls.json"));
    }

    #[test]
    fn test_bare_name_goes_to_base() {
        let base = Path::new("/tmp/rolls");
        let path = resolve_save_path("dungeon", base).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/rolls/dungeon.json"));
    }

    #[test]
    fn test_explicit_paths_kept() {
        let base = Path::new("/tmp/rolls");
        assert_eq!(
            resolve_save_path("/srv/game.json", base).unwrap(),
            PathBuf::from("/srv/game.json")
        );
        assert_eq!(
            resolve_save_path("saves/game.txt", base).unwrap(),
            PathBuf::from("saves/game.txt")
        );
    }

    #[test]
    fn test_home_expansion() {
        let path = resolve_save_path("~/game", Path::new("/unused")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("game.json"));
    }

    #[test]
    fn test_blank_rejected() {
        let err = resolve_save_path("   ", Path::new("/tmp")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
