//! Locale file discovery and loading

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};

use globset::Glob;
use ignore::WalkBuilder;
use thiserror::Error;

use crate::ir::TranslationTree;
use crate::syntax::{
    ParseError,
    parse_locale,
};

/// Errors raised while locating or loading locale files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The language directory does not exist
    #[error("Could not open directory: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The file name pattern is not a valid glob
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Reading a locale file failed
    #[error("Could not open file: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale file is not well formed
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// A locale file found in the language directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    /// Locale name, taken from the file stem
    pub locale: String,
    pub path: PathBuf,
}

/// Derives the locale name from a file path.
///
/// The locale is everything before the last `.` of the file name.
///
/// # Examples
/// - `lang/en.trad` → `en`
/// - `lang/pt-BR.trad` → `pt-BR`
/// - `lang/en.old.trad` → `en.old`
#[must_use]
pub fn detect_locale_from_path(file_path: &Path) -> Option<String> {
    file_path.file_stem().map(|stem| stem.to_string_lossy().to_string())
}

/// Lists the locale files directly inside `lang_dir`.
///
/// Only regular files whose name matches `file_pattern` are returned, sorted
/// by path. When two files map to the same locale the first one wins.
///
/// # Errors
/// - The directory does not exist
/// - `file_pattern` is not a valid glob
pub fn find_locale_files(lang_dir: &Path, file_pattern: &str) -> Result<Vec<LocaleFile>, LoadError> {
    if !lang_dir.is_dir() {
        return Err(LoadError::DirectoryNotFound { path: lang_dir.to_path_buf() });
    }

    let matcher = Glob::new(file_pattern)
        .map_err(|source| LoadError::InvalidPattern { pattern: file_pattern.to_string(), source })?
        .compile_matcher();

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(lang_dir)
        .standard_filters(false)
        .max_depth(Some(1))
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !matcher.is_match(file_name) {
            continue;
        }
        let Some(locale) = detect_locale_from_path(path) else {
            continue;
        };

        found_files.push(LocaleFile { locale, path: path.to_path_buf() });
    }

    found_files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut seen = HashSet::new();
    found_files.retain(|file| {
        let first = seen.insert(file.locale.clone());
        if !first {
            tracing::warn!(
                locale = %file.locale,
                path = %file.path.display(),
                "Ignoring duplicate locale file"
            );
        }
        first
    });

    tracing::debug!(lang_dir = %lang_dir.display(), count = found_files.len(), "Found locale files");
    Ok(found_files)
}

/// Finds the file for a single locale in `lang_dir`.
///
/// # Errors
/// Same as [`find_locale_files`].
pub fn find_locale_file(
    lang_dir: &Path,
    file_pattern: &str,
    locale: &str,
) -> Result<Option<LocaleFile>, LoadError> {
    Ok(find_locale_files(lang_dir, file_pattern)?.into_iter().find(|file| file.locale == locale))
}

/// Reads and parses a locale file.
///
/// # Errors
/// Returns error if the file cannot be read or is not well formed.
pub fn load_translation_file(file: &LocaleFile) -> Result<TranslationTree, LoadError> {
    let content = std::fs::read_to_string(&file.path)
        .map_err(|source| LoadError::Io { path: file.path.clone(), source })?;

    let tree = parse_locale(&file.locale, content.lines())
        .map_err(|source| LoadError::Parse { path: file.path.clone(), source })?;

    tracing::debug!(
        locale = %file.locale,
        path = %file.path.display(),
        keys = tree.len(),
        "Loaded translation file"
    );
    Ok(tree)
}
