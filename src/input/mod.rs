//! Locale files on disk
pub mod translation;

pub use translation::{
    LoadError,
    LocaleFile,
    find_locale_file,
    find_locale_files,
    load_translation_file,
};
