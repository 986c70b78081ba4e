use thiserror::Error;

use crate::input::LoadError;
use crate::ir::ResolveError;
use crate::syntax::ParseError;

/// [`super::Translator`] のエラー
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// まだロケールが選択されていない
    #[error("No language set")]
    NoLocaleSet,

    /// ロケールが読み込まれておらず、言語ディレクトリにも存在しない
    #[error("Language not found: {0}")]
    LocaleNotFound(String),

    /// 読み込み済みのロケールは置き換えない
    #[error("Language already loaded: {0}")]
    AlreadyLoaded(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// 一括読み込みで一部のファイルが失敗した（他のロケールは保持される）
    #[error("Failed to load {} locale file(s):\n{}", .0.len(), format_load_errors(.0))]
    LoadFailed(Vec<LoadError>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

fn format_load_errors(errors: &[LoadError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {err}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
