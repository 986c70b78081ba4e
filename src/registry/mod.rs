//! ロケールレジストリ（読み込み済みの翻訳ツリーと現在のロケール）
mod error;
mod translator;

pub use error::TranslatorError;
pub use translator::Translator;
