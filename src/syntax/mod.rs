//! `.trad` ロケールファイルを翻訳ツリーにパースする
//!
//! ```text
//! menu {
//!     file {
//!         save: "Save"
//!     }
//! }
//! note: "first line
//! second line"
//! ```
//!
//! ファイルの内容は、ロケール名のコンテナの中身として扱う。

mod error;
mod normalize;
mod parser;

pub use error::ParseError;
pub use normalize::{
    CONTAINER_CLOSE,
    LogicalLine,
    NEWLINE_ESCAPE,
    normalize_lines,
};
pub(crate) use parser::is_valid_name;

use crate::ir::TranslationTree;
use parser::ElementParser;

/// `locale` のロケールファイルの行をパースする
///
/// ファイル全体を受け入れるか拒否するかのどちらかで、途中までのツリーは返さない。
/// ロケールのコンテナが閉じた後に残った行（余分な `}` など）は
/// [`ParseError::MalformedLine`] になる。
///
/// # Examples
/// ```
/// use trad::syntax::parse_locale;
///
/// let tree = parse_locale("en", ["menu {", "file {", "save: \"Save\"", "}", "}"]).unwrap();
/// assert_eq!(tree.locale(), "en");
/// assert_eq!(tree.resolve("menu.file.save"), Ok("Save"));
/// ```
///
/// # Errors
/// - [`ParseError::MalformedLine`]: どの構文にも一致しない行
/// - [`ParseError::UnterminatedContainer`]: 閉じられていないコンテナ
/// - [`ParseError::DuplicateKey`]: 同名の兄弟要素
pub fn parse_locale<I, S>(locale: &str, raw_lines: I) -> Result<TranslationTree, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines = normalize_lines(locale, raw_lines);
    let parser = ElementParser::new(&lines);

    let (root, cursor) = parser.parse_container(0, locale)?;
    if let Some(stray) = lines.get(cursor) {
        return Err(ParseError::MalformedLine {
            line: stray.text().to_string(),
            scope: locale.to_string(),
            line_number: stray.line_number(),
        });
    }

    Ok(TranslationTree::new(root))
}
