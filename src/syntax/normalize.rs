//! Turns the raw lines of a locale file into logical lines.
//!
//! The file body is wrapped in a container named after the locale, blank lines
//! are dropped, and a quoted value that does not close on its own line is
//! joined with the following lines using the two-character escape `\n`.

use std::iter;

/// Escape written between the segments of a multi-line value.
pub const NEWLINE_ESCAPE: &str = "\\n";

/// Line closing a container.
pub const CONTAINER_CLOSE: &str = "}";

/// One self-contained unit of the grammar.
///
/// The text is non-empty and trimmed; it is a translation, a container
/// opening, or a container closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Normalized text
    text: String,
    /// 1-based line of the locale file where this line starts.
    /// `None` for the lines wrapping the file in its locale container.
    line_number: Option<usize>,
}

impl LogicalLine {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn line_number(&self) -> Option<usize> {
        self.line_number
    }
}

/// A line that needs no continuation ends with one of these.
const fn is_terminator(c: char) -> bool {
    matches!(c, '{' | '}' | '"')
}

/// Normalizes the raw lines of the locale file `locale`.
///
/// A line whose last character is not `{`, `}` or `"` starts a multi-line
/// value: following lines are appended after [`NEWLINE_ESCAPE`] until the
/// joined text ends with `"`. Continuation lines are appended verbatim,
/// except that whitespace after the closing `"` is dropped. If the input runs
/// out first the dangling line is kept as is and rejected by the parser.
///
/// # Examples
/// ```
/// use trad::syntax::normalize_lines;
///
/// let lines = normalize_lines("en", ["note: \"line one", "line two\""]);
/// let texts: Vec<&str> = lines.iter().map(|line| line.text()).collect();
/// assert_eq!(texts, ["en {", "note: \"line one\\nline two\"", "}"]);
/// ```
pub fn normalize_lines<I, S>(locale: &str, raw_lines: I) -> Vec<LogicalLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut physical = iter::once((None, format!("{locale} {{")))
        .chain(
            raw_lines
                .into_iter()
                .enumerate()
                .map(|(index, line)| (Some(index + 1), line.as_ref().to_owned())),
        )
        .chain(iter::once((None, CONTAINER_CLOSE.to_owned())));

    let mut lines = Vec::new();
    while let Some((line_number, raw)) = physical.next() {
        let mut text = raw.trim().to_owned();
        if text.is_empty() {
            continue;
        }

        if !text.ends_with(is_terminator) {
            while !text.ends_with('"') {
                let Some((_, continuation)) = physical.next() else {
                    break;
                };
                // 閉じ引用符の後ろの空白だけを落とす
                let trimmed = continuation.trim_end();
                text.push_str(NEWLINE_ESCAPE);
                let segment = if trimmed.ends_with('"') { trimmed } else { continuation.as_str() };
                text.push_str(segment);
            }
        }

        lines.push(LogicalLine { text, line_number });
    }

    lines
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn texts(lines: &[LogicalLine]) -> Vec<String> {
        lines.iter().map(|line| line.text().to_string()).collect()
    }

    #[googletest::test]
    fn wraps_content_in_locale_container() {
        let lines = normalize_lines("en", ["greeting: \"Hello\""]);

        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("greeting: \"Hello\""), eq("}")]
        );
    }

    #[googletest::test]
    fn empty_input_is_only_the_wrapper() {
        let lines = normalize_lines("en", Vec::<String>::new());

        assert_that!(texts(&lines), elements_are![eq("en {"), eq("}")]);
    }

    #[googletest::test]
    fn trims_and_drops_blank_lines() {
        let lines = normalize_lines("en", ["", "  menu {  ", "\t", "    save: \"Save\"   ", "}", "   "]);

        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("menu {"), eq("save: \"Save\""), eq("}"), eq("}")]
        );
    }

    #[googletest::test]
    fn joins_multi_line_value() {
        let lines = normalize_lines("en", ["note: \"line one", "line two\""]);

        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("note: \"line one\\nline two\""), eq("}")]
        );
    }

    #[googletest::test]
    fn joins_until_closing_quote() {
        let lines = normalize_lines("en", ["note: \"a", "b {", "c }", "d\"", "next: \"x\""]);

        assert_that!(
            texts(&lines),
            elements_are![
                eq("en {"),
                eq("note: \"a\\nb {\\nc }\\nd\""),
                eq("next: \"x\""),
                eq("}")
            ]
        );
    }

    #[googletest::test]
    fn continuation_keeps_indentation_and_blank_segments() {
        let lines = normalize_lines("en", ["note: \"first", "", "    indented\"   "]);

        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("note: \"first\\n\\n    indented\""), eq("}")]
        );
    }

    #[googletest::test]
    fn continuation_keeps_trailing_spaces_of_inner_segments() {
        let lines = normalize_lines("en", ["n: \"a", "b   ", "c\"  "]);

        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("n: \"a\\nb   \\nc\""), eq("}")]
        );
    }

    #[googletest::test]
    fn unterminated_value_swallows_the_rest() {
        let lines = normalize_lines("en", ["note: \"never closed", "other: \"x"]);

        // The dangling value absorbs the wrapper's closing line as well.
        assert_that!(
            texts(&lines),
            elements_are![eq("en {"), eq("note: \"never closed\\nother: \"x\\n}")]
        );
    }

    #[rstest]
    fn records_physical_line_numbers() {
        let lines = normalize_lines("en", ["", "a: \"1\"", "b: \"multi", "line\"", "c: \"3\""]);

        let numbers: Vec<Option<usize>> = lines.iter().map(LogicalLine::line_number).collect();
        assert_eq!(numbers, vec![None, Some(2), Some(3), Some(5), None]);
    }

    #[rstest]
    #[case("menu {")]
    #[case("}")]
    #[case("key: \"value\"")]
    fn terminated_lines_are_kept_as_is(#[case] line: &str) {
        let lines = normalize_lines("en", [line]);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines.get(1).map(LogicalLine::text), Some(line));
    }
}
