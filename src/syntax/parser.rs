//! Recursive-descent parser over normalized logical lines.
//!
//! Grammar, one construct per logical line:
//! ```text
//! entry      := leaf | container
//! leaf       := NAME ': "' VALUE '"'
//! container  := NAME ' {' entry* '}'
//! NAME       := [A-Za-z0-9_-]+
//! ```

use super::error::ParseError;
use super::normalize::{
    CONTAINER_CLOSE,
    LogicalLine,
};
use crate::ir::{
    Container,
    Element,
    Leaf,
};

/// Separates a translation's name from its quoted value.
const LEAF_SEPARATOR: &str = ": \"";

/// Suffix of a container opening line.
const CONTAINER_OPEN_SUFFIX: &str = " {";

/// Walks a buffer of logical lines with a cursor.
///
/// Every parsing method takes the cursor of its first line and returns the
/// cursor just past what it consumed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ElementParser<'a> {
    /// Lines being parsed
    lines: &'a [LogicalLine],
}

impl<'a> ElementParser<'a> {
    pub(crate) const fn new(lines: &'a [LogicalLine]) -> Self {
        Self { lines }
    }

    /// Parses one element (translation or container) starting at `cursor`.
    ///
    /// `scope` names the enclosing container and is only used for errors.
    pub(crate) fn parse_element(
        &self,
        cursor: usize,
        scope: &str,
    ) -> Result<(Element, usize), ParseError> {
        let line = self.line(cursor, scope)?;

        if let Some(leaf) = parse_leaf(line.text()) {
            return Ok((Element::Leaf(leaf), cursor + 1));
        }

        let (container, next) = self.parse_container(cursor, scope)?;
        Ok((Element::Container(container), next))
    }

    /// Parses the container whose opening line is at `cursor`, up to and
    /// including its closing `}`.
    pub(crate) fn parse_container(
        &self,
        cursor: usize,
        scope: &str,
    ) -> Result<(Container, usize), ParseError> {
        let line = self.line(cursor, scope)?;
        let Some(name) = parse_container_open(line.text()) else {
            return Err(ParseError::MalformedLine {
                line: line.text().to_string(),
                scope: scope.to_string(),
                line_number: line.line_number(),
            });
        };

        let mut container = Container::new(name.to_string());
        let mut cursor = cursor + 1;
        while let Some(line) = self.lines.get(cursor) {
            if line.text() == CONTAINER_CLOSE {
                return Ok((container, cursor + 1));
            }

            let (child, next) = self.parse_element(cursor, name)?;
            if container.child(child.name()).is_some() {
                return Err(ParseError::DuplicateKey {
                    key: child.name().to_string(),
                    container: name.to_string(),
                    line_number: line.line_number(),
                });
            }
            container.push(child);
            cursor = next;
        }

        Err(ParseError::UnterminatedContainer { container: name.to_string() })
    }

    /// Line at `cursor`; running out of lines means `scope` was never closed.
    fn line(&self, cursor: usize, scope: &str) -> Result<&'a LogicalLine, ParseError> {
        self.lines
            .get(cursor)
            .ok_or_else(|| ParseError::UnterminatedContainer { container: scope.to_string() })
    }
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Checks `name` against `[A-Za-z0-9_-]+`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Recognizes `name: "value"`.
///
/// The value runs from the first `: "` to the last `"` of the line.
fn parse_leaf(line: &str) -> Option<Leaf> {
    let (name, rest) = line.split_once(LEAF_SEPARATOR)?;
    if !is_valid_name(name) {
        return None;
    }
    let raw_value = rest.strip_suffix('"')?;

    Some(Leaf::new(name.to_string(), decode_value(raw_value)))
}

/// Recognizes `name {` and returns the name.
fn parse_container_open(line: &str) -> Option<&str> {
    line.strip_suffix(CONTAINER_OPEN_SUFFIX).filter(|name| is_valid_name(name))
}

/// Decodes `\"` and `\n` in a single pass.
///
/// Any other backslash is kept literally.
fn decode_value(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
        } else if chars.next_if_eq(&'"').is_some() {
            value.push('"');
        } else if chars.next_if_eq(&'n').is_some() {
            value.push('\n');
        } else {
            value.push('\\');
        }
    }

    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::syntax::normalize_lines;

    #[rstest]
    #[case("greeting: \"Hello\"", "greeting", "Hello")]
    #[case("snake_case-key9: \"v\"", "snake_case-key9", "v")]
    #[case("empty: \"\"", "empty", "")]
    #[case("quote: \"say \\\"hi\\\"\"", "quote", "say \"hi\"")]
    #[case("lines: \"one\\ntwo\"", "lines", "one\ntwo")]
    // Greedy up to the last quote of the line
    #[case("raw: \"a \"b\" c\"", "raw", "a \"b\" c")]
    #[case("colon: \"a: \"b\"\"", "colon", "a: \"b\"")]
    #[case("path: \"C:\\\\dir\"", "path", "C:\\\\dir")]
    #[case("tab: \"a\\tb\"", "tab", "a\\tb")]
    fn leaf_is_recognized(#[case] line: &str, #[case] name: &str, #[case] value: &str) {
        let leaf = parse_leaf(line).unwrap();

        assert_eq!(leaf.name(), name);
        assert_eq!(leaf.value(), value);
    }

    #[rstest]
    #[case("greeting \"Hello\"")]
    #[case("greeting:\"Hello\"")]
    #[case("greeting:  \"Hello\"")]
    #[case("greeting: Hello")]
    #[case("greeting: \"Hello")]
    #[case("greeting: \"")]
    #[case(": \"no name\"")]
    #[case("with space: \"x\"")]
    #[case("dotted.key: \"x\"")]
    #[case("ünïcode: \"x\"")]
    #[case("menu {")]
    #[case("}")]
    fn leaf_is_rejected(#[case] line: &str) {
        assert!(parse_leaf(line).is_none());
    }

    #[rstest]
    #[case("menu {", Some("menu"))]
    #[case("a-b_c9 {", Some("a-b_c9"))]
    #[case("menu{", None)]
    #[case("menu  {", None)]
    #[case(" {", None)]
    #[case("menu { }", None)]
    #[case("my menu {", None)]
    fn container_open_is_recognized(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_container_open(line), expected);
    }

    #[rstest]
    #[case("\\\\n", "\\\n")]
    #[case("\\\"\\n", "\"\n")]
    #[case("end\\", "end\\")]
    #[case("plain text", "plain text")]
    #[case("日本語\\n", "日本語\n")]
    fn decode_value_is_single_pass(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(decode_value(raw), expected);
    }

    #[googletest::test]
    fn parse_element_returns_cursor_after_container() {
        let lines = normalize_lines("en", ["menu {", "save: \"Save\"", "}", "quit: \"Quit\""]);
        let parser = ElementParser::new(&lines);

        let (element, next) = parser.parse_element(1, "en").unwrap();

        expect_that!(element.name().to_string(), eq("menu"));
        expect_that!(next, eq(4));
        let (element, next) = parser.parse_element(next, "en").unwrap();
        expect_that!(element.name().to_string(), eq("quit"));
        expect_that!(next, eq(5));
    }

    #[rstest]
    fn parse_element_past_end_is_unterminated() {
        let lines = normalize_lines("en", Vec::<&str>::new());
        let parser = ElementParser::new(&lines);

        assert_eq!(
            parser.parse_element(lines.len(), "en"),
            Err(ParseError::UnterminatedContainer { container: "en".to_string() })
        );
    }

    #[rstest]
    fn parse_container_rejects_leaf_line() {
        let lines = normalize_lines("en", ["a: \"1\""]);
        let parser = ElementParser::new(&lines);

        assert_eq!(
            parser.parse_container(1, "en").unwrap_err(),
            ParseError::MalformedLine {
                line: "a: \"1\"".to_string(),
                scope: "en".to_string(),
                line_number: Some(1),
            }
        );
    }
}
