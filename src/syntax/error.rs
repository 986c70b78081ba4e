use thiserror::Error;

/// Errors raised while parsing a locale file.
///
/// Any of them aborts the parse of the whole file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line is neither a translation nor a container opening
    #[error("Invalid line{}: [{line}] in \"{scope}\"", format_line_number(.line_number))]
    MalformedLine {
        /// Offending logical line
        line: String,
        /// Name of the enclosing container
        scope: String,
        /// 1-based line in the locale file, if the line comes from it
        line_number: Option<usize>,
    },

    /// End of input reached before the container's `}`
    #[error("Missing end of container in \"{container}\"")]
    UnterminatedContainer { container: String },

    /// Two children of the same container share a name
    #[error("Duplicate key{}: \"{key}\" in \"{container}\"", format_line_number(.line_number))]
    DuplicateKey {
        key: String,
        container: String,
        /// Line on which the second definition starts
        line_number: Option<usize>,
    },
}

fn format_line_number(line_number: &Option<usize>) -> String {
    line_number.map_or_else(String::new, |n| format!(" at line {n}"))
}
