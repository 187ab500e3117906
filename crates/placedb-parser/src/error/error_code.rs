//! Error codes for parser diagnostics.
//!
//! Codes are grouped by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Syntax errors within a line
//! - `E2xx` - Structural errors across lines of one file
//! - `E3xx` - Resolution errors across files of one design

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// A control character outside of whitespace.
    E001,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// The line ended before the record was complete.
    E101,

    // =========================================================================
    // Structural Errors (E2xx)
    // =========================================================================
    /// Missing or mismatched `UCLA <kind> <version>` header.
    E200,

    /// A declared count (`NumNodes`, `NetDegree`, ...) does not match the records.
    E201,

    /// A record outside of the block it belongs to, such as a pin before any
    /// `NetDegree` line.
    E202,

    /// Unrecognized orientation.
    E203,

    /// A `CoreRow` block without a closing `End`.
    E204,

    /// A `CoreRow` block missing a required attribute.
    E205,

    // =========================================================================
    // Resolution Errors (E3xx)
    // =========================================================================
    /// Reference to a node that is not defined in the `.nodes` file.
    E300,

    /// A node or net defined more than once.
    E301,

    /// A file required by the `.aux` file is missing from its list.
    E302,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
        }
    }

    /// A short description, used as the default label text.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete record",
            ErrorCode::E200 => "invalid header",
            ErrorCode::E201 => "count mismatch",
            ErrorCode::E202 => "record outside of its block",
            ErrorCode::E203 => "invalid orientation",
            ErrorCode::E204 => "unterminated row",
            ErrorCode::E205 => "incomplete row",
            ErrorCode::E300 => "undefined node",
            ErrorCode::E301 => "duplicate definition",
            ErrorCode::E302 => "missing file",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E101.description(), "incomplete record");
        assert_eq!(ErrorCode::E203.description(), "invalid orientation");
    }
}
