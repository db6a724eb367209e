//! Raw source-line classification and decomposition. `!` starts a
//! comment; a line carries an optional `label:` and an optional
//! mnemonic-or-directive with the rest of the line as operand text.

use std::sync::LazyLock;

use regex::Regex;

static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(!.*)?$").unwrap());
static RE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?P<label>\w+):)?\s*((?P<opcode>\.?\w+)(?P<operands>[^!]*))?(!.*)?").unwrap()
});

/// `(label?, mnemonic?, operand text?)` for one source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineParts {
    pub label: Option<String>,
    pub opcode: Option<String>,
    pub operands: Option<String>,
}

/// Whether a line is blank (whitespace or comment only) and therefore
/// never reaches the encoder.
pub fn is_blank(line: &str) -> bool {
    RE_BLANK.is_match(line)
}

/// Break a line into its label / opcode / operand parts. Label and
/// opcode are independent; either may be absent.
pub fn get_parts(line: &str) -> Option<LineParts> {
    let caps = RE_PARTS.captures(line)?;
    Some(LineParts {
        label: caps.name("label").map(|m| m.as_str().to_string()),
        opcode: caps.name("opcode").map(|m| m.as_str().to_string()),
        operands: caps.name("operands").map(|m| m.as_str().to_string()),
    })
}
