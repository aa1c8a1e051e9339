//! Reading the emailed verification code from the operator.

use regex::Regex;
use std::io::BufRead;

use crate::error::CodeInputError;

pub const CODE_LENGTH: usize = 6;
const CODE_PATTERN: &str = r"^[0-9]{6}$";

/// Check that `code` is exactly six ASCII digits.
pub fn validate(code: &str) -> Result<(), CodeInputError> {
    if code.is_empty() {
        return Err(CodeInputError::Empty);
    }
    if !Regex::new(CODE_PATTERN).is_ok_and(|re| re.is_match(code)) {
        return Err(CodeInputError::Malformed(code.to_string()));
    }
    Ok(())
}

/// Read one line from `input`, trim it, and validate it.
///
/// Blocks until a line (or end of input) arrives. End of input reads as an
/// empty code.
pub fn read_code(input: &mut dyn BufRead) -> Result<String, CodeInputError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let code = line.trim().to_string();
    validate(&code)?;
    Ok(code)
}
