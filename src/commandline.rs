//! Tokenizer for the `-key {value}` text grammar.
//!
//! The grammar is a flat list of parameters. Each parameter is a dash followed by a name and an
//! optional value. A value is either a brace block, whose content is kept verbatim (nested
//! braces and whitespace included), or a bare word that ends at the next whitespace:
//!
//! ```text
//! -name {Blend Weight} -interfaceType 3 -flags 0 -defaultValue {-type AttributeFloat -value {1.5} }
//! ```
//!
//! A dash directly followed by a digit or a dot starts a value (a negative number), never a
//! parameter name. Parameter names compare ASCII case-insensitively and the first occurrence of
//! a name wins.

use crate::Result;

/// One `-name value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name without the leading dash
    pub name: String,
    /// Raw value; empty when the parameter carries no value
    pub value: String,
}

/// Parsed parameter list.
///
/// # Examples
///
/// ```rust
/// use attrsettings::CommandLine;
///
/// let cmd = CommandLine::parse("-type AttributeFloat -value { 1.5 } -enabled")?;
/// assert_eq!(cmd.value("type"), Some("AttributeFloat"));
/// assert_eq!(cmd.value("value"), Some(" 1.5 "));
/// assert!(cmd.has_parameter("enabled"));
/// assert_eq!(cmd.value("enabled"), Some(""));
/// # Ok::<(), attrsettings::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    parameters: Vec<Parameter>,
}

impl CommandLine {
    /// Tokenize `input`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an unbalanced brace block, a stray closing brace or
    /// text that is not attached to any parameter.
    pub fn parse(input: &str) -> Result<Self> {
        let bytes = input.as_bytes();
        let mut parameters = Vec::new();
        let mut pos = 0;

        loop {
            pos = skip_whitespace(bytes, pos);
            if pos >= bytes.len() {
                break;
            }

            if !starts_parameter(bytes, pos) {
                return Err(malformed_error!(
                    "Unexpected text at offset {} - '{}'",
                    pos,
                    &input[pos..]
                ));
            }

            // Name runs until whitespace or an opening brace.
            let name_start = pos + 1;
            let mut name_end = name_start;
            while name_end < bytes.len()
                && !bytes[name_end].is_ascii_whitespace()
                && bytes[name_end] != b'{'
            {
                name_end += 1;
            }
            if name_end == name_start {
                return Err(malformed_error!("Empty parameter name at offset {}", pos));
            }
            let name = input[name_start..name_end].to_string();

            pos = skip_whitespace(bytes, name_end);
            let value = if pos < bytes.len() && bytes[pos] == b'{' {
                let (content, next) = read_block(input, pos)?;
                pos = next;
                content.to_string()
            } else if pos >= bytes.len() || starts_parameter(bytes, pos) {
                String::new()
            } else if bytes[pos] == b'}' {
                return Err(malformed_error!("Unbalanced '}}' at offset {}", pos));
            } else {
                let start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                input[start..pos].to_string()
            };

            parameters.push(Parameter { name, value });
        }

        Ok(CommandLine { parameters })
    }

    /// Returns true if a parameter with this name is present, with or without a value
    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Raw value of a parameter, `None` if the parameter is absent
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).map(|p| p.value.as_str())
    }

    /// Raw value of a parameter, or `default` if the parameter is absent
    #[must_use]
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// Value of a parameter parsed as a signed integer.
    ///
    /// Returns `Ok(None)` if the parameter is absent.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the parameter is present but not an integer.
    pub fn value_as_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.value(name) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
                malformed_error!("Parameter '-{}' is not an integer - '{}'", name, raw)
            }),
        }
    }

    /// Number of parsed parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if no parameter was parsed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate the parameters in input order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    fn find(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn starts_parameter(bytes: &[u8], pos: usize) -> bool {
    bytes[pos] == b'-'
        && bytes
            .get(pos + 1)
            .is_some_and(|c| !c.is_ascii_digit() && *c != b'.' && !c.is_ascii_whitespace())
}

/// Read the brace block opening at `open`, returning its inner content and the offset after
/// the closing brace.
fn read_block(input: &str, open: usize) -> Result<(&str, usize)> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;

    for (i, &c) in bytes.iter().enumerate().skip(open) {
        match c {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[open + 1..i], i + 1));
                }
            }
            _ => {}
        }
    }

    Err(malformed_error!("Unbalanced '{{' at offset {}", open))
}
