//! Formatting of the JSON embedded in `{% schema %}` tags.
//!
//! Section schemas are JSON with block comments (the injected template
//! headers), so a strict JSON parser cannot round-trip them. [`PrettyJson`]
//! re-lays the token stream instead: one value per line, comments on their
//! own lines, no trailing commas.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// The `{% schema %}` region, including whitespace-control variants.
static SCHEMA_REGION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{%-?\s*schema\s*-?%\}(.*?)\{%-?\s*endschema\s*-?%\}")
        .expect("Invalid schema region regex")
});

/// A pretty-printer for schema JSON.
pub trait JsonFormatter: Send + Sync {
    /// Format `json`, or fail without side effects.
    fn format(&self, json: &str) -> Result<String>;
}

/// Token-level JSON pretty-printer that tolerates comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyJson {
    indent: usize,
}

impl PrettyJson {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }
}

impl Default for PrettyJson {
    fn default() -> Self {
        Self::new(4)
    }
}

impl JsonFormatter for PrettyJson {
    fn format(&self, json: &str) -> Result<String> {
        let tokens = tokenize(json)?;
        check_grammar(&tokens)?;
        Ok(Printer::new(self.indent).print(&tokens))
    }
}

/// Format the payload of the first `{% schema %}` region in `document`.
///
/// A document without a schema region, or with a blank one, is returned
/// unchanged.
///
/// # Errors
///
/// Returns the formatter's error untouched; see [`format_embedded_json`]
/// for the variant that falls back to the input.
pub fn try_format_embedded_json(document: &str, formatter: &dyn JsonFormatter) -> Result<String> {
    let Some(payload) = SCHEMA_REGION_REGEX.captures(document).and_then(|c| c.get(1)) else {
        return Ok(document.to_string());
    };

    if payload.as_str().trim().is_empty() {
        return Ok(document.to_string());
    }

    let formatted = formatter.format(payload.as_str())?;

    let mut out = String::with_capacity(document.len() + formatted.len());
    out.push_str(&document[..payload.start()]);
    out.push('\n');
    out.push_str(formatted.trim_end());
    out.push('\n');
    out.push_str(&document[payload.end()..]);
    Ok(out)
}

/// Format the embedded schema JSON, falling back to `document` on failure.
///
/// Formatter failures are logged as warnings and never propagate.
pub fn format_embedded_json(document: &str, formatter: &dyn JsonFormatter) -> String {
    match try_format_embedded_json(document, formatter) {
        Ok(formatted) => formatted,
        Err(e) => {
            tracing::warn!("Unable to format schema output: {}", e);
            document.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(char),
    Close(char),
    Comma,
    Colon,
    /// String, number, `true`, `false`, `null` or any other bare word
    Value(&'a str),
    Comment(&'a str),
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'{' | b'}' | b'[' | b']' | b',' | b':' | b'"' | b'/')
}

fn tokenize(src: &str) -> Result<Vec<Token<'_>>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b @ (b'{' | b'[') => {
                tokens.push(Token::Open(b as char));
                i += 1;
            }
            b @ (b'}' | b']') => {
                tokens.push(Token::Close(b as char));
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            b'"' => {
                let mut j = i + 1;
                loop {
                    match bytes.get(j) {
                        None | Some(b'\n') => {
                            return Err(Error::format(format!("unterminated string at byte {i}")));
                        }
                        Some(b'\\') => j += 2,
                        Some(b'"') => break,
                        Some(_) => j += 1,
                    }
                }
                tokens.push(Token::Value(&src[i..=j]));
                i = j + 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = src[i + 2..]
                    .find("*/")
                    .ok_or_else(|| Error::format(format!("unterminated comment at byte {i}")))?;
                let end = i + 2 + end + 2;
                tokens.push(Token::Comment(&src[i..end]));
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = src[i..].find('\n').map_or(src.len(), |n| i + n);
                tokens.push(Token::Comment(src[i..end].trim_end()));
                i = end;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !is_delimiter(bytes[i]) {
                    i += 1;
                }
                if i == start {
                    return Err(Error::format(format!("unexpected character at byte {i}")));
                }
                tokens.push(Token::Value(&src[start..i]));
            }
        }
    }

    Ok(tokens)
}

/// What the grammar allows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// An array element (or the close of the array)
    Element,
    /// An object key (or the close of the object)
    Key,
    Colon,
    /// The value after `key:`
    MemberValue,
    /// `,` or a close
    Separator,
}

/// Validate the token stream as JSON.
///
/// Comments may appear anywhere, trailing commas are accepted, and the top
/// level may be a comma-separated list (a bare declaration expands to one).
/// Anything else, such as a missing comma or a key without a value, is an
/// error so the caller keeps the original text.
fn check_grammar(tokens: &[Token<'_>]) -> Result<()> {
    let mut stack: Vec<char> = Vec::new();
    let mut expect = Expect::Element;

    for token in tokens {
        expect = match (*token, expect) {
            (Token::Comment(_), state) => state,
            (Token::Open(c), Expect::Element | Expect::MemberValue) => {
                stack.push(c);
                if c == '{' { Expect::Key } else { Expect::Element }
            }
            (Token::Close(c), Expect::Element | Expect::Key | Expect::Separator) => {
                let expected = match stack.pop() {
                    Some('{') => '}',
                    Some(_) => ']',
                    None => return Err(Error::format(format!("unexpected '{c}'"))),
                };
                if c != expected {
                    return Err(Error::format(format!("expected '{expected}', found '{c}'")));
                }
                Expect::Separator
            }
            (Token::Comma, Expect::Separator) => {
                if stack.last() == Some(&'{') { Expect::Key } else { Expect::Element }
            }
            (Token::Colon, Expect::Colon) => Expect::MemberValue,
            (Token::Value(v), Expect::Key) if v.starts_with('"') => Expect::Colon,
            (Token::Value(_), Expect::Element | Expect::MemberValue) => Expect::Separator,
            (token, state) => {
                return Err(Error::format(format!("unexpected {token:?} where {state:?} was expected")));
            }
        };
    }

    if let Some(open) = stack.last() {
        return Err(Error::format(format!("unclosed '{open}'")));
    }
    if matches!(expect, Expect::Colon | Expect::MemberValue) {
        return Err(Error::format("object member is missing its value"));
    }
    Ok(())
}

struct Printer {
    out: String,
    unit: String,
    depth: usize,
    line_start: bool,
}

impl Printer {
    fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            unit: " ".repeat(indent),
            depth: 0,
            line_start: true,
        }
    }

    fn newline(&mut self) {
        if !self.line_start {
            let len = self.out.trim_end_matches(' ').len();
            self.out.truncate(len);
            self.out.push('\n');
            self.line_start = true;
        }
    }

    fn write(&mut self, s: &str) {
        if self.line_start {
            for _ in 0..self.depth {
                self.out.push_str(&self.unit);
            }
            self.line_start = false;
        }
        self.out.push_str(s);
    }

    /// Comments get their own lines; continuation lines are re-aligned
    /// under the opening `/*`.
    fn comment(&mut self, text: &str) {
        self.newline();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if idx > 0 {
                if line.is_empty() {
                    continue;
                }
                self.newline();
                if line.starts_with('*') {
                    self.write(" ");
                }
            }
            self.write(line);
        }
        self.newline();
    }

    fn print(mut self, tokens: &[Token<'_>]) -> String {
        for (i, token) in tokens.iter().enumerate() {
            match *token {
                Token::Open(c) => {
                    let mut buf = [0u8; 4];
                    self.write(c.encode_utf8(&mut buf));
                    self.depth += 1;
                    if !matches!(tokens.get(i + 1), Some(Token::Close(_))) {
                        self.newline();
                    }
                }
                Token::Close(c) => {
                    self.depth = self.depth.saturating_sub(1);
                    if !matches!(i.checked_sub(1).map(|p| tokens[p]), Some(Token::Open(_))) {
                        self.newline();
                    }
                    let mut buf = [0u8; 4];
                    self.write(c.encode_utf8(&mut buf));
                }
                Token::Comma => {
                    let next = tokens[i + 1..]
                        .iter()
                        .find(|t| !matches!(t, Token::Comment(_)));
                    // No trailing commas
                    if matches!(next, None | Some(Token::Close(_))) {
                        continue;
                    }
                    self.write(",");
                    self.newline();
                }
                Token::Colon => self.write(": "),
                Token::Value(v) => self.write(v),
                Token::Comment(text) => self.comment(text),
            }
        }

        let mut out = self.out;
        out.truncate(out.trim_end().len());
        out
    }
}
