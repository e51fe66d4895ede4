//! Plain-text key/value property files.
//!
//! The format is the common subset of Java `.properties` files: one
//! `key=value` pair per line, `#` and `!` comments, backslash escapes and
//! line continuations. Files are always UTF-8.
//!
//! Writing is deterministic. Entries are written in insertion order under a
//! fixed comment header, with no timestamp, so saving the same data twice
//! produces the same bytes.

use std::{
    io::{self, Write},
    str::Chars,
};

/// An insertion-ordered set of string properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Creates an empty set of properties.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`.
    ///
    /// An existing key keeps its position and has its value replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the properties, preceded by a `# comment` header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write<W: Write>(&self, writer: &mut W, comment: &str) -> io::Result<()> {
        writeln!(writer, "# {comment}")?;
        for (key, value) in &self.entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }
        writer.flush()
    }

    /// Parses properties from text.
    ///
    /// When a key appears more than once, the last value wins.
    ///
    /// # Errors
    ///
    /// Returns an error if a `\u` escape is malformed or the text ends in the
    /// middle of a continued line.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut properties = Self::new();
        for (line_number, line) in logical_lines(text)? {
            let (key, value) = split_entry(&line);
            let key = unescape(key).map_err(|()| ParseError::InvalidUnicodeEscape(line_number))?;
            let value =
                unescape(value).map_err(|()| ParseError::InvalidUnicodeEscape(line_number))?;
            properties.set(key, value);
        }
        Ok(properties)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.set(key, value);
        }
        properties
    }
}

/// Errors that can occur when parsing a property file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A `\u` escape was not followed by four hex digits.
    #[error("malformed \\uXXXX escape on line {0}")]
    InvalidUnicodeEscape(usize),

    /// The last line ended with a continuation backslash.
    #[error("line {0} continues past the end of the file")]
    DanglingContinuation(usize),
}

/// Joins continued lines and drops blanks and comments.
///
/// Yields each logical line with the (1-based) number of the physical line it
/// starts on.
fn logical_lines(text: &str) -> Result<Vec<(usize, String)>, ParseError> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim_start_matches([' ', '\t', '\x0c']);

        let (start, mut current) = match pending.take() {
            Some((start, current)) => (start, current),
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        if ends_with_continuation(trimmed) {
            current.push_str(&trimmed[..trimmed.len() - 1]);
            pending = Some((start, current));
        } else {
            current.push_str(trimmed);
            lines.push((start, current));
        }
    }

    match pending {
        Some((start, _)) => Err(ParseError::DanglingContinuation(start)),
        None => Ok(lines),
    }
}

fn ends_with_continuation(line: &str) -> bool {
    let backslashes = line.bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 1
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
    let mut chars = line.char_indices();
    let mut key_end = line.len();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let rest = rest
        .strip_prefix(['=', ':'])
        .map_or(rest, |r| r.trim_start_matches([' ', '\t', '\x0c']));
    (key, rest)
}

fn unescape(s: &str) -> Result<String, ()> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = code_unit(&mut chars)?;
                // Characters outside the BMP are written as a surrogate pair.
                let code = if (0xD800..0xDC00).contains(&unit) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(());
                    }
                    let low = code_unit(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(());
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                out.push(char::from_u32(code).ok_or(())?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Reads the four hex digits of a `\uXXXX` escape.
fn code_unit(chars: &mut Chars<'_>) -> Result<u32, ()> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(());
    }
    u32::from_str_radix(&hex, 16).map_err(|_| ())
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn written(properties: &Properties, comment: &str) -> String {
        let mut buf = Vec::new();
        properties.write(&mut buf, comment).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_header_and_entries_in_order() {
        let properties: Properties = [
            ("name", "Demo"),
            ("wsdlUrl", "http://x/ws?wsdl"),
            ("serviceName", ""),
        ]
        .into_iter()
        .collect();

        let expected = "# Project properties\nname=Demo\nwsdlUrl=http\\://x/ws?wsdl\nserviceName=\n";
        assert_eq!(written(&properties, "Project properties"), expected);
    }

    #[test]
    fn written_text_parses_back() {
        let properties: Properties = [
            ("key with spaces", " leading space"),
            ("multi", "line one\nline two\r\n\ttabbed"),
            ("symbols", "a=b:c#d!e\\f"),
            ("unicode", "grüße ✓"),
        ]
        .into_iter()
        .collect();

        let text = written(&properties, "Request endpoints");
        assert_eq!(Properties::parse(&text).unwrap(), properties);
    }

    #[test]
    fn writing_is_deterministic() {
        let properties: Properties = [("endpoint.0", "http://a"), ("selectedEndpoint", "http://a")]
            .into_iter()
            .collect();

        assert_eq!(
            written(&properties, "Request endpoints"),
            written(&properties, "Request endpoints")
        );
    }

    #[test_case("key=value", "key", "value"; "equals")]
    #[test_case("key:value", "key", "value"; "colon")]
    #[test_case("key value", "key", "value"; "whitespace")]
    #[test_case("  key  =  value", "key", "value"; "padded")]
    #[test_case("key=", "key", ""; "empty value")]
    #[test_case("key", "key", ""; "bare key")]
    #[test_case("key=a=b", "key", "a=b"; "separator in value")]
    #[test_case("k\\=ey=value", "k=ey", "value"; "escaped separator in key")]
    #[test_case("key=caf\\u00e9", "key", "café"; "unicode escape")]
    #[test_case("serviceName=Svc \\uD83D\\uDE00", "serviceName", "Svc 😀"; "surrogate pair")]
    fn parses_java_style_entries(text: &str, key: &str, value: &str) {
        let properties = Properties::parse(text).unwrap();
        assert_eq!(properties.get(key), Some(value));
        assert_eq!(properties.iter().count(), 1);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "#Request endpoints\n#Mon Jan 01 00:00:00 UTC 2024\n\n! bang\nendpoint.0=http\\://a\r\n";
        let properties = Properties::parse(text).unwrap();

        assert_eq!(properties.iter().collect::<Vec<_>>(), [("endpoint.0", "http://a")]);
    }

    #[test]
    fn joins_continued_lines() {
        let text = "key=first \\\n    second\nother=x\n";
        let properties = Properties::parse(text).unwrap();

        assert_eq!(properties.get("key"), Some("first second"));
        assert_eq!(properties.get("other"), Some("x"));
    }

    #[test]
    fn escaped_backslash_is_not_a_continuation() {
        let properties = Properties::parse("path=C\\:\\\\\nnext=1\n").unwrap();

        assert_eq!(properties.get("path"), Some("C:\\"));
        assert_eq!(properties.get("next"), Some("1"));
    }

    #[test]
    fn last_duplicate_wins() {
        let properties = Properties::parse("a=1\nb=2\na=3\n").unwrap();

        assert_eq!(properties.get("a"), Some("3"));
        assert_eq!(properties.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test_case("name=\\u12", &ParseError::InvalidUnicodeEscape(1); "short escape")]
    #[test_case("a=1\nname=\\uZZZZ", &ParseError::InvalidUnicodeEscape(2); "non hex escape")]
    #[test_case("a=1\nname=x\\", &ParseError::DanglingContinuation(2); "dangling continuation")]
    #[test_case("name=\\uD83D", &ParseError::InvalidUnicodeEscape(1); "lone high surrogate")]
    #[test_case("name=\\uD83Dx", &ParseError::InvalidUnicodeEscape(1); "high surrogate without pair")]
    #[test_case("name=\\uD83D\\u0041", &ParseError::InvalidUnicodeEscape(1); "high surrogate with bmp unit")]
    #[test_case("name=\\uDE00", &ParseError::InvalidUnicodeEscape(1); "lone low surrogate")]
    #[test_case("name=\\u+12a", &ParseError::InvalidUnicodeEscape(1); "signed escape")]
    fn rejects_malformed_text(text: &str, expected: &ParseError) {
        assert_eq!(&Properties::parse(text).unwrap_err(), expected);
    }
}
