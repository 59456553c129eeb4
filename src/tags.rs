//! Struct tag decoding.
//!
//! A tag is a sequence of space separated `key:"value"` pairs. The value is
//! an interpreted string literal whose contents split on `,` into a name and
//! options: `json:"id,omitempty"` decodes to key `json`, value `id` and
//! options `["omitempty"]`.

use thiserror::Error;

use crate::model::TagParam;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("bad syntax for struct tag key at byte {0}")]
    KeySyntax(usize),

    #[error("bad syntax for struct tag pair `{0}`: missing `:`")]
    MissingColon(String),

    #[error("bad syntax for struct tag value of `{0}`: expected a quoted string")]
    MissingQuote(String),

    #[error("bad syntax for struct tag value of `{0}`: unterminated string")]
    UnterminatedValue(String),

    #[error("invalid escape `\\{escape}` in struct tag value of `{key}`")]
    InvalidEscape { key: String, escape: char },
}

/// Turns the raw text of a tag (delimiters already removed) into params.
pub trait TagDecoder {
    fn decode(&self, raw: &str) -> Result<Vec<TagParam>, TagError>;
}

impl<F> TagDecoder for F
where
    F: Fn(&str) -> Result<Vec<TagParam>, TagError>,
{
    fn decode(&self, raw: &str) -> Result<Vec<TagParam>, TagError> {
        self(raw)
    }
}

/// Decoder for the conventional Go struct tag format.
///
/// Every pair is returned in source order, duplicate keys included.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructTagDecoder;

impl TagDecoder for StructTagDecoder {
    fn decode(&self, raw: &str) -> Result<Vec<TagParam>, TagError> {
        let bytes = raw.as_bytes();
        let mut params = Vec::new();
        let mut pos = 0;

        loop {
            while pos < bytes.len() && bytes[pos] == b' ' {
                pos += 1;
            }
            if pos >= bytes.len() {
                return Ok(params);
            }

            let key_start = pos;
            while pos < bytes.len() && is_key_byte(bytes[pos]) {
                pos += 1;
            }
            if pos == key_start {
                return Err(TagError::KeySyntax(key_start));
            }
            let key = &raw[key_start..pos];

            if pos >= bytes.len() || bytes[pos] != b':' {
                return Err(TagError::MissingColon(key.to_owned()));
            }
            pos += 1;
            if pos >= bytes.len() || bytes[pos] != b'"' {
                return Err(TagError::MissingQuote(key.to_owned()));
            }

            let value_start = pos + 1;
            pos = value_start;
            while pos < bytes.len() && bytes[pos] != b'"' {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            if pos >= bytes.len() {
                return Err(TagError::UnterminatedValue(key.to_owned()));
            }
            let value = unquote(key, &raw[value_start..pos])?;
            pos += 1;

            let mut parts = value.split(',');
            let name = parts.next().unwrap_or_default().to_owned();
            let options = parts.map(str::to_owned).collect();
            params.push(TagParam {
                name: key.to_owned(),
                value: name,
                options,
            });
        }
    }
}

/// Key bytes: printable, no space, quote or colon.
#[inline]
fn is_key_byte(b: u8) -> bool {
    b > b' ' && b != b':' && b != b'"' && b != 0x7f
}

fn unquote(key: &str, body: &str) -> Result<String, TagError> {
    if !body.contains('\\') {
        return Ok(body.to_owned());
    }

    let invalid = |escape: char| TagError::InvalidEscape {
        key: key.to_owned(),
        escape,
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err(invalid('\\'));
        };
        let decoded = match esc {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'v' => '\x0b',
            '\\' => '\\',
            '"' => '"',
            'x' => hex_escape(&mut chars, 2).ok_or_else(|| invalid(esc))?,
            'u' => hex_escape(&mut chars, 4).ok_or_else(|| invalid(esc))?,
            'U' => hex_escape(&mut chars, 8).ok_or_else(|| invalid(esc))?,
            other => return Err(invalid(other)),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
