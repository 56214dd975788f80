//! Reader for the textual index form.
//!
//! ```text
//! index  := '{' group* '}'
//! group  := '{' [field (',' field)*] '}'
//! field  := any run of characters other than '{', '}' and ','
//! list   := [index (sep index)*]      sep := whitespace and/or ','
//! ```
//!
//! Whitespace between tokens is ignored and field names are trimmed, so a
//! name may itself contain inner spaces. Blank fields (`{a,,b}`, `{ }`) are
//! skipped. Printing is handled by the `Display` impls on [`Index`].

use crate::error::ParseError;
use crate::field::{Field, FieldGroup};
use crate::index::Index;
use std::str::FromStr;

/// Parses exactly one index; trailing non-whitespace input is an error.
pub fn parse_index(input: &str) -> Result<Index, ParseError> {
    let mut cursor = Cursor::new(input);
    let index = cursor.index()?;
    cursor.skip_whitespace();
    if cursor.peek().is_some() {
        return Err(ParseError::TrailingInput {
            position: cursor.pos,
        });
    }
    Ok(index)
}

/// Parses a list of indexes separated by commas and/or whitespace.
///
/// This accepts the form produced by joining printed indexes with `", "` or
/// newlines. An empty or blank input yields an empty list.
pub fn parse_index_list(input: &str) -> Result<Vec<Index>, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut out = Vec::new();
    loop {
        cursor.skip_separators();
        if cursor.peek().is_none() {
            return Ok(out);
        }
        out.push(cursor.index()?);
    }
}

impl FromStr for Index {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_index(s)
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == ',') {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(ParseError::Unexpected {
                position: self.pos,
                expected,
                found,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn index(&mut self) -> Result<Index, ParseError> {
        self.expect('{', "'{'")?;
        let mut index = Index::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => index.push_group(self.group()?),
                Some('}') => {
                    self.bump();
                    return Ok(index);
                }
                Some(found) => {
                    return Err(ParseError::Unexpected {
                        position: self.pos,
                        expected: "'{' or '}'",
                        found,
                    })
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "'}'" }),
            }
        }
    }

    fn group(&mut self) -> Result<FieldGroup, ParseError> {
        self.expect('{', "'{'")?;
        let mut group = FieldGroup::new();
        let mut start = self.pos;
        loop {
            match self.peek() {
                Some(',') => {
                    push_field(&mut group, &self.input[start..self.pos]);
                    self.bump();
                    start = self.pos;
                }
                Some('}') => {
                    push_field(&mut group, &self.input[start..self.pos]);
                    self.bump();
                    return Ok(group);
                }
                Some('{') => {
                    return Err(ParseError::Unexpected {
                        position: self.pos,
                        expected: "field name, ',' or '}'",
                        found: '{',
                    })
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "'}'" }),
            }
        }
    }
}

fn push_field(group: &mut FieldGroup, raw: &str) {
    let name = raw.trim();
    if !name.is_empty() {
        group.push(Field::new(name));
    }
}
