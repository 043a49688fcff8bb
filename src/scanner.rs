use crate::errors::*;

use std::io::BufRead;

/// A character cursor over a line-oriented input stream.
///
/// The XTR grammar mixes free-form white space separated integers with line-sensitive
/// terminators, so this offers both integer extraction (skipping any white space, including line
/// breaks) and whole-line reads. Only the current line is buffered.
pub struct Scanner<R: BufRead> {
    /// The input stream.
    input: R,

    /// The current line, including its line break (if any).
    line: String,

    /// The position of the next character in the current line.
    position: usize,

    /// The 1-based number of the current line.
    line_number: usize,

    /// Whether the input was exhausted.
    is_done: bool,
}

impl<R: BufRead> Scanner<R> {
    /// Create a new scanner reading from the start of the input.
    pub fn new(input: R) -> Self {
        Scanner {
            input,
            line: String::new(),
            position: 0,
            line_number: 0,
            is_done: false,
        }
    }

    /// The 1-based number of the current line (for error messages).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Ensure the current line has unread characters, unless the input is exhausted.
    fn fill(&mut self) -> Result<(), TracerError> {
        while !self.is_done && self.position >= self.line.len() {
            self.line.clear();
            self.position = 0;
            if self.input.read_line(&mut self.line)? == 0 {
                self.is_done = true;
            } else {
                self.line_number += 1;
            }
        }
        Ok(())
    }

    /// Return the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>, TracerError> {
        self.fill()?;
        Ok(self.line[self.position..].chars().next())
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Result<Option<char>, TracerError> {
        let next = self.peek()?;
        if let Some(character) = next {
            self.position += character.len_utf8();
        }
        Ok(next)
    }

    /// Skip blanks (but not line breaks).
    pub fn skip_spaces(&mut self) -> Result<(), TracerError> {
        while let Some(' ') | Some('\t') = self.peek()? {
            self.position += 1;
        }
        Ok(())
    }

    /// Skip all white space, including line breaks.
    pub fn skip_white_space(&mut self) -> Result<(), TracerError> {
        while let Some(character) = self.peek()? {
            if !character.is_whitespace() {
                break;
            }
            self.position += character.len_utf8();
        }
        Ok(())
    }

    /// Read the next white space delimited token on the current line without consuming it.
    pub fn peek_token(&mut self) -> Result<String, TracerError> {
        self.skip_white_space()?;
        Ok(self.line[self.position..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string())
    }

    /// Skip any white space and read an integer.
    ///
    /// If the next token does not start with an integer, nothing beyond the white space is
    /// consumed and `None` is returned.
    pub fn next_int(&mut self) -> Result<Option<i64>, TracerError> {
        self.skip_white_space()?;
        let rest = &self.line[self.position..];
        let bytes = rest.as_bytes();

        let mut length = 0;
        if let Some(b'-') | Some(b'+') = bytes.first() {
            length += 1;
        }
        let digits_start = length;
        while length < bytes.len() && bytes[length].is_ascii_digit() {
            length += 1;
        }
        if length == digits_start {
            return Ok(None);
        }

        match rest[..length].parse::<i64>() {
            Ok(value) => {
                self.position += length;
                Ok(Some(value))
            }
            Err(_) => Ok(None), // NOT TESTED
        }
    }

    /// Read the rest of the current line (without the line break).
    pub fn rest_of_line(&mut self) -> Result<Option<String>, TracerError> {
        self.fill()?;
        if self.is_done {
            return Ok(None);
        }
        let rest = self.line[self.position..]
            .trim_end_matches(|character| character == '\n' || character == '\r')
            .to_string();
        self.position = self.line.len();
        Ok(Some(rest))
    }

    /// Read a line that must contain just a (terminating) dot.
    ///
    /// If the rest of the current line is empty (typically after reading integers), the dot is
    /// expected on the following line.
    pub fn expect_dot(&mut self) -> Result<(), TracerError> {
        let mut line = self.rest_of_line()?;
        if let Some(rest) = &line {
            if rest.trim().is_empty() {
                line = self.rest_of_line()?;
            }
        }
        match line {
            Some(rest) if rest.trim() == "." => Ok(()),
            found => Err(TracerError::TerminatorMissing {
                line_number: self.line_number,
                found: found.unwrap_or_default(),
            }),
        }
    }
}
