//! Read position over a single message buffer. Every decode stage consumes a
//! prefix of what is left and leaves the cursor on the first unconsumed byte.

use crate::error::{Error, Malformed};

#[derive(Clone, Debug)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.buf.get(self.pos + ahead).copied()
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = usize::min(self.pos + n, self.buf.len());
    }

    /// Everything not consumed yet, without moving.
    #[cfg(test)]
    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Error located at the current position.
    #[inline]
    pub(crate) fn error(&self, kind: Malformed) -> Error {
        self.error_at(self.pos, kind)
    }

    #[inline]
    pub(crate) fn error_at(&self, offset: usize, kind: Malformed) -> Error {
        Error::MalformedMessage { offset, kind }
    }

    /// Consume one byte, which must be `expected`.
    pub(crate) fn expect(&mut self, expected: u8) -> Result<(), Error> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(Malformed::ExpectedChar(expected as char))),
            None => Err(self.error(Malformed::UnexpectedEndOfInput)),
        }
    }

    /// Consume one byte if it is `expected`.
    pub(crate) fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `f` holds, returning them. May be empty.
    pub(crate) fn take_while<F>(&mut self, f: F) -> &'a [u8]
    where
        F: Fn(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !f(b) {
                break;
            }
            self.pos += 1;
        }
        &self.buf[start..self.pos]
    }

    /// Consume exactly `n` ascii digits and return their value.
    pub(crate) fn fixed_digits(&mut self, n: usize) -> Result<u32, Error> {
        let mut value = 0u32;
        for _ in 0..n {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    value = value * 10 + (c - b'0') as u32;
                    self.pos += 1;
                }
                Some(_) => return Err(self.error(Malformed::TooFewDigits)),
                None => return Err(self.error(Malformed::UnexpectedEndOfInput)),
            }
        }

        Ok(value)
    }

    /// Consume between 1 and `max` digits without a leading zero (a lone
    /// `0` is fine) and return their value.
    pub(crate) fn decimal(&mut self, max: usize) -> Result<u32, Error> {
        let start = self.pos;
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(if self.is_empty() {
                self.error(Malformed::UnexpectedEndOfInput)
            } else {
                self.error(Malformed::TooFewDigits)
            });
        }
        if digits.len() > max {
            return Err(self.error_at(start, Malformed::TooManyDigits));
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return Err(self.error_at(start, Malformed::LeadingZero));
        }

        Ok(digits
            .iter()
            .fold(0u32, |acc, c| acc * 10 + (c - b'0') as u32))
    }
}
