//! `PRI = "<" PRIVAL ">"`, where PRIVAL is facility code plus severity code.

use std::fmt;

use crate::cursor::Cursor;
use crate::error::{Error, Malformed};
use crate::facility::Facility;
use crate::severity::Severity;

pub const MAX_PRIORITY: u8 = 191;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Priority(u8);

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Priority(facility.code() + severity.code())
    }

    pub fn from_code(code: u8) -> Option<Self> {
        (code <= MAX_PRIORITY).then_some(Priority(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn facility(self) -> Facility {
        // at most 191 >> 3 == 23
        Facility::from_index(self.0 >> 3)
    }

    pub fn severity(self) -> Severity {
        Severity::from_index(self.0 & 0x7)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Parse `<PRI>` at the cursor.
pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Priority, Error> {
    cursor.expect(b'<')?;
    let start = cursor.position();
    let value = cursor.decimal(3)?;
    cursor.expect(b'>')?;

    u8::try_from(value)
        .ok()
        .and_then(Priority::from_code)
        .ok_or_else(|| cursor.error_at(start, Malformed::BadPriority(value)))
}

/// Read just the leading `<PRI>` of a buffer, ignoring whatever follows.
pub fn decode_priority(buf: &[u8]) -> Result<Priority, Error> {
    parse(&mut Cursor::new(buf))
}
