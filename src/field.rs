//! The space terminated header fields: HOSTNAME, APP-NAME, PROCID and MSGID.
//! Each is `NILVALUE / 1*N PRINTUSASCII`.

use bytes::{Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::{Error, Invalid, Malformed};

pub(crate) const NIL: &[u8] = b"-";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FieldKind {
    Hostname,
    AppName,
    ProcId,
    MsgId,
}

impl FieldKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            FieldKind::Hostname => "hostname",
            FieldKind::AppName => "appname",
            FieldKind::ProcId => "procid",
            FieldKind::MsgId => "msgid",
        }
    }

    pub(crate) fn max_len(self) -> usize {
        match self {
            FieldKind::Hostname => 255,
            FieldKind::AppName => 48,
            FieldKind::ProcId => 128,
            FieldKind::MsgId => 32,
        }
    }
}

#[inline]
pub(crate) fn is_printable(c: u8) -> bool {
    (33..=126).contains(&c)
}

/// Append the wire form of an optional field, `-` when absent.
pub(crate) fn encode(kind: FieldKind, value: Option<&str>, dst: &mut BytesMut) -> Result<(), Error> {
    let Some(value) = value else {
        dst.extend_from_slice(NIL);
        return Ok(());
    };

    let invalid = |reason| Error::invalid(kind.name(), reason);
    if value.is_empty() {
        return Err(invalid(Invalid::Empty));
    }
    if value.as_bytes() == NIL {
        return Err(invalid(Invalid::Nil));
    }
    if value.len() > kind.max_len() {
        return Err(invalid(Invalid::TooLong(kind.max_len())));
    }
    if let Some(c) = value.chars().find(|c| !c.is_ascii() || !is_printable(*c as u8)) {
        return Err(invalid(Invalid::NonPrintable(c)));
    }

    dst.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Same as [`encode`], producing a standalone chunk.
pub(crate) fn encode_chunk(kind: FieldKind, value: Option<&str>) -> Result<Bytes, Error> {
    match value {
        None => Ok(Bytes::from_static(NIL)),
        Some(value) => {
            let mut dst = BytesMut::with_capacity(value.len());
            encode(kind, Some(value), &mut dst)?;
            Ok(dst.freeze())
        }
    }
}

/// Read one field, stopping in front of the next space or the end of input.
pub(crate) fn parse(kind: FieldKind, cursor: &mut Cursor<'_>) -> Result<Option<String>, Error> {
    if cursor.peek() == Some(b'-') && matches!(cursor.peek_at(1), None | Some(b' ')) {
        cursor.advance(1);
        return Ok(None);
    }

    let start = cursor.position();
    let value = cursor.take_while(|c| c != b' ');
    if value.is_empty() {
        return Err(if cursor.is_empty() {
            cursor.error(Malformed::UnexpectedEndOfInput)
        } else {
            cursor.error(Malformed::EmptyField)
        });
    }
    if value.len() > kind.max_len() {
        return Err(cursor.error_at(start, Malformed::FieldTooLong(kind.max_len())));
    }
    if let Some(idx) = value.iter().position(|c| !is_printable(*c)) {
        return Err(cursor.error_at(start + idx, Malformed::NonPrintable(value[idx])));
    }

    // printable ascii only from here on
    Ok(Some(value.iter().map(|&c| c as char).collect()))
}
