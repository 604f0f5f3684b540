//! Header and message assembly.
//!
//! ```text
//! SYSLOG-MSG = HEADER SP STRUCTURED-DATA [SP MSG]
//! HEADER     = PRI VERSION SP TIMESTAMP SP HOSTNAME SP APP-NAME SP PROCID SP MSGID
//! ```

use bytes::{Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::{Error, Invalid, Malformed};
use crate::field::{self, FieldKind, NIL};
use crate::message::{Header, SyslogMessage};
use crate::{priority, structured_data, timestamp};

const SP: &[u8] = b" ";
const MAX_VERSION: u16 = 999;

/// Produce the wire form as a list of chunks in emission order. The message
/// body is passed through without copying.
pub fn encode_chunks(message: &SyslogMessage) -> Result<Vec<Bytes>, Error> {
    let header = &message.header;
    if header.version == 0 || header.version > MAX_VERSION {
        return Err(Error::invalid("version", Invalid::OutOfRange));
    }

    // PRI+VERSION, then SP plus one chunk for each of the six remaining
    // sections, plus the optional SP MSG
    let mut chunks = Vec::with_capacity(2 + 2 * 6);
    chunks.push(Bytes::from(format!(
        "<{}>{}",
        header.priority().code(),
        header.version
    )));

    chunks.push(Bytes::from_static(SP));
    chunks.push(match &header.timestamp {
        Some(ts) => Bytes::from(ts.encode()?),
        None => Bytes::from_static(NIL),
    });

    for (kind, value) in [
        (FieldKind::Hostname, &header.hostname),
        (FieldKind::AppName, &header.appname),
        (FieldKind::ProcId, &header.procid),
        (FieldKind::MsgId, &header.msgid),
    ] {
        chunks.push(Bytes::from_static(SP));
        chunks.push(field::encode_chunk(kind, value.as_deref())?);
    }

    chunks.push(Bytes::from_static(SP));
    let mut sd = BytesMut::new();
    structured_data::encode(&message.structured_data, &mut sd)?;
    chunks.push(sd.freeze());

    if let Some(msg) = &message.msg {
        chunks.push(Bytes::from_static(SP));
        chunks.push(msg.clone());
    }

    Ok(chunks)
}

/// Parse everything up to the message body. Returns the message without its
/// body, and where the body starts if there is one.
fn parse_parts(buf: &[u8]) -> Result<(SyslogMessage, Option<usize>), Error> {
    let mut cursor = Cursor::new(buf);

    // https://datatracker.ietf.org/doc/html/rfc5424#section-6.2.1
    let pri = priority::parse(&mut cursor)?;

    // https://datatracker.ietf.org/doc/html/rfc5424#section-9.1
    let at = cursor.position();
    let version = cursor.decimal(3)?;
    if version == 0 {
        return Err(cursor.error_at(at, Malformed::BadVersion));
    }
    cursor.expect(b' ')?;

    let timestamp = timestamp::parse_optional(&mut cursor)?;
    cursor.expect(b' ')?;
    let hostname = field::parse(FieldKind::Hostname, &mut cursor)?;
    cursor.expect(b' ')?;
    let appname = field::parse(FieldKind::AppName, &mut cursor)?;
    cursor.expect(b' ')?;
    let procid = field::parse(FieldKind::ProcId, &mut cursor)?;
    cursor.expect(b' ')?;
    let msgid = field::parse(FieldKind::MsgId, &mut cursor)?;
    cursor.expect(b' ')?;

    let structured_data = structured_data::parse(&mut cursor)?;

    // STRUCTURED-DATA only, or SP and the body, possibly empty
    let body = if cursor.is_empty() {
        None
    } else {
        cursor.expect(b' ')?;
        Some(cursor.position())
    };

    let message = SyslogMessage {
        header: Header {
            facility: pri.facility(),
            severity: pri.severity(),
            version: version as u16,
            timestamp,
            hostname,
            appname,
            procid,
            msgid,
        },
        structured_data,
        msg: None,
    };

    Ok((message, body))
}

/// Parse one complete message. The body is copied out of `buf`.
pub fn parse_message(buf: &[u8]) -> Result<SyslogMessage, Error> {
    let (mut message, body) = parse_parts(buf)?;
    message.msg = body.map(|at| Bytes::copy_from_slice(&buf[at..]));
    Ok(message)
}

/// Same as [`parse_message`], but the body shares `buf`'s storage.
pub fn parse_message_bytes(buf: &Bytes) -> Result<SyslogMessage, Error> {
    let (mut message, body) = parse_parts(buf)?;
    message.msg = body.map(|at| buf.slice(at..));
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;
    use crate::severity::Severity;
    use crate::structured_data::StructuredElement;

    fn encode_string(message: &SyslogMessage) -> String {
        let bytes: Vec<u8> = encode_chunks(message).unwrap().concat();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn rfc5424_examples() {
        // https://datatracker.ietf.org/doc/html/rfc5424#section-6.5
        for input in [
            r##"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - BOM'su root' failed for lonvick on /dev/pts/8"##,
            r##"<165>1 2003-08-24T05:14:15.000003-07:00 192.0.2.1 myproc 8710 - - %% It's time to make the do-nuts."##,
            r##"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"] BOMAn application event log entry..."##,
            r##"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"][examplePriority@32473 class="high"]"##,
        ] {
            let msg = parse_message(input.as_bytes()).unwrap();
            assert_eq!(encode_string(&msg), input);
        }
    }

    #[test]
    fn test_simple() {
        let msg = parse_message(b"<1>1 - - - - - -").expect("Should parse empty message");
        assert_eq!(msg.facility(), Facility::KERN);
        assert_eq!(msg.severity(), Severity::ALERT);
        assert_eq!(msg.header.version, 1);
        assert!(msg.header.timestamp.is_none());
        assert!(msg.header.hostname.is_none());
        assert!(msg.header.appname.is_none());
        assert!(msg.header.procid.is_none());
        assert!(msg.header.msgid.is_none());
        assert!(msg.structured_data.is_empty());
        assert!(msg.msg.is_none());
    }

    #[test]
    fn empty_body_is_kept() {
        let msg = parse_message(b"<1>1 - - - - - - ").unwrap();
        assert_eq!(msg.msg.as_deref(), Some(&b""[..]));
        assert_eq!(encode_string(&msg), "<1>1 - - - - - - ");
    }

    #[test]
    fn body_is_verbatim() {
        let msg = parse_message(b"<1>1 - - - - - -  two  spaces \\] \xff").unwrap();
        assert_eq!(msg.msg.as_deref(), Some(&b" two  spaces \\] \xff"[..]));
    }

    #[test]
    fn body_shares_storage() {
        let buf = Bytes::from_static(b"<13>1 - host app - - - hello");
        let msg = parse_message_bytes(&buf).unwrap();
        let body = msg.msg.unwrap();
        assert_eq!(body, "hello");
        assert_eq!(body.as_ptr(), buf[23..].as_ptr());
    }

    #[test]
    fn test_truncated() {
        let err = parse_message(b"<39>1 2018-05-15T20:56:58+00:00 -web1west -")
            .expect_err("should fail");
        assert_eq!(
            err,
            Error::MalformedMessage {
                offset: 43,
                kind: Malformed::UnexpectedEndOfInput
            }
        );

        // a header cut short after the timestamp
        assert!(parse_message(b"<134>1 -").unwrap_err().is_malformed());
    }

    #[test]
    fn version() {
        let msg = parse_message(b"<13>12 - - - - - -").unwrap();
        assert_eq!(msg.header.version, 12);

        for input in [
            "<13>0 - - - - - -",
            "<13>01 - - - - - -",
            "<13>1000 - - - - - -",
            "<13> - - - - - -",
            "<13>1- - - - - -",
        ] {
            assert!(parse_message(input.as_bytes()).is_err(), "{input}");
        }

        let mut message = SyslogMessage::new(Facility::USER, Severity::NOTICE);
        message.header.version = 0;
        assert!(encode_chunks(&message).unwrap_err().is_invalid_value());
        message.header.version = 1000;
        assert!(encode_chunks(&message).unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_bad_match() {
        // we shouldn't be able to parse RFC3164 messages
        let msg = parse_message(b"<134>Feb 18 20:53:31 haproxy[376]: I am a message");
        assert!(msg.is_err());
    }

    #[test]
    fn garbage_after_structured_data() {
        assert_eq!(
            parse_message(b"<13>1 - - - - - [a]x").unwrap_err(),
            Error::MalformedMessage {
                offset: 19,
                kind: Malformed::ExpectedChar(' ')
            }
        );
        assert!(parse_message(b"<13>1 - - - - - -x").is_err());
    }

    #[test]
    fn chunks_in_order() {
        let message = SyslogMessage::new(Facility::LOCAL0, Severity::INFO)
            .with_hostname("host")
            .with_element(StructuredElement::new("a"))
            .with_msg("test");
        let chunks = encode_chunks(&message).unwrap();
        assert_eq!(chunks.first().unwrap(), "<134>1");
        assert_eq!(chunks.last().unwrap(), "test");
        assert_eq!(chunks.concat(), b"<134>1 - host - - - [a] test");
    }
}
