//! Encoder and decoder for [RFC 5424](https://tools.ietf.org/html/rfc5424) Syslog messages. Not
//! to be confused with the older [RFC 3164](https://tools.ietf.org/html/rfc3164) BSD Syslog
//! protocol, which many systems still emit.
//!
//! In particular, supports the Structured Data fields, with any number of elements and escaped
//! parameter values.
//!
//! The codec works on one message at a time. Framing (RFC 5426 datagrams, RFC 6587 octet
//! counting) is up to the caller, `decode` expects exactly one message's bytes.
//!
//! # Example
//!
//! A simple syslog server
//!
//! ```no_run
//! use std::net::UdpSocket;
//!
//! let s = UdpSocket::bind("127.0.0.1:10514").unwrap();
//! let mut buf = [0u8; 2048];
//! loop {
//!     let (data_read, _) = s.recv_from(&mut buf).unwrap();
//!     let msg = syslog_codec::decode(&buf[..data_read]).unwrap();
//!     println!(
//!         "{} {} {:?} {:?}",
//!         msg.facility(),
//!         msg.severity(),
//!         msg.header.hostname,
//!         msg.msg_str()
//!     );
//! }
//! ```
//!
//! And the other way around
//!
//! ```
//! use syslog_codec::{encode_with, CodecOptions, Facility, OutputRepresentation, Severity, SyslogMessage};
//!
//! let msg = SyslogMessage::new(Facility::LOCAL0, Severity::INFO).with_msg("test");
//! let options = CodecOptions::new(OutputRepresentation::ByteBuffer);
//! let encoded = encode_with(&msg, &options).unwrap();
//! assert_eq!(encoded.into_bytes(), "<134>1 - - - - - - test");
//! ```

mod cursor;
mod encoded;
mod error;
mod facility;
mod field;
mod message;
mod options;
mod priority;
pub mod rfc5424;
mod severity;
mod structured_data;
mod timestamp;

use bytes::Bytes;
use tracing::{debug, trace};

pub use encoded::Encoded;
pub use error::{Error, Invalid, Malformed};
pub use facility::{code_to_facility, facility_code, Facility};
pub use message::{Header, SyslogMessage, VERSION};
pub use options::{CodecOptions, OutputRepresentation};
pub use priority::{decode_priority, Priority, MAX_PRIORITY};
pub use severity::{code_to_severity, severity_code, Severity};
pub use structured_data::StructuredElement;
pub use timestamp::{Date, Offset, Sign, Time, Timestamp};

/// Encode with the default options, producing a chunk sequence.
pub fn encode(message: &SyslogMessage) -> Result<Encoded, Error> {
    encode_with(message, &CodecOptions::default())
}

/// Encode `message` into the representation selected by `options`.
pub fn encode_with(message: &SyslogMessage, options: &CodecOptions) -> Result<Encoded, Error> {
    let chunks = rfc5424::encode_chunks(message).inspect_err(|err| {
        debug!(error = %err, "rejected syslog message for encoding");
    })?;

    let encoded = Encoded::from_chunks(chunks, options.output);
    trace!(len = encoded.len(), output = %options.output, "encoded syslog message");
    Ok(encoded)
}

/// Decode exactly one message with the default options.
pub fn decode(buf: &[u8]) -> Result<SyslogMessage, Error> {
    decode_with(buf, &CodecOptions::default())
}

/// Decode exactly one message. The output representation in `options` has
/// no bearing on decoding.
pub fn decode_with(buf: &[u8], _options: &CodecOptions) -> Result<SyslogMessage, Error> {
    rfc5424::parse_message(buf).inspect_err(|err| {
        debug!(error = %err, len = buf.len(), "rejected syslog message");
    })
}

/// Decode a message whose body keeps referencing `buf` instead of being
/// copied.
pub fn decode_bytes(buf: &Bytes) -> Result<SyslogMessage, Error> {
    rfc5424::parse_message_bytes(buf).inspect_err(|err| {
        debug!(error = %err, len = buf.len(), "rejected syslog message");
    })
}
