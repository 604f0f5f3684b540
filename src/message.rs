//! In-memory representation of a single Syslog message.

use bytes::Bytes;

use crate::error::Error;
use crate::facility::Facility;
use crate::priority::Priority;
use crate::severity::Severity;
use crate::structured_data::StructuredElement;
use crate::timestamp::Timestamp;

/// The only version defined by RFC 5424.
pub const VERSION: u16 = 1;

/// Everything in front of the structured data. `None` fields go on the wire
/// as `-`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub facility: Facility,
    pub severity: Severity,
    pub version: u16,
    pub timestamp: Option<Timestamp>,
    pub hostname: Option<String>,
    pub appname: Option<String>,
    pub procid: Option<String>,
    pub msgid: Option<String>,
}

impl Header {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Header {
            facility,
            severity,
            version: VERSION,
            timestamp: None,
            hostname: None,
            appname: None,
            procid: None,
            msgid: None,
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::new(self.facility, self.severity)
    }
}

/// A RFC5424-protocol syslog message
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyslogMessage {
    pub header: Header,
    /// Empty when the message carries `-`.
    pub structured_data: Vec<StructuredElement>,
    /// Free text after the structured data, byte for byte.
    pub msg: Option<Bytes>,
}

impl SyslogMessage {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        SyslogMessage {
            header: Header::new(facility, severity),
            structured_data: Vec::new(),
            msg: None,
        }
    }

    /// Same as [`SyslogMessage::new`] with facility and severity given by
    /// name, e.g. `local0` and `info`.
    pub fn from_names(facility: &str, severity: &str) -> Result<Self, Error> {
        Ok(SyslogMessage::new(facility.parse()?, severity.parse()?))
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.header.timestamp = Some(timestamp);
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.header.hostname = Some(hostname.into());
        self
    }

    pub fn with_appname(mut self, appname: impl Into<String>) -> Self {
        self.header.appname = Some(appname.into());
        self
    }

    pub fn with_procid(mut self, procid: impl Into<String>) -> Self {
        self.header.procid = Some(procid.into());
        self
    }

    pub fn with_msgid(mut self, msgid: impl Into<String>) -> Self {
        self.header.msgid = Some(msgid.into());
        self
    }

    pub fn with_element(mut self, element: StructuredElement) -> Self {
        self.structured_data.push(element);
        self
    }

    pub fn with_msg(mut self, msg: impl Into<Bytes>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn facility(&self) -> Facility {
        self.header.facility
    }

    pub fn severity(&self) -> Severity {
        self.header.severity
    }

    /// The message body as text, if it is valid utf-8.
    pub fn msg_str(&self) -> Option<&str> {
        self.msg.as_deref().and_then(|m| std::str::from_utf8(m).ok())
    }
}
