use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Invalid, Malformed};

/// Syslog Severities from RFC 5424.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[allow(non_camel_case_types)]
pub enum Severity {
    EMERG = 0,
    ALERT = 1,
    CRIT = 2,
    ERR = 3,
    WARNING = 4,
    NOTICE = 5,
    INFO = 6,
    DEBUG = 7,
}

const SEVERITIES: [(Severity, &str); 8] = [
    (Severity::EMERG, "emerg"),
    (Severity::ALERT, "alert"),
    (Severity::CRIT, "crit"),
    (Severity::ERR, "err"),
    (Severity::WARNING, "warning"),
    (Severity::NOTICE, "notice"),
    (Severity::INFO, "info"),
    (Severity::DEBUG, "debug"),
];

const _: () = {
    let mut i = 0;
    while i < SEVERITIES.len() {
        assert!(SEVERITIES[i].0 as usize == i);
        i += 1;
    }
};

impl Severity {
    /// Convert a code (as used in the wire serialization) into a `Severity`
    /// Severity stored at `index` of the table. `index` must be below 8.
    pub(crate) const fn from_index(index: u8) -> Self {
        SEVERITIES[index as usize].0
    }

    pub fn from_code(code: u8) -> Option<Self> {
        SEVERITIES.get(code as usize).map(|(severity, _)| *severity)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a syslog severity into a unique string representation
    pub fn as_str(self) -> &'static str {
        SEVERITIES[self as usize].1
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_severity(value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SEVERITIES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(severity, _)| *severity)
            .ok_or_else(|| Error::invalid("severity", Invalid::UnknownName(s.to_string())))
    }
}

pub fn severity_code(name: &str) -> Result<u8, Error> {
    name.parse::<Severity>().map(Severity::code)
}

/// Map a wire code back to its severity. Like [`crate::code_to_facility`],
/// a failure is reported at offset 0 of the standalone code.
pub fn code_to_severity(code: u8) -> Result<Severity, Error> {
    Severity::from_code(code).ok_or(Error::MalformedMessage {
        offset: 0,
        kind: Malformed::OutOfRange("severity"),
    })
}
