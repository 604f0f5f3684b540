use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Invalid, Malformed};

/// Syslog facilities. Taken From RFC 5424, names are from Linux.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[allow(non_camel_case_types)]
pub enum Facility {
    KERN = 0,
    USER = 1,
    MAIL = 2,
    DAEMON = 3,
    AUTH = 4,
    SYSLOG = 5,
    LPR = 6,
    NEWS = 7,
    UUCP = 8,
    CRON = 9,
    AUTHPRIV = 10,
    FTP = 11,
    NTP = 12,
    AUDIT = 13,
    ALERT = 14,
    CLOCKD = 15,
    LOCAL0 = 16,
    LOCAL1 = 17,
    LOCAL2 = 18,
    LOCAL3 = 19,
    LOCAL4 = 20,
    LOCAL5 = 21,
    LOCAL6 = 22,
    LOCAL7 = 23,
}

/// Indexed by the facility number, i.e. the wire code divided by 8.
const FACILITIES: [(Facility, &str); 24] = [
    (Facility::KERN, "kern"),
    (Facility::USER, "user"),
    (Facility::MAIL, "mail"),
    (Facility::DAEMON, "daemon"),
    (Facility::AUTH, "auth"),
    (Facility::SYSLOG, "syslog"),
    (Facility::LPR, "lpr"),
    (Facility::NEWS, "news"),
    (Facility::UUCP, "uucp"),
    (Facility::CRON, "cron"),
    (Facility::AUTHPRIV, "authpriv"),
    (Facility::FTP, "ftp"),
    (Facility::NTP, "ntp"),
    (Facility::AUDIT, "audit"),
    (Facility::ALERT, "alert"),
    (Facility::CLOCKD, "clockd"),
    (Facility::LOCAL0, "local0"),
    (Facility::LOCAL1, "local1"),
    (Facility::LOCAL2, "local2"),
    (Facility::LOCAL3, "local3"),
    (Facility::LOCAL4, "local4"),
    (Facility::LOCAL5, "local5"),
    (Facility::LOCAL6, "local6"),
    (Facility::LOCAL7, "local7"),
];

// every slot must hold the facility with that number
const _: () = {
    let mut i = 0;
    while i < FACILITIES.len() {
        assert!(FACILITIES[i].0 as usize == i);
        i += 1;
    }
};

impl Facility {
    /// Look a facility up by its number (0..=23), as found in the upper
    /// five bits of a priority value.
    /// Facility stored at `index` of the table. `index` must be below 24.
    pub(crate) const fn from_index(index: u8) -> Self {
        FACILITIES[index as usize].0
    }

    /// Look a facility up by its wire code, one of 0, 8, ..., 184.
    pub fn from_code(code: u8) -> Option<Self> {
        if code % 8 != 0 {
            return None;
        }
        FACILITIES.get((code / 8) as usize).map(|(facility, _)| *facility)
    }

    /// The wire code of this facility: its number multiplied by 8.
    pub fn code(self) -> u8 {
        (self as u8) << 3
    }

    /// Convert a syslog facility into a unique string representation
    pub fn as_str(self) -> &'static str {
        FACILITIES[self as usize].1
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FACILITIES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(facility, _)| *facility)
            .ok_or_else(|| Error::invalid("facility", Invalid::UnknownName(s.to_string())))
    }
}

/// Map a facility name to its wire code, e.g. `local0` to 128.
pub fn facility_code(name: &str) -> Result<u8, Error> {
    name.parse::<Facility>().map(Facility::code)
}

/// Map a wire code back to its facility. The code is looked up on its own,
/// so a failure reports offset 0, the start of that code.
pub fn code_to_facility(code: u8) -> Result<Facility, Error> {
    Facility::from_code(code).ok_or(Error::MalformedMessage {
        offset: 0,
        kind: Malformed::OutOfRange("facility"),
    })
}
