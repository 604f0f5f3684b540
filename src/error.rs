use thiserror::Error;

/// Reason a buffer was rejected by the decoder.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Malformed {
    #[error("unexpected eof")]
    UnexpectedEndOfInput,
    #[error("expected {0:?}")]
    ExpectedChar(char),
    #[error("too few digits in numeric field")]
    TooFewDigits,
    #[error("too many digits in numeric field")]
    TooManyDigits,
    #[error("leading zero in numeric field")]
    LeadingZero,
    #[error("priority {0} is out of range")]
    BadPriority(u32),
    #[error("bad version")]
    BadVersion,
    #[error("{0} out of range")]
    OutOfRange(&'static str),
    #[error("invalid calendar date")]
    InvalidDate,
    #[error("invalid UTC offset")]
    InvalidUtcOffset,
    #[error("unexpected trailing data")]
    TrailingData,
    #[error("empty field")]
    EmptyField,
    #[error("field longer than {0} bytes")]
    FieldTooLong(usize),
    #[error("non printable byte {0:#04x}")]
    NonPrintable(u8),
    #[error("invalid utf-8 in structured data value")]
    InvalidUtf8,
    #[error("unterminated structured data value")]
    UnterminatedValue,
    #[error("empty structured data id")]
    EmptySdId,
}

/// Reason a value was rejected by the encoder.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Invalid {
    #[error("unknown name {0:?}")]
    UnknownName(String),
    #[error("must not be empty")]
    Empty,
    #[error("\"-\" is reserved for absent values")]
    Nil,
    #[error("longer than {0} bytes")]
    TooLong(usize),
    #[error("contains {0:?}")]
    NonPrintable(char),
    #[error("out of range")]
    OutOfRange,
    #[error("expected decimal digits")]
    NotDigits,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("malformed message at offset {offset}: {kind}")]
    MalformedMessage { offset: usize, kind: Malformed },
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: Invalid },
    #[error("invalid option {key}={value}")]
    InvalidOption { key: String, value: String },
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: Invalid) -> Self {
        Error::InvalidValue { field, reason }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedMessage { .. })
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Error::InvalidValue { .. })
    }

    pub fn is_invalid_option(&self) -> bool {
        matches!(self, Error::InvalidOption { .. })
    }
}
