use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Shape of the value returned by the encoder.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutputRepresentation {
    /// One contiguous buffer.
    ByteBuffer,
    /// The chunks as they were produced, not concatenated.
    #[default]
    ByteSequence,
    /// One element per byte.
    CharacterList,
}

impl OutputRepresentation {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputRepresentation::ByteBuffer => "byte_buffer",
            OutputRepresentation::ByteSequence => "byte_sequence",
            OutputRepresentation::CharacterList => "character_list",
        }
    }
}

impl fmt::Display for OutputRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputRepresentation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byte_buffer" | "byteBuffer" | "buffer" => Ok(OutputRepresentation::ByteBuffer),
            "byte_sequence" | "byteSequence" | "chunks" => Ok(OutputRepresentation::ByteSequence),
            "character_list" | "characterList" | "chars" => {
                Ok(OutputRepresentation::CharacterList)
            }
            _ => Err(Error::InvalidOption {
                key: CodecOptions::OUTPUT.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options shared by encode and decode. Decoding ignores the output
/// representation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CodecOptions {
    pub output: OutputRepresentation,
}

impl CodecOptions {
    pub const OUTPUT: &'static str = "output";

    pub fn new(output: OutputRepresentation) -> Self {
        CodecOptions { output }
    }

    /// Build options from untyped key/value pairs, e.g. command line flags.
    /// Later pairs override earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = CodecOptions::default();
        for (key, value) in pairs {
            match key.as_ref() {
                Self::OUTPUT => options.output = value.as_ref().parse()?,
                other => {
                    return Err(Error::InvalidOption {
                        key: other.to_string(),
                        value: value.as_ref().to_string(),
                    })
                }
            }
        }
        Ok(options)
    }
}
