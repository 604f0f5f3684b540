//! Encoder output in the shape asked for by [`OutputRepresentation`].

use bytes::{Bytes, BytesMut};

use crate::options::OutputRepresentation;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Encoded {
    Buffer(Bytes),
    Chunks(Vec<Bytes>),
    CharList(Vec<u8>),
}

impl Encoded {
    /// Render the chunks produced by the encoder, in emission order.
    pub fn from_chunks(chunks: Vec<Bytes>, repr: OutputRepresentation) -> Self {
        Encoded::Chunks(chunks).convert(repr)
    }

    pub fn representation(&self) -> OutputRepresentation {
        match self {
            Encoded::Buffer(_) => OutputRepresentation::ByteBuffer,
            Encoded::Chunks(_) => OutputRepresentation::ByteSequence,
            Encoded::CharList(_) => OutputRepresentation::CharacterList,
        }
    }

    /// Change shape. Converting into the current shape returns `self` as is.
    pub fn convert(self, repr: OutputRepresentation) -> Self {
        if self.representation() == repr {
            return self;
        }
        match repr {
            OutputRepresentation::ByteBuffer => Encoded::Buffer(self.into_bytes()),
            OutputRepresentation::ByteSequence => match self {
                Encoded::Buffer(buf) => Encoded::Chunks(vec![buf]),
                Encoded::CharList(chars) => Encoded::Chunks(vec![Bytes::from(chars)]),
                chunks @ Encoded::Chunks(_) => chunks,
            },
            OutputRepresentation::CharacterList => Encoded::CharList(self.into_vec()),
        }
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Encoded::Buffer(buf) => buf.len(),
            Encoded::Chunks(chunks) => chunks.iter().map(Bytes::len).sum(),
            Encoded::CharList(chars) => chars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate into one contiguous buffer.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Encoded::Buffer(buf) => buf,
            Encoded::Chunks(mut chunks) if chunks.len() == 1 => chunks.swap_remove(0),
            Encoded::Chunks(chunks) => {
                let mut buf = BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
                for chunk in &chunks {
                    buf.extend_from_slice(chunk);
                }
                buf.freeze()
            }
            Encoded::CharList(chars) => Bytes::from(chars),
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        match self {
            Encoded::CharList(chars) => chars,
            other => other.into_bytes().to_vec(),
        }
    }
}

impl From<Encoded> for Bytes {
    fn from(encoded: Encoded) -> Self {
        encoded.into_bytes()
    }
}

impl From<Encoded> for Vec<u8> {
    fn from(encoded: Encoded) -> Self {
        encoded.into_vec()
    }
}
