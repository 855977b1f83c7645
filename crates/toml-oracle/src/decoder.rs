//! The decoder-under-test contract.
//!
//! The oracle never parses TOML itself. Anything that turns document text
//! into a `toml::Table` (the ecosystem's native TOML tree) can be checked:
//! implement [`Decoder`], or pass a closure.

use thiserror::Error;

/// A decoder's refusal to decode a document.
///
/// Carries the decoder's own message; the oracle only cares that decoding
/// failed, not why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error: {}", .message.trim_end())]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A TOML decoder under test.
///
/// Must fail with a `DecodeError` on malformed input and succeed on
/// well-formed input. `Sync` so independent cases can be run from several
/// threads.
pub trait Decoder: Sync {
    fn decode(&self, text: &str) -> Result<toml::Table, DecodeError>;
}

impl<F> Decoder for F
where
    F: Fn(&str) -> Result<toml::Table, DecodeError> + Sync,
{
    fn decode(&self, text: &str) -> Result<toml::Table, DecodeError> {
        self(text)
    }
}

/// The `toml` crate's own deserializer, as a decoder under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCrateDecoder;

impl Decoder for TomlCrateDecoder {
    fn decode(&self, text: &str) -> Result<toml::Table, DecodeError> {
        toml::from_str::<toml::Table>(text).map_err(|e| DecodeError::new(e.to_string()))
    }
}
