//! Text/Morse conversion
//!
//! [`Codec`] encodes text into symbol sequences for transmission;
//! [`TokenDecoder`] accumulates dot/dash elements and boundary events back
//! into uppercase text. Unknown symbols decode to the `'?'` sentinel so a
//! garbled group never silently disappears from the transcript.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::alphabet::{Alphabet, Element, MorseSymbol};
use crate::errors::{EngineError, Result};
use crate::types::MorseToken;

/// Placeholder emitted for symbols absent from the alphabet
pub const UNKNOWN_SYMBOL_SENTINEL: char = '?';

// ----------------------------------------------------------------------------
// Encoding
// ----------------------------------------------------------------------------

/// How encoding handles characters with no Morse mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodePolicy {
    /// Drop the character and log a warning
    #[default]
    Skip,
    /// Reject the whole message
    Fail,
}

/// An encoded word boundary or symbol, in transmission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedUnit {
    Symbol(MorseSymbol),
    WordBreak,
}

/// Text-to-Morse encoder over a shared alphabet
#[derive(Debug, Clone)]
pub struct Codec {
    alphabet: Arc<Alphabet>,
    policy: EncodePolicy,
}

impl Codec {
    pub fn new(alphabet: Arc<Alphabet>, policy: EncodePolicy) -> Self {
        Self { alphabet, policy }
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Encode a line of text into symbols and word breaks
    ///
    /// Whitespace runs collapse into single word breaks; leading and
    /// trailing whitespace encodes nothing.
    pub fn encode(&self, text: &str) -> Result<Vec<EncodedUnit>> {
        let mut units = Vec::new();
        let mut first_word = true;
        for word in text.split_whitespace() {
            let mut symbols = Vec::new();
            for character in word.chars() {
                match self.alphabet.symbol_for(character) {
                    Some(symbol) => symbols.push(EncodedUnit::Symbol(symbol.clone())),
                    None => match self.policy {
                        EncodePolicy::Skip => {
                            warn!(%character, "skipping character with no pattern");
                        }
                        EncodePolicy::Fail => {
                            return Err(EngineError::UnsupportedCharacter { character });
                        }
                    },
                }
            }
            if symbols.is_empty() {
                continue;
            }
            if !first_word {
                units.push(EncodedUnit::WordBreak);
            }
            first_word = false;
            units.extend(symbols);
        }
        Ok(units)
    }
}

// ----------------------------------------------------------------------------
// Decoding
// ----------------------------------------------------------------------------

/// Incremental Morse-to-text decoder
///
/// Elements accumulate into a pending symbol; boundary calls resolve the
/// symbol against the alphabet and append to the pending word. Completed
/// words are returned uppercase from [`close_word`](Self::close_word) and
/// [`flush`](Self::flush).
#[derive(Debug, Clone)]
pub struct TokenDecoder {
    alphabet: Arc<Alphabet>,
    pending_symbol: MorseSymbol,
    pending_word: String,
}

impl TokenDecoder {
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self {
            alphabet,
            pending_symbol: MorseSymbol::new(),
            pending_word: String::new(),
        }
    }

    /// Append a dot or dash to the pending symbol
    pub fn push_element(&mut self, element: Element) {
        self.pending_symbol.push(element);
    }

    /// Resolve the pending symbol into a character, if any elements are held
    pub fn close_symbol(&mut self) {
        if self.pending_symbol.is_empty() {
            return;
        }
        let character = match self.alphabet.char_for(&self.pending_symbol) {
            Some(character) => character,
            None => {
                warn!(symbol = %self.pending_symbol, "unrecognized symbol, substituting sentinel");
                UNKNOWN_SYMBOL_SENTINEL
            }
        };
        self.pending_word.push(character);
        self.pending_symbol.clear();
    }

    /// Close the pending symbol and finish the current word
    pub fn close_word(&mut self) -> Option<String> {
        self.close_symbol();
        if self.pending_word.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending_word))
    }

    /// Drain all pending state; idempotent when nothing is held
    pub fn flush(&mut self) -> Option<String> {
        self.close_word()
    }

    /// True while any element or character is waiting on a boundary
    pub fn is_pending(&self) -> bool {
        !self.pending_symbol.is_empty() || !self.pending_word.is_empty()
    }

    /// Apply one classified timing token
    pub fn apply(&mut self, token: MorseToken) -> Option<String> {
        match token {
            MorseToken::Dot => {
                self.push_element(Element::Dot);
                None
            }
            MorseToken::Dash => {
                self.push_element(Element::Dash);
                None
            }
            MorseToken::SymbolGap => None,
            MorseToken::CharGap => {
                self.close_symbol();
                None
            }
            MorseToken::WordGap => self.close_word(),
        }
    }
}

/// Decode a complete token sequence, flushing any trailing partial word
pub fn decode(tokens: &[MorseToken], alphabet: Arc<Alphabet>) -> String {
    let mut decoder = TokenDecoder::new(alphabet);
    let mut words = Vec::new();
    for token in tokens {
        if let Some(word) = decoder.apply(*token) {
            words.push(word);
        }
    }
    if let Some(word) = decoder.flush() {
        words.push(word);
    }
    words.join(" ")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
