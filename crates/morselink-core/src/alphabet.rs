//! The Morse alphabet: a validated, bidirectional symbol/character table
//!
//! The table is fixed at load time and checked for uniqueness in both
//! directions, so decode is prefix-unambiguous within gap-delimited groups
//! and `decode(encode(c)) == c` holds for every entry. Configuration may
//! extend or replace entries before validation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::AlphabetError;

// ----------------------------------------------------------------------------
// Elements and Symbols
// ----------------------------------------------------------------------------

/// The two primitive Morse signal lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Dot,
    Dash,
}

impl Element {
    pub fn glyph(&self) -> char {
        match self {
            Element::Dot => '.',
            Element::Dash => '-',
        }
    }
}

/// An ordered dot/dash run mapping to exactly one character (1–6 elements)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MorseSymbol(SmallVec<[Element; 6]>);

impl MorseSymbol {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Parse a pattern string of `.` and `-` glyphs
    pub fn parse(pattern: &str) -> Option<Self> {
        let mut elements = SmallVec::new();
        for glyph in pattern.chars() {
            match glyph {
                '.' => elements.push(Element::Dot),
                '-' => elements.push(Element::Dash),
                _ => return None,
            }
        }
        Some(Self(elements))
    }

    pub fn push(&mut self, element: Element) {
        self.0.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<Element> for MorseSymbol {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            write!(f, "{}", element.glyph())?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Canonical Table
// ----------------------------------------------------------------------------

/// The canonical ITU table (letters, digits, common punctuation)
///
/// All patterns stay within the 6-element symbol bound.
const CANONICAL_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('@', ".--.-."),
];

/// A single table override supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetOverride {
    pub character: char,
    pub pattern: String,
}

// ----------------------------------------------------------------------------
// Alphabet
// ----------------------------------------------------------------------------

/// Validated bidirectional character/symbol mapping
///
/// Lookup is case-insensitive on the character side; decoded text is always
/// uppercase, matching the original keyed alphabet.
#[derive(Debug)]
pub struct Alphabet {
    by_char: HashMap<char, MorseSymbol>,
    by_symbol: HashMap<MorseSymbol, char>,
}

impl Alphabet {
    /// The canonical table with no overrides
    pub fn canonical() -> Arc<Self> {
        // The canonical table is statically known-good; validation cannot fail.
        Arc::new(
            Self::from_entries(
                CANONICAL_TABLE
                    .iter()
                    .map(|(c, p)| (*c, (*p).to_string())),
            )
            .expect("canonical alphabet table is valid"),
        )
    }

    /// The canonical table with configuration overrides applied on top
    pub fn with_overrides(overrides: &[AlphabetOverride]) -> Result<Arc<Self>, AlphabetError> {
        let mut entries: Vec<(char, String)> = CANONICAL_TABLE
            .iter()
            .map(|(c, p)| (*c, (*p).to_string()))
            .collect();
        for over in overrides {
            let character = over.character.to_ascii_uppercase();
            entries.retain(|(c, _)| *c != character);
            entries.push((character, over.pattern.clone()));
        }
        Self::from_entries(entries).map(Arc::new)
    }

    fn from_entries(
        entries: impl IntoIterator<Item = (char, String)>,
    ) -> Result<Self, AlphabetError> {
        let mut by_char = HashMap::new();
        let mut by_symbol: HashMap<MorseSymbol, char> = HashMap::new();

        for (character, pattern) in entries {
            let character = character.to_ascii_uppercase();
            if pattern.is_empty() {
                return Err(AlphabetError::EmptyPattern { character });
            }
            if pattern.chars().count() > 6 {
                return Err(AlphabetError::PatternTooLong {
                    character,
                    len: pattern.chars().count(),
                });
            }
            let symbol = MorseSymbol::parse(&pattern).ok_or_else(|| {
                let glyph = pattern
                    .chars()
                    .find(|g| *g != '.' && *g != '-')
                    .unwrap_or('?');
                AlphabetError::InvalidPatternGlyph { character, glyph }
            })?;

            if by_char.contains_key(&character) {
                return Err(AlphabetError::DuplicateCharacter { character });
            }
            if let Some(first) = by_symbol.get(&symbol) {
                return Err(AlphabetError::DuplicatePattern {
                    pattern,
                    first: *first,
                    second: character,
                });
            }

            by_symbol.insert(symbol.clone(), character);
            by_char.insert(character, symbol);
        }

        Ok(Self { by_char, by_symbol })
    }

    /// Symbol for a character, case-insensitive
    pub fn symbol_for(&self, character: char) -> Option<&MorseSymbol> {
        self.by_char.get(&character.to_ascii_uppercase())
    }

    /// Character for a decoded dot/dash run
    pub fn char_for(&self, symbol: &MorseSymbol) -> Option<char> {
        self.by_symbol.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.by_char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_char.is_empty()
    }

    /// All table entries, for display and exhaustive tests
    pub fn entries(&self) -> impl Iterator<Item = (char, &MorseSymbol)> {
        self.by_char.iter().map(|(c, s)| (*c, s))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_table_loads() {
        let alphabet = Alphabet::canonical();
        assert_eq!(alphabet.len(), CANONICAL_TABLE.len());
    }

    #[test]
    fn test_bidirectional_agreement() {
        let alphabet = Alphabet::canonical();
        for (character, symbol) in alphabet.entries() {
            assert_eq!(alphabet.char_for(symbol), Some(character));
        }
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let alphabet = Alphabet::canonical();
        assert_eq!(alphabet.symbol_for('a'), alphabet.symbol_for('A'));
        assert!(alphabet.symbol_for('a').is_some());
    }

    #[test]
    fn test_symbol_parse_and_display() {
        let symbol = MorseSymbol::parse(".-").unwrap();
        assert_eq!(symbol.elements(), &[Element::Dot, Element::Dash]);
        assert_eq!(symbol.to_string(), ".-");
        assert!(MorseSymbol::parse(".x").is_none());
    }

    #[test]
    fn test_duplicate_pattern_rejected() {
        let overrides = [AlphabetOverride {
            character: '#',
            pattern: ".-".to_string(), // collides with A
        }];
        assert!(matches!(
            Alphabet::with_overrides(&overrides),
            Err(AlphabetError::DuplicatePattern { first: 'A', .. })
        ));
    }

    #[test]
    fn test_override_replaces_entry() {
        // Remap '!' to a free pattern
        let overrides = [AlphabetOverride {
            character: '!',
            pattern: "---.".to_string(),
        }];
        let alphabet = Alphabet::with_overrides(&overrides).unwrap();
        assert_eq!(
            alphabet.symbol_for('!').unwrap(),
            &MorseSymbol::parse("---.").unwrap()
        );
        // The old '!' pattern no longer decodes
        assert_eq!(
            alphabet.char_for(&MorseSymbol::parse("-.-.--").unwrap()),
            None
        );
    }

    #[test]
    fn test_invalid_override_patterns_rejected() {
        let bad_glyph = [AlphabetOverride {
            character: '#',
            pattern: ".*".to_string(),
        }];
        assert!(matches!(
            Alphabet::with_overrides(&bad_glyph),
            Err(AlphabetError::InvalidPatternGlyph { glyph: '*', .. })
        ));

        let too_long = [AlphabetOverride {
            character: '#',
            pattern: ".......".to_string(),
        }];
        assert!(matches!(
            Alphabet::with_overrides(&too_long),
            Err(AlphabetError::PatternTooLong { len: 7, .. })
        ));

        let empty = [AlphabetOverride {
            character: '#',
            pattern: String::new(),
        }];
        assert!(matches!(
            Alphabet::with_overrides(&empty),
            Err(AlphabetError::EmptyPattern { .. })
        ));
    }
}
