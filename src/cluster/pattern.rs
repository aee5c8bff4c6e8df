//! Sequence pattern compiler
//!
//! A pattern describes a family of multi-codepoint sequences as a list of
//! parts. Each part is a set of alternative codepoints and may be optional.
//! Every concrete instantiation of a pattern gets one synthetic id, laid out
//! contiguously from the pattern's start using a mixed-radix number: part `i`
//! contributes a digit below its radix, the number of alternatives plus one
//! when the part is optional. Digit 0 of an optional part means "absent", so
//! alternatives are 1-based there and 0-based in required parts. The first
//! part is the most significant digit.
//!
//! Pattern text is whitespace separated. A part is one or more 4-character
//! base-36 codepoints joined by `/`, or one of the shorthand symbols below,
//! followed by `?` when optional.
//!
//! | symbol | codepoints                 |
//! |--------|----------------------------|
//! | `+`    | zero-width joiner          |
//! | `!`    | emoji presentation selector |
//! | `>`    | rightwards arrow           |
//! | `%`    | female/male signs          |
//! | `~`    | boy, girl, child           |
//! | `&`    | man, woman, adult          |
//! | `@`    | older man, woman, adult    |
//! | `*`    | skin tone modifiers        |
//! | `$`    | regional indicators        |

use std::collections::HashMap;

use crate::table::codec::parse_base36;
use crate::table::CODEPOINT_COUNT;

/// Error compiling pattern text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern {pattern}: unknown shorthand '{symbol}'")]
    UnknownShorthand { pattern: usize, symbol: char },

    #[error("pattern {pattern}: invalid codepoint '{text}'")]
    BadCodepoint { pattern: usize, text: String },

    #[error("pattern {pattern}: '?' does not follow a part")]
    StrayOptional { pattern: usize },

    #[error("pattern {pattern}: every part is optional")]
    AllOptional { pattern: usize },

    #[error("pattern {pattern}: synthetic id range overflows")]
    Overflow { pattern: usize },
}

fn shorthand(symbol: char) -> Option<Vec<u32>> {
    let codepoints = match symbol {
        '+' => vec![0x200D],
        '!' => vec![0xFE0F],
        '>' => vec![0x27A1],
        '%' => vec![0x2640, 0x2642],
        '~' => vec![0x1F466, 0x1F467, 0x1F9D2],
        '&' => vec![0x1F468, 0x1F469, 0x1F9D1],
        '@' => vec![0x1F474, 0x1F475, 0x1F9D3],
        '*' => (0x1F3FB..=0x1F3FF).collect(),
        '$' => (0x1F1E6..=0x1F1FF).collect(),
        _ => return None,
    };
    Some(codepoints)
}

/// One position in a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    alternatives: Vec<u32>,
    optional: bool,
}

impl Part {
    pub fn new(alternatives: Vec<u32>, optional: bool) -> Self {
        Self {
            alternatives,
            optional,
        }
    }

    pub fn alternatives(&self) -> &[u32] {
        &self.alternatives
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Number of digit values this part can take
    pub fn radix(&self) -> u32 {
        self.alternatives.len() as u32 + u32::from(self.optional)
    }

    /// Digit recording `codepoint` in this part, if it is an alternative
    pub fn digit(&self, codepoint: u32) -> Option<u32> {
        let index = self.alternatives.iter().position(|&c| c == codepoint)?;
        Some(index as u32 + u32::from(self.optional))
    }
}

/// A compiled pattern and its synthetic id range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    parts: Vec<Part>,
    start: u32,
    size: u32,
}

impl Pattern {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// First synthetic id
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Number of synthetic ids
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether a match that has consumed `next_part` parts may end here
    pub fn terminable(&self, next_part: usize) -> bool {
        self.parts[next_part.min(self.parts.len())..]
            .iter()
            .all(Part::is_optional)
    }

    /// Synthetic id for a partial accumulator, treating the remaining parts
    /// as absent
    pub fn finish(&self, acc: u32, next_part: usize) -> u32 {
        let scale: u32 = self.parts[next_part.min(self.parts.len())..]
            .iter()
            .map(Part::radix)
            .product();
        self.start + acc * scale
    }

    /// Synthetic id for one digit per part
    pub fn encode(&self, digits: &[usize]) -> Option<u32> {
        if digits.len() != self.parts.len() {
            return None;
        }
        let mut acc = 0u32;
        for (part, &digit) in self.parts.iter().zip(digits) {
            let digit = u32::try_from(digit).ok().filter(|&d| d < part.radix())?;
            acc = acc * part.radix() + digit;
        }
        Some(self.finish(acc, self.parts.len()))
    }

    /// Digits for a synthetic id inside this pattern's range
    pub fn decode(&self, id: u32) -> Option<Vec<usize>> {
        let mut offset = id.checked_sub(self.start).filter(|&o| o < self.size)?;
        let mut digits = vec![0usize; self.parts.len()];
        for (slot, part) in digits.iter_mut().zip(&self.parts).rev() {
            *slot = (offset % part.radix()) as usize;
            offset /= part.radix();
        }
        Some(digits)
    }

    /// Every concrete instantiation as (synthetic id, codepoints)
    pub fn expand(&self) -> Vec<(u32, Vec<u32>)> {
        (0..self.size)
            .map(|offset| {
                let id = self.start + offset;
                let codepoints = self
                    .decode(id)
                    .unwrap_or_default()
                    .into_iter()
                    .zip(&self.parts)
                    .filter_map(|(digit, part)| {
                        let index = if part.optional {
                            digit.checked_sub(1)?
                        } else {
                            digit
                        };
                        part.alternatives.get(index).copied()
                    })
                    .collect();
                (id, codepoints)
            })
            .collect()
    }
}

/// The compiled pattern list plus a reverse index from codepoint to the
/// patterns that mention it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    index: HashMap<u32, Vec<usize>>,
    end: u32,
}

impl PatternSet {
    /// Compile pattern text, assigning id ranges in declaration order
    pub fn compile(text: &str) -> Result<Self, PatternError> {
        let mut patterns = Vec::new();
        let mut index: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut next = CODEPOINT_COUNT;

        for (pattern, source) in text.split_whitespace().enumerate() {
            let parts = parse_parts(pattern, source)?;
            if parts.iter().all(Part::is_optional) {
                return Err(PatternError::AllOptional { pattern });
            }
            let size = parts
                .iter()
                .try_fold(1u32, |size, part| size.checked_mul(part.radix()))
                .ok_or(PatternError::Overflow { pattern })?;
            let start = next;
            next = next.checked_add(size).ok_or(PatternError::Overflow { pattern })?;

            for &codepoint in parts.iter().flat_map(|p| p.alternatives.iter()) {
                let entry = index.entry(codepoint).or_default();
                if entry.last() != Some(&pattern) {
                    entry.push(pattern);
                }
            }
            patterns.push(Pattern { parts, start, size });
        }

        tracing::debug!(patterns = patterns.len(), end = next, "compiled sequence patterns");
        Ok(Self {
            patterns,
            index,
            end: next,
        })
    }

    /// The bundled sequence patterns
    pub fn builtin() -> Result<Self, PatternError> {
        Self::compile(crate::profile::data::payload(crate::profile::data::SEQUENCES))
    }

    /// Patterns mentioning `codepoint`, in ascending order
    pub fn candidates(&self, codepoint: u32) -> &[usize] {
        self.index.get(&codepoint).map_or(&[], Vec::as_slice)
    }

    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// One past the last synthetic id
    pub fn synthetic_end(&self) -> u32 {
        self.end
    }

    pub fn encode(&self, pattern: usize, digits: &[usize]) -> Option<u32> {
        self.pattern(pattern)?.encode(digits)
    }

    pub fn decode(&self, pattern: usize, id: u32) -> Option<Vec<usize>> {
        self.pattern(pattern)?.decode(id)
    }
}

fn parse_parts(pattern: usize, source: &str) -> Result<Vec<Part>, PatternError> {
    let bytes = source.as_bytes();
    let mut parts = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let alternatives = if bytes[i].is_ascii_alphanumeric() {
            let mut alternatives = Vec::new();
            loop {
                let text: String = source[i..].chars().take(4).collect();
                let parsed = Some(text.as_bytes())
                    .filter(|t| t.len() == 4)
                    .and_then(parse_base36)
                    .filter(|&c| c < CODEPOINT_COUNT);
                match parsed {
                    Some(codepoint) => alternatives.push(codepoint),
                    None => return Err(PatternError::BadCodepoint { pattern, text }),
                }
                i += 4;
                if bytes.get(i) == Some(&b'/') {
                    i += 1;
                } else {
                    break;
                }
            }
            alternatives
        } else if bytes[i] == b'?' {
            return Err(PatternError::StrayOptional { pattern });
        } else {
            let symbol = source[i..].chars().next().unwrap_or_default();
            i += symbol.len_utf8();
            shorthand(symbol).ok_or(PatternError::UnknownShorthand { pattern, symbol })?
        };

        let optional = bytes.get(i) == Some(&b'?');
        if optional {
            i += 1;
        }
        parts.push(Part::new(alternatives, optional));
    }

    Ok(parts)
}
