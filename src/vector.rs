//! Positional postings for a single document.
//!
//! A [`TsVector`] is the parsed form of a document: every distinct lexeme with
//! the positions (and per-position weight classes) at which it occurs. Entries
//! are kept sorted so operand lookup is a binary search, and prefix operands
//! resolve to one contiguous run of entries.

use std::cmp::Ordering;

/// Upper bound (exclusive) for token positions. Positions occupy 14 bits;
/// values at or above this limit are clamped to `MAX_POS - 1` on construction.
pub const MAX_POS: u16 = 1 << 14;

/// Per-position weight class, lowest to highest.
///
/// The ordinal indexes a [`crate::Weights`] table: `D = 0` up to `A = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightClass {
    /// Lowest weight (default 0.1).
    D = 0,
    /// Default 0.2.
    C = 1,
    /// Default 0.4.
    B = 2,
    /// Highest weight (default 1.0).
    A = 3,
}

/// One occurrence of a lexeme: a token position plus its weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pos: u16,
    weight: WeightClass,
}

impl Position {
    /// Create a position, clamping `pos` into `[0, MAX_POS)`.
    pub const fn new(pos: u16, weight: WeightClass) -> Self {
        let pos = if pos >= MAX_POS { MAX_POS - 1 } else { pos };
        Self { pos, weight }
    }

    /// Token position within the document.
    pub fn pos(&self) -> u16 {
        self.pos
    }

    /// Weight class attached to this occurrence.
    pub fn weight(&self) -> WeightClass {
        self.weight
    }
}

/// A lexeme and the positions at which it occurs.
///
/// An empty position list is legal (position information stripped at indexing
/// time); the rankers substitute a sentinel occurrence for such entries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordEntry {
    lexeme: String,
    #[cfg_attr(feature = "serde", serde(default))]
    positions: Vec<Position>,
}

impl WordEntry {
    /// Create an entry for `lexeme` occurring at `positions`.
    pub fn new(lexeme: impl Into<String>, positions: Vec<Position>) -> Self {
        Self {
            lexeme: lexeme.into(),
            positions,
        }
    }

    /// The normalized word form.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Occurrences, sorted ascending by position.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Whether position information survived indexing.
    pub fn has_positions(&self) -> bool {
        !self.positions.is_empty()
    }
}

/// Compare a query operand against a stored lexeme.
///
/// Unsigned byte compare over the common prefix, then shorter-first on ties.
/// With `prefix` set, a stored lexeme that merely continues the operand counts
/// as equal, so all prefix matches form one contiguous run in sorted order.
pub(crate) fn compare_lexemes(operand: &[u8], lexeme: &[u8], prefix: bool) -> Ordering {
    let n = operand.len().min(lexeme.len());
    match operand[..n].cmp(&lexeme[..n]) {
        Ordering::Equal if prefix => {
            if operand.len() > lexeme.len() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        Ordering::Equal => operand.len().cmp(&lexeme.len()),
        unequal => unequal,
    }
}

/// Sorted postings structure for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<WordEntry>", into = "Vec<WordEntry>")
)]
pub struct TsVector {
    entries: Vec<WordEntry>,
}

impl TsVector {
    /// Build a vector from entries in any order.
    ///
    /// Entries are sorted by the lexeme comparator, duplicate lexemes are
    /// merged (their position lists concatenated), and each position list is
    /// sorted ascending with out-of-range positions clamped. Duplicate
    /// positions are kept as given.
    pub fn new(entries: impl IntoIterator<Item = WordEntry>) -> Self {
        let mut entries: Vec<WordEntry> = entries.into_iter().collect();
        entries
            .sort_by(|a, b| compare_lexemes(a.lexeme.as_bytes(), b.lexeme.as_bytes(), false));

        let mut merged: Vec<WordEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match merged.last_mut() {
                Some(prev) if prev.lexeme == entry.lexeme => {
                    prev.positions.extend(entry.positions);
                }
                _ => merged.push(entry),
            }
        }

        for entry in &mut merged {
            for p in &mut entry.positions {
                *p = Position::new(p.pos, p.weight);
            }
            entry.positions.sort_by_key(|p| p.pos);
        }

        Self { entries: merged }
    }

    /// Number of distinct lexemes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document matched no lexemes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order.
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// Total occurrence count, counting position-less entries as one.
    pub fn doc_length(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.positions.len().max(1))
            .sum()
    }

    /// Locate the entries matching `operand`.
    ///
    /// Lower-bound binary search; exact operands yield at most one entry,
    /// prefix operands yield the contiguous run of entries continuing the
    /// operand bytes.
    pub fn find(&self, operand: &[u8], prefix: bool) -> &[WordEntry] {
        let lo = self
            .entries
            .partition_point(|e| compare_lexemes(operand, e.lexeme.as_bytes(), false) == Ordering::Greater);

        if !prefix {
            let exact = lo < self.entries.len()
                && compare_lexemes(operand, self.entries[lo].lexeme.as_bytes(), false)
                    == Ordering::Equal;
            return if exact {
                &self.entries[lo..lo + 1]
            } else {
                &self.entries[..0]
            };
        }

        let mut hi = lo;
        while hi < self.entries.len()
            && compare_lexemes(operand, self.entries[hi].lexeme.as_bytes(), true)
                == Ordering::Equal
        {
            hi += 1;
        }
        &self.entries[lo..hi]
    }
}

impl From<Vec<WordEntry>> for TsVector {
    fn from(entries: Vec<WordEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<TsVector> for Vec<WordEntry> {
    fn from(vector: TsVector) -> Self {
        vector.entries
    }
}
