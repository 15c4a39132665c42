//! Cover-density rank: proximity scoring via minimal satisfying spans.
//!
//! The document is flattened into a position-sorted token list annotated with
//! the query operands each token satisfies. A scan then peels off successive
//! **covers** — shortest spans whose token set makes the query true — and each
//! cover contributes by its weight density and noise content.
//!
//! Reference: Clarke, Cormack & Tudhope (2000). "Relevance Ranking for One to
//! Three Term Queries."

use crate::normalize::{self, ExtDist};
use crate::query::{evaluate, QueryItem, TsQuery};
use crate::rank::RankParams;
use crate::vector::{compare_lexemes, TsVector, WeightClass};
use std::cmp::Ordering;

/// One document token: a position, its weight class, and the set of query
/// operands it satisfies (an index into the shared set table, since every
/// position of one entry satisfies the same operands).
#[derive(Debug, Clone, Copy)]
struct DocToken {
    pos: u16,
    weight: WeightClass,
    set: usize,
}

/// Flattened, position-sorted document representation for the cover scan.
#[derive(Debug)]
struct DocRepresentation {
    tokens: Vec<DocToken>,
    /// Operand sets, each a list of postfix item indices.
    sets: Vec<Vec<usize>>,
}

impl DocRepresentation {
    /// Flatten the document against the query, or `None` when no operand
    /// matches. Each matched entry emits one token per position (or a single
    /// token at position 0 when the entry carries no positions), annotated
    /// with every query operand whose bytes equal the matching operand.
    fn build(vector: &TsVector, query: &TsQuery) -> Option<Self> {
        let items = query.items();
        let mut annotated = vec![false; items.len()];
        let mut tokens: Vec<DocToken> = Vec::with_capacity(items.len() * 4);
        let mut sets: Vec<Vec<usize>> = Vec::new();

        for (i, item) in items.iter().enumerate() {
            let QueryItem::Operand(cur) = item else {
                continue;
            };
            if annotated[i] {
                continue;
            }

            for entry in vector.find(cur.lexeme().as_bytes(), cur.is_prefix()) {
                let set: Vec<usize> = items
                    .iter()
                    .enumerate()
                    .filter(|&(k, other)| {
                        k == i
                            || matches!(other, QueryItem::Operand(op)
                                if compare_lexemes(
                                    op.lexeme().as_bytes(),
                                    cur.lexeme().as_bytes(),
                                    false,
                                ) == Ordering::Equal)
                    })
                    .map(|(k, _)| k)
                    .collect();
                for &k in &set {
                    annotated[k] = true;
                }
                let set_id = sets.len();
                sets.push(set);

                if entry.has_positions() {
                    for p in entry.positions() {
                        tokens.push(DocToken {
                            pos: p.pos(),
                            weight: p.weight(),
                            set: set_id,
                        });
                    }
                } else {
                    tokens.push(DocToken {
                        pos: 0,
                        weight: WeightClass::D,
                        set: set_id,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return None;
        }
        tokens.sort_unstable_by_key(|t| t.pos);
        Some(Self { tokens, sets })
    }
}

/// A minimal span of document tokens satisfying the query.
///
/// `begin`/`end` index the scanner's token sequence; `p`/`q` are the token
/// positions at the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cover {
    /// Index of the first token in the span.
    pub begin: usize,
    /// Index of the last token in the span.
    pub end: usize,
    /// Document position of the first token.
    pub p: u16,
    /// Document position of the last token.
    pub q: u16,
}

impl Cover {
    /// Number of tokens inside the span.
    pub fn width(&self) -> usize {
        self.end - self.begin + 1
    }
}

/// Stateful scan producing successive minimal covers.
///
/// Each call to [`CoverScanner::next_cover`] yields the next cover, with
/// successive covers starting strictly after their predecessor.
#[derive(Debug)]
pub struct CoverScanner<'a> {
    doc: DocRepresentation,
    query: &'a TsQuery,
    cursor: usize,
    exist: Vec<bool>,
}

impl<'a> CoverScanner<'a> {
    /// Build the scan, or `None` when no query operand matches the document.
    pub fn new(vector: &TsVector, query: &'a TsQuery) -> Option<Self> {
        let doc = DocRepresentation::build(vector, query)?;
        let exist = vec![false; query.len()];
        Some(Self {
            doc,
            query,
            cursor: 0,
            exist,
        })
    }

    /// Number of tokens in the flattened document.
    pub fn token_count(&self) -> usize {
        self.doc.tokens.len()
    }

    fn mark(&mut self, token: usize) {
        for &item in &self.doc.sets[self.doc.tokens[token].set] {
            self.exist[item] = true;
        }
    }

    /// Produce the next minimal cover, or `None` when the scan is exhausted.
    ///
    /// Forward from the cursor, tokens accumulate into an existence set until
    /// the query first holds with NOT treated as true (monotone, so this is a
    /// complete upper bound). Backward from there with NOT honoured finds the
    /// latest satisfying start. A backward scan that fails to close the span
    /// restarts one token further on.
    pub fn next_cover(&mut self) -> Option<Cover> {
        let len = self.doc.tokens.len();
        loop {
            if self.cursor >= len {
                return None;
            }

            // Upper bound, moving up.
            self.exist.fill(false);
            let mut q_pos: u16 = 0;
            let mut last = self.cursor;
            let mut found = false;
            let mut scan = self.cursor;
            while scan < len {
                self.mark(scan);
                let exist = &self.exist;
                if evaluate(self.query, false, |idx, _| exist[idx]) {
                    if self.doc.tokens[scan].pos > q_pos {
                        q_pos = self.doc.tokens[scan].pos;
                        last = scan;
                        found = true;
                    }
                    break;
                }
                scan += 1;
            }
            if !found {
                return None;
            }

            // Lower bound, moving down with NOT honoured.
            self.exist.fill(false);
            let mut begin: Option<usize> = None;
            let mut back = last;
            loop {
                self.mark(back);
                let exist = &self.exist;
                if evaluate(self.query, true, |idx, _| exist[idx]) {
                    begin = Some(back);
                    break;
                }
                if back == self.cursor {
                    break;
                }
                back -= 1;
            }

            if let Some(begin) = begin {
                let p_pos = self.doc.tokens[begin].pos;
                if p_pos <= q_pos {
                    self.cursor = begin + 1;
                    return Some(Cover {
                        begin,
                        end: last,
                        p: p_pos,
                        q: q_pos,
                    });
                }
            }
            self.cursor += 1;
        }
    }

    fn inverse_weight_sum(&self, cover: &Cover, inv_weights: &[f64; 4]) -> f64 {
        self.doc.tokens[cover.begin..=cover.end]
            .iter()
            .map(|t| inv_weights[t.weight as usize])
            .sum()
    }
}

/// Cover-density rank of a document against a query.
///
/// Scores 0 when no operand matches. Position-less entries flatten to a token
/// at position 0, which can never anchor a cover (an upper bound must advance
/// past position 0), so documents without positional data score 0 here.
pub fn rank_cd(vector: &TsVector, query: &TsQuery, params: RankParams) -> f32 {
    let inv_weights: [f64; 4] = params
        .weights
        .as_array()
        .map(|w| 1.0 / f64::from(w));

    let Some(mut scanner) = CoverScanner::new(vector, query) else {
        return 0.0;
    };

    let mut wdoc = 0.0f64;
    let mut ext = ExtDist::default();
    let mut prev_center = 0.0f64;
    while let Some(cover) = scanner.next_cover() {
        let inv_sum = scanner.inverse_weight_sum(&cover, &inv_weights);
        let cpos = cover.width() as f64 / inv_sum;

        // On long documents p may equal q because positions saturate; the
        // noise estimate then falls back to half the span width.
        let mut n_noise =
            (i32::from(cover.q) - i32::from(cover.p)) - (cover.end - cover.begin) as i32;
        if n_noise < 0 {
            n_noise = ((cover.end - cover.begin) / 2) as i32;
        }
        wdoc += cpos / f64::from(1 + n_noise);

        let center = (f64::from(cover.q) + f64::from(cover.p)) / 2.0;
        if ext.covers > 0 && center > prev_center {
            ext.sum_inv_dist += 1.0 / (center - prev_center);
        }
        prev_center = center;
        ext.covers += 1;
    }

    normalize::apply(params.method, wdoc, vector, Some(ext)) as f32
}
