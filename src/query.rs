//! Boolean queries over lexeme operands.
//!
//! A [`TsQuery`] is a postfix item sequence: operand leaves interleaved with
//! the operators that combine them, root last. The crate does not parse query
//! text; a parser upstream produces the postfix form and [`TsQuery::from_postfix`]
//! checks it is well-formed.

use crate::vector::compare_lexemes;
use crate::Error;
use std::cmp::Ordering;

/// A query leaf: the lexeme to look up, with match and filter modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    lexeme: String,
    #[cfg_attr(feature = "serde", serde(default))]
    prefix: bool,
    /// Weight-class filter carried from the query language. The rankers do
    /// not consult it; it is preserved for callers that post-filter matches.
    #[cfg_attr(feature = "serde", serde(default))]
    weight_mask: u8,
}

impl Operand {
    /// An exact-match operand.
    pub fn new(lexeme: impl Into<String>) -> Self {
        Self {
            lexeme: lexeme.into(),
            prefix: false,
            weight_mask: 0,
        }
    }

    /// A prefix operand: matches every lexeme starting with these bytes.
    pub fn prefix(lexeme: impl Into<String>) -> Self {
        Self {
            lexeme: lexeme.into(),
            prefix: true,
            weight_mask: 0,
        }
    }

    /// Attach a weight-class filter mask.
    pub fn with_weight_mask(mut self, mask: u8) -> Self {
        self.weight_mask = mask;
        self
    }

    /// Operand bytes to match against stored lexemes.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Whether this operand matches by prefix.
    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Weight-class filter mask (unused by the rankers).
    pub fn weight_mask(&self) -> u8 {
        self.weight_mask
    }
}

/// A query operator combining the results below it on the postfix stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Operator {
    /// Both operands must be present.
    And,
    /// Either operand must be present.
    Or,
    /// The operand must be absent.
    Not,
    /// Operands at a fixed distance. Ranking has no per-position operator
    /// state, so this evaluates like [`Operator::And`]; the distance is
    /// preserved for callers that re-check positions.
    Phrase(u16),
}

/// One item of the postfix sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QueryItem {
    /// A lexeme leaf.
    Operand(Operand),
    /// An operator over the items below it.
    Operator(Operator),
}

impl QueryItem {
    /// Shorthand for an exact-match leaf.
    pub fn operand(lexeme: impl Into<String>) -> Self {
        Self::Operand(Operand::new(lexeme))
    }

    /// Shorthand for a prefix leaf.
    pub fn prefix(lexeme: impl Into<String>) -> Self {
        Self::Operand(Operand::prefix(lexeme))
    }
}

impl From<Operator> for QueryItem {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

/// A well-formed postfix boolean query. The last item is the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<QueryItem>", into = "Vec<QueryItem>")
)]
pub struct TsQuery {
    items: Vec<QueryItem>,
}

impl TsQuery {
    /// Validate a postfix item sequence.
    ///
    /// Every operator must find its operands already on the stack, and the
    /// sequence must reduce to exactly one value. The empty query is legal
    /// and ranks as 0.
    pub fn from_postfix(items: impl IntoIterator<Item = QueryItem>) -> Result<Self, Error> {
        let items: Vec<QueryItem> = items.into_iter().collect();
        let mut depth = 0usize;
        for item in &items {
            match item {
                QueryItem::Operand(_) => depth += 1,
                QueryItem::Operator(Operator::Not) => {
                    if depth < 1 {
                        return Err(Error::MalformedQuery("NOT without an operand"));
                    }
                }
                QueryItem::Operator(_) => {
                    if depth < 2 {
                        return Err(Error::MalformedQuery(
                            "binary operator without two operands",
                        ));
                    }
                    depth -= 1;
                }
            }
        }
        if !items.is_empty() && depth != 1 {
            return Err(Error::MalformedQuery("items left over after the root"));
        }
        Ok(Self { items })
    }

    /// Number of postfix items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the query has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in postfix order.
    pub fn items(&self) -> &[QueryItem] {
        &self.items
    }

    /// The root item, if any (the last postfix item).
    pub fn root(&self) -> Option<&QueryItem> {
        self.items.last()
    }

    /// Sorted, de-duplicated operand leaves.
    ///
    /// Sorted by the lexeme comparator; operands pointing at identical bytes
    /// collapse to the first occurrence, so each distinct lexeme is visited
    /// once by the rankers.
    pub fn operands(&self) -> Vec<&Operand> {
        let mut ops: Vec<&Operand> = self
            .items
            .iter()
            .filter_map(|item| match item {
                QueryItem::Operand(op) => Some(op),
                QueryItem::Operator(_) => None,
            })
            .collect();
        ops.sort_by(|a, b| compare_lexemes(a.lexeme.as_bytes(), b.lexeme.as_bytes(), false));
        ops.dedup_by(|a, b| {
            compare_lexemes(a.lexeme.as_bytes(), b.lexeme.as_bytes(), false) == Ordering::Equal
        });
        ops
    }
}

impl TryFrom<Vec<QueryItem>> for TsQuery {
    type Error = Error;

    fn try_from(items: Vec<QueryItem>) -> Result<Self, Error> {
        Self::from_postfix(items)
    }
}

impl From<TsQuery> for Vec<QueryItem> {
    fn from(query: TsQuery) -> Self {
        query.items
    }
}

/// Evaluate the query against a presence predicate.
///
/// The predicate receives each operand leaf with its postfix index and reports
/// whether it is present. With `calc_not` unset, NOT sub-expressions count as
/// true regardless of their operand, which makes evaluation monotone in the
/// predicate; with it set, NOT is honoured.
pub fn evaluate(
    query: &TsQuery,
    calc_not: bool,
    mut present: impl FnMut(usize, &Operand) -> bool,
) -> bool {
    let mut stack: Vec<bool> = Vec::with_capacity(query.items.len());
    for (index, item) in query.items.iter().enumerate() {
        match item {
            QueryItem::Operand(op) => stack.push(present(index, op)),
            QueryItem::Operator(Operator::Not) => {
                let value = stack.pop().unwrap_or(false);
                stack.push(if calc_not { !value } else { true });
            }
            QueryItem::Operator(op) => {
                let rhs = stack.pop().unwrap_or(false);
                let lhs = stack.pop().unwrap_or(false);
                stack.push(match op {
                    Operator::Or => lhs || rhs,
                    _ => lhs && rhs,
                });
            }
        }
    }
    stack.pop().unwrap_or(false)
}
