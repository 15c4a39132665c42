//! `tsrank`: relevance ranking of positional postings against boolean queries.
//!
//! This crate is the **scoring** half of a text-search pipeline: a document
//! arrives as a [`TsVector`] (sorted lexeme → positions postings), a query as a
//! [`TsQuery`] (postfix boolean expression over lexeme operands), and the two
//! rankers reduce the pair to a single non-negative relevance score:
//! - [`rank`] — a term-weight aggregate (pairwise position-distance
//!   attenuation for AND queries, decayed occurrence sums otherwise).
//! - [`rank_cd`] — cover density: enumerate minimal spans of the document that
//!   satisfy the query and aggregate per-span contributions.
//!
//! Scope:
//! - Pure, per-call scoring over borrowed inputs (no index, no I/O)
//! - Deterministic results for identical inputs
//! - Caller-provided parsed structures (tokenization and query parsing live
//!   upstream, so different products can choose their own text handling)
//!
//! Non-goals:
//! - Indexing or persistence
//! - Query languages (build a [`TsQuery`] from postfix items instead)
//! - Any ranking that inspects lexeme spellings beyond operand matching
//!
//! References:
//! - Clarke, Cormack & Tudhope (2000). "Relevance Ranking for One to Three
//!   Term Queries." (cover density ranking)
//! - Salton & Buckley (1988): term-weighting foundations

pub mod normalize;
pub mod query;
pub mod rank;
pub mod rank_cd;
pub mod vector;
pub mod weights;

pub use error::Error;
pub use normalize::Normalization;
pub use query::{evaluate, Operand, Operator, QueryItem, TsQuery};
pub use rank::{rank, RankParams};
pub use rank_cd::{rank_cd, Cover, CoverScanner};
pub use vector::{Position, TsVector, WeightClass, WordEntry, MAX_POS};
pub use weights::Weights;

mod error {
    /// Errors for ranking inputs.
    #[derive(thiserror::Error, Debug, PartialEq, Eq)]
    pub enum Error {
        /// Weight array was not one-dimensional (host bindings only; slices
        /// passed directly are 1-D by construction).
        #[error("array of weight must be one-dimensional")]
        WeightArrayNotOneDimensional,
        /// Weight array had fewer than four elements.
        #[error("array of weight is too short")]
        WeightArrayTooShort,
        /// Weight array contained a null element.
        #[error("array of weight must not contain nulls")]
        WeightNull,
        /// A weight exceeded 1.0.
        #[error("weight out of range")]
        WeightOutOfRange,
        /// Postfix item sequence did not form a single boolean expression.
        #[error("malformed query: {0}")]
        MalformedQuery(&'static str),
    }
}
