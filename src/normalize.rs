//! Score normalization: a bit-mask of independent divisions applied to a raw
//! rank, chiefly to damp the advantage of long documents.

use crate::vector::TsVector;

bitflags::bitflags! {
    /// Normalization mask. Bits are independent; all applicable bits are
    /// applied in declaration order. The default (empty) mask leaves the raw
    /// score untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Normalization: u32 {
        /// Divide by `log2(doc_length + 1)`.
        const LOGLENGTH = 0x01;
        /// Divide by the document length (total occurrence count).
        const LENGTH = 0x02;
        /// Divide by the mean distance between covers (cover density only).
        const EXTDIST = 0x04;
        /// Divide by the number of distinct lexemes.
        const UNIQ = 0x08;
        /// Divide by `log2(distinct lexemes + 1)`.
        const LOGUNIQ = 0x10;
        /// Map the score into `[0, 1)` via `r / (r + 1)`.
        const RDIVRPLUS1 = 0x20;
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::empty()
    }
}

/// Inter-cover distance statistics, tracked while scanning covers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExtDist {
    pub covers: u32,
    pub sum_inv_dist: f64,
}

/// Apply the mask to a raw score. `ext` is supplied by the cover-density
/// ranker only; the standard ranker passes `None` and `EXTDIST` is a no-op.
pub(crate) fn apply(
    method: Normalization,
    mut res: f64,
    vector: &TsVector,
    ext: Option<ExtDist>,
) -> f64 {
    let uniq = vector.len();

    if method.contains(Normalization::LOGLENGTH) && uniq > 0 {
        res /= ((vector.doc_length() + 1) as f64).log2();
    }

    if method.contains(Normalization::LENGTH) {
        let len = vector.doc_length();
        if len > 0 {
            res /= len as f64;
        }
    }

    if method.contains(Normalization::EXTDIST) {
        if let Some(ext) = ext {
            if ext.covers > 0 && ext.sum_inv_dist > 0.0 {
                res /= f64::from(ext.covers) / ext.sum_inv_dist;
            }
        }
    }

    if method.contains(Normalization::UNIQ) && uniq > 0 {
        res /= uniq as f64;
    }

    if method.contains(Normalization::LOGUNIQ) && uniq > 0 {
        res /= ((uniq + 1) as f64).log2();
    }

    if method.contains(Normalization::RDIVRPLUS1) {
        res /= res + 1.0;
    }

    res
}
