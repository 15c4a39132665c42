//! Standard rank: a term-weight aggregate over matching entries.
//!
//! Queries with AND at the root score pairs of operands by position distance
//! (close co-occurrences count almost fully, far ones decay hard); everything
//! else sums per-entry occurrence series with quadratic decay.

use crate::normalize::{self, Normalization};
use crate::query::{Operator, QueryItem, TsQuery};
use crate::vector::{Position, TsVector, WeightClass, MAX_POS};
use crate::weights::Weights;

/// Parameters shared by both rankers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankParams {
    /// Weight-class table.
    pub weights: Weights,
    /// Normalization mask.
    pub method: Normalization,
}

impl RankParams {
    /// Default weights with a normalization mask.
    pub fn with_method(method: Normalization) -> Self {
        Self {
            weights: Weights::default(),
            method,
        }
    }
}

/// Substitute occurrence for position-less entries: the highest representable
/// position at the lowest weight.
const POS_SENTINEL: Position = Position::new(MAX_POS - 1, WeightClass::D);

/// Collocation weight for a pair of occurrences `dist` tokens apart.
fn word_distance(dist: i32) -> f32 {
    if dist > 100 {
        return 1e-30;
    }
    1.0 / (1.005 + 0.05 * (dist as f32 / 1.5 - 2.0).exp())
}

fn rank_or(w: &Weights, t: &TsVector, q: &TsQuery) -> f32 {
    let items = q.operands();
    let mut res = 0.0f32;

    for op in &items {
        for entry in t.find(op.lexeme().as_bytes(), op.is_prefix()) {
            let sentinel = [POS_SENTINEL];
            let post: &[Position] = if entry.has_positions() {
                entry.positions()
            } else {
                &sentinel
            };

            let mut resj = 0.0f32;
            let mut wjm = -1.0f32;
            let mut jm = 0usize;
            for (j, p) in post.iter().enumerate() {
                let wp = w.get(p.weight());
                resj += wp / ((j + 1) * (j + 1)) as f32;
                if wp > wjm {
                    wjm = wp;
                    jm = j;
                }
            }
            // resj sums w_i / i^2 over occurrences in stored order; the limit
            // of sum(1/i^2) is pi^2/6. The maximum-weight term is pulled out
            // of the series and re-added undecayed.
            res += (wjm + resj - wjm / ((jm + 1) * (jm + 1)) as f32) / 1.64493406685;
        }
    }

    if !items.is_empty() {
        res /= items.len() as f32;
    }
    res
}

fn rank_and(w: &Weights, t: &TsVector, q: &TsQuery) -> f32 {
    let items = q.operands();
    let size = items.len();
    if size < 2 {
        return rank_or(w, t, q);
    }

    let sentinel = [POS_SENTINEL];
    // Last-seen position vector per operand; None until the operand matches.
    let mut pos: Vec<Option<&[Position]>> = vec![None; size];
    let mut is_sentinel: Vec<bool> = vec![false; size];
    let mut res = -1.0f32;

    for i in 0..size {
        let op = items[i];
        for entry in t.find(op.lexeme().as_bytes(), op.is_prefix()) {
            if entry.has_positions() {
                pos[i] = Some(entry.positions());
                is_sentinel[i] = false;
            } else {
                pos[i] = Some(&sentinel);
                is_sentinel[i] = true;
            }
            let post = pos[i].unwrap_or(&sentinel);

            for k in 0..i {
                let Some(ct) = pos[k] else {
                    continue;
                };
                for lp in post {
                    for cp in ct {
                        let dist = (i32::from(lp.pos()) - i32::from(cp.pos())).abs();
                        // Co-located real occurrences cannot form a pair; a
                        // sentinel on either side counts as maximally far.
                        if dist == 0 && !is_sentinel[i] && !is_sentinel[k] {
                            continue;
                        }
                        let dist = if dist == 0 { i32::from(MAX_POS) } else { dist };
                        let curw =
                            (w.get(lp.weight()) * w.get(cp.weight()) * word_distance(dist)).sqrt();
                        res = if res < 0.0 {
                            curw
                        } else {
                            1.0 - (1.0 - res) * (1.0 - curw)
                        };
                    }
                }
            }
        }
    }
    res
}

/// Standard rank of a document against a query.
///
/// Dispatches on the query root: AND queries use the pairwise collocation
/// kernel, everything else (including NOT, which ranking treats as neutral)
/// the per-operand sum. Empty inputs score 0.
pub fn rank(vector: &TsVector, query: &TsQuery, params: RankParams) -> f32 {
    if vector.is_empty() || query.is_empty() {
        return 0.0;
    }

    let root_is_and = matches!(
        query.root(),
        Some(QueryItem::Operator(Operator::And))
    );
    let mut res = if root_is_and {
        rank_and(&params.weights, vector, query)
    } else {
        rank_or(&params.weights, vector, query)
    };
    if res < 0.0 {
        res = 1e-20;
    }

    normalize::apply(params.method, f64::from(res), vector, None) as f32
}
