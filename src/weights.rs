//! The weight-class table: one float per class, `[w_D, w_C, w_B, w_A]`.

use crate::vector::WeightClass;
use crate::Error;

/// Default table: D = 0.1, C = 0.2, B = 0.4, A = 1.0.
pub const DEFAULT_WEIGHTS: [f32; 4] = [0.1, 0.2, 0.4, 1.0];

/// A validated weight table, indexed by [`WeightClass`].
///
/// Every value lies in `[0, 1]`. User-supplied tables substitute the default
/// for negative entries and reject entries above 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[f32; 4]", into = "[f32; 4]"))]
pub struct Weights([f32; 4]);

impl Default for Weights {
    fn default() -> Self {
        Self(DEFAULT_WEIGHTS)
    }
}

impl Weights {
    /// Validate a user table given as `[w_D, w_C, w_B, w_A]`.
    ///
    /// Negative entries fall back to the default table; entries above 1.0 are
    /// rejected.
    pub fn new(values: [f32; 4]) -> Result<Self, Error> {
        let mut ws = [0.0f32; 4];
        for (i, &value) in values.iter().enumerate() {
            ws[i] = if value >= 0.0 { value } else { DEFAULT_WEIGHTS[i] };
            if ws[i] > 1.0 {
                return Err(Error::WeightOutOfRange);
            }
        }
        Ok(Self(ws))
    }

    /// Validate a host array that may carry nulls.
    ///
    /// The array must have at least four elements and no nulls anywhere (not
    /// just in the first four); only the first four are used.
    pub fn try_from_nullable(values: &[Option<f32>]) -> Result<Self, Error> {
        if values.len() < DEFAULT_WEIGHTS.len() {
            return Err(Error::WeightArrayTooShort);
        }
        if values.iter().any(|v| v.is_none()) {
            return Err(Error::WeightNull);
        }
        let mut first = [0.0f32; 4];
        for (slot, value) in first.iter_mut().zip(values) {
            *slot = value.unwrap_or_default();
        }
        Self::new(first)
    }

    /// The weight for one class.
    pub fn get(&self, class: WeightClass) -> f32 {
        self.0[class as usize]
    }

    /// The table as `[w_D, w_C, w_B, w_A]`.
    pub fn as_array(&self) -> [f32; 4] {
        self.0
    }
}

impl TryFrom<[f32; 4]> for Weights {
    type Error = Error;

    fn try_from(values: [f32; 4]) -> Result<Self, Error> {
        Self::new(values)
    }
}

impl From<Weights> for [f32; 4] {
    fn from(weights: Weights) -> Self {
        weights.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_ascending() {
        let w = Weights::default();
        assert_eq!(w.as_array(), [0.1, 0.2, 0.4, 1.0]);
        assert_eq!(w.get(WeightClass::A), 1.0);
        assert_eq!(w.get(WeightClass::D), 0.1);
    }

    #[test]
    fn negative_entries_fall_back_to_defaults() {
        let w = Weights::new([-1.0, 0.5, -0.001, 1.0]).unwrap();
        assert_eq!(w.as_array(), [0.1, 0.5, 0.4, 1.0]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(Weights::new([0.1, 0.2, 0.4, 1.01]), Err(Error::WeightOutOfRange));
    }

    #[test]
    fn nullable_array_validation() {
        assert_eq!(
            Weights::try_from_nullable(&[Some(0.1), Some(0.2), Some(0.4)]),
            Err(Error::WeightArrayTooShort)
        );
        assert_eq!(
            Weights::try_from_nullable(&[Some(0.1), Some(0.2), Some(0.4), None]),
            Err(Error::WeightNull)
        );
        // Nulls beyond the first four still reject.
        assert_eq!(
            Weights::try_from_nullable(&[Some(0.1), Some(0.2), Some(0.4), Some(1.0), None]),
            Err(Error::WeightNull)
        );
        // Extra non-null elements are ignored.
        let w =
            Weights::try_from_nullable(&[Some(0.0), Some(0.2), Some(0.4), Some(1.0), Some(9.0)])
                .unwrap();
        assert_eq!(w.as_array(), [0.0, 0.2, 0.4, 1.0]);
    }
}
