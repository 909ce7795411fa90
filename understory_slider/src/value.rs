// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider values: a single number, or an ordered set of handle positions.

use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

/// Inline storage for the handle positions of a range slider.
///
/// Two handles is by far the most common case, so that many are kept inline.
pub type Handles = SmallVec<[f64; 2]>;

/// The value held by a slider.
///
/// Scalar sliders hold a [`Value::Single`]; range (multi-handle) sliders hold
/// a [`Value::Range`] whose entries are ordered and separated by at least one
/// step.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The value of a slider with one handle.
    Single(f64),
    /// Handle positions of a range slider, lowest first.
    Range(Handles),
}

impl Value {
    /// Returns the scalar value, or `None` for range values.
    #[must_use]
    pub fn as_single(&self) -> Option<f64> {
        match self {
            Self::Single(value) => Some(*value),
            Self::Range(_) => None,
        }
    }

    /// Returns all handle positions; a scalar value is a single handle.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Single(value) => core::slice::from_ref(value),
            Self::Range(values) => values,
        }
    }

    /// Returns the position of handle `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }

    /// Number of handles described by this value.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` for range values.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Single(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Single(f64::from(value))
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(values: [f64; N]) -> Self {
        Self::Range(Handles::from_slice(&values))
    }
}

impl From<&[f64]> for Value {
    fn from(values: &[f64]) -> Self {
        Self::Range(Handles::from_slice(values))
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Self::Range(Handles::from_vec(values))
    }
}

impl From<Handles> for Value {
    fn from(values: Handles) -> Self {
        Self::Range(values)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "{value}"),
            Self::Range(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
