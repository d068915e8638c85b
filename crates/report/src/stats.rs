// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Descriptive statistics over benchmark values.

use arrow::array::{Array, Float64Array};
use arrow::compute;

/// Mean, extremes and total of a column's non-null values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

impl Summary {
    /// Summary of an Arrow column; `None` when every value is null.
    pub fn of_array(array: &Float64Array) -> Option<Self> {
        let count = array.len() - array.null_count();
        if count == 0 {
            return None;
        }
        let total = compute::sum(array)?;
        Some(Self {
            count,
            mean: total / count as f64,
            min: compute::min(array)?,
            max: compute::max(array)?,
            total,
        })
    }

    pub fn of_values(values: &[f64]) -> Option<Self> {
        Self::of_array(&Float64Array::from(values.to_vec()))
    }
}

/// Five-number summary plus interquartile range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub min: f64,
    pub max: f64,
}

impl BoxStats {
    pub fn of_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        let q1 = percentile_of_sorted(&sorted, 25.0);
        let q3 = percentile_of_sorted(&sorted, 75.0);
        Some(Self {
            median: percentile_of_sorted(&sorted, 50.0),
            q1,
            q3,
            iqr: q3 - q1,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolated percentile of sorted, non-empty input.
pub fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
