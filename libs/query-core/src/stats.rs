//! Aggregation helpers for the `/stats` endpoints.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

/// Count entities per group. Entities without a group value are skipped.
pub fn count_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    let mut out = BTreeMap::new();
    for k in items.iter().filter_map(key) {
        *out.entry(k).or_insert(0) += 1;
    }
    out
}

pub fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> u64 {
    items.iter().filter(|e| pred(e)).count() as u64
}

/// Sum, min, max and average of a decimal field. Every figure is zero for an
/// empty input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecimalSummary {
    pub count: u64,
    pub sum: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub average: Decimal,
}

impl DecimalSummary {
    /// `average` is rounded half-up to two decimal places.
    pub fn of(values: impl IntoIterator<Item = Decimal>) -> Self {
        let mut count = 0u64;
        let mut sum = Decimal::ZERO;
        let mut min: Option<Decimal> = None;
        let mut max: Option<Decimal> = None;
        for v in values {
            count += 1;
            sum += v;
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
        }
        if count == 0 {
            return Self::default();
        }
        let average = (sum / Decimal::from(count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            count,
            sum,
            min: min.unwrap_or_default(),
            max: max.unwrap_or_default(),
            average,
        }
    }
}

/// Out-of-stock (`n == 0`) and low-stock (`0 < n < threshold`) counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StockCounts {
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub total_units: i64,
}

impl StockCounts {
    pub fn of(levels: impl IntoIterator<Item = i64>, low_threshold: i64) -> Self {
        let mut c = Self::default();
        for n in levels {
            c.total_units += n;
            if n == 0 {
                c.out_of_stock += 1;
            } else if n > 0 && n < low_threshold {
                c.low_stock += 1;
            }
        }
        c
    }
}
