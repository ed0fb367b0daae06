use std::cmp::Reverse;

use crate::normalize::EvidenceItem;

/// Rank-based boost for newer coverage.
///
/// Newer reporting is more likely to reflect corrections, so the most recent
/// credible source is allowed to outweigh a stale majority. Rank 0 is the most
/// recent item.
#[derive(Debug, Clone, PartialEq)]
pub struct RecencyPolicy {
    /// Multipliers for ranks 0, 1, 2, ...
    head: Vec<f64>,
    /// Multiplier for every rank past `head`.
    tail: f64,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self {
            head: vec![3.0, 2.0, 1.5],
            tail: 1.0,
        }
    }
}

impl RecencyPolicy {
    /// Uniform weighting: every rank counts the same.
    pub fn flat() -> Self {
        Self {
            head: Vec::new(),
            tail: 1.0,
        }
    }

    pub fn multiplier(&self, rank: usize) -> f64 {
        self.head.get(rank).copied().unwrap_or(self.tail)
    }
}

/// Indices into `items`, most recent first. Equal dates keep input order, and
/// undated items (epoch sentinel) land last.
pub fn recency_order(items: &[EvidenceItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    // sort_by_key is stable
    order.sort_by_key(|&i| Reverse(items[i].review_date));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use reelcheck_common::RawEvidence;
    use serde_json::json;

    fn dated(date: Option<&str>) -> RawEvidence {
        RawEvidence {
            review_date: date.map(|d| json!(d)),
            ..Default::default()
        }
    }

    #[test]
    fn default_multipliers_favour_the_newest_three() {
        let policy = RecencyPolicy::default();
        assert_eq!(policy.multiplier(0), 3.0);
        assert_eq!(policy.multiplier(1), 2.0);
        assert_eq!(policy.multiplier(2), 1.5);
        assert_eq!(policy.multiplier(3), 1.0);
        assert_eq!(policy.multiplier(40), 1.0);
    }

    #[test]
    fn flat_policy_weights_every_rank_equally() {
        let policy = RecencyPolicy::flat();
        assert_eq!(policy.multiplier(0), policy.multiplier(9));
    }

    #[test]
    fn newest_first_with_undated_last() {
        let items = normalize(&[
            dated(Some("2023-01-01")),
            dated(None),
            dated(Some("2024-06-01")),
            dated(Some("2024-01-01")),
        ]);
        assert_eq!(recency_order(&items), vec![2, 3, 0, 1]);
    }

    #[test]
    fn ties_keep_input_order() {
        let items = normalize(&[
            dated(Some("2024-01-01")),
            dated(None),
            dated(Some("2024-01-01")),
            dated(None),
        ]);
        assert_eq!(recency_order(&items), vec![0, 2, 1, 3]);
    }
}
