//! Comparison engine.
//!
//! Head-to-head stat comparison between two groups of Pokémon. A
//! one-vs-one comparison is the same routine with single-element groups.

use serde::Serialize;
use std::slice;

use crate::types::{Pokemon, StatName};

/// Per-stat totals for both sides of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub stat: StatName,
    pub group_a_total: u32,
    pub group_b_total: u32,
}

impl ComparisonResult {
    fn share(part: u32, other: u32) -> f64 {
        let combined = part as f64 + other as f64;
        if combined == 0.0 {
            0.0
        } else {
            (part as f64 / combined * 100.0).min(100.0)
        }
    }

    /// Group A's percentage of the combined total for this stat.
    pub fn share_a(&self) -> f64 {
        Self::share(self.group_a_total, self.group_b_total)
    }

    /// Group B's percentage of the combined total for this stat.
    pub fn share_b(&self) -> f64 {
        Self::share(self.group_b_total, self.group_a_total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    GroupA,
    GroupB,
}

/// A full comparison: six results in canonical stat order plus the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub results: Vec<ComparisonResult>,
    pub grand_total_a: u32,
    pub grand_total_b: u32,
    pub winner: Winner,
}

impl Comparison {
    /// Pick the winning side out of the two compared groups.
    pub fn winning_group<'a>(&self, group_a: &'a [Pokemon], group_b: &'a [Pokemon]) -> &'a [Pokemon] {
        match self.winner {
            Winner::GroupA => group_a,
            Winner::GroupB => group_b,
        }
    }

    /// Absolute difference between the grand totals.
    pub fn margin(&self) -> u32 {
        self.grand_total_a.abs_diff(self.grand_total_b)
    }

    /// Whether the grand totals are equal (the winner is then group B).
    pub fn is_tie(&self) -> bool {
        self.grand_total_a == self.grand_total_b
    }
}

/// Sum of one stat across a group. Missing stats count as 0; the sum
/// saturates at `u32::MAX`.
pub fn group_total(group: &[Pokemon], stat: StatName) -> u32 {
    group
        .iter()
        .map(|p| p.stat(stat))
        .fold(0, u32::saturating_add)
}

/// Compare two groups stat by stat.
///
/// Group A wins only with a strictly greater grand total; equal totals,
/// including two empty groups, go to group B.
pub fn compare(group_a: &[Pokemon], group_b: &[Pokemon]) -> Comparison {
    let results: Vec<ComparisonResult> = StatName::ALL
        .iter()
        .map(|&stat| ComparisonResult {
            stat,
            group_a_total: group_total(group_a, stat),
            group_b_total: group_total(group_b, stat),
        })
        .collect();

    let grand_total_a = results
        .iter()
        .map(|r| r.group_a_total)
        .fold(0, u32::saturating_add);
    let grand_total_b = results
        .iter()
        .map(|r| r.group_b_total)
        .fold(0, u32::saturating_add);

    let winner = if grand_total_a > grand_total_b {
        Winner::GroupA
    } else {
        Winner::GroupB
    };

    Comparison {
        results,
        grand_total_a,
        grand_total_b,
        winner,
    }
}

/// One-vs-one comparison.
pub fn compare_pair(a: &Pokemon, b: &Pokemon) -> Comparison {
    compare(slice::from_ref(a), slice::from_ref(b))
}
