//! Comparison groups and the one-vs-one selection.
//!
//! Both are bounded, ordered, id-unique lists. Adding a duplicate or adding
//! to a full list is a silent no-op; removing an absent id is too.

use serde::Serialize;
use tracing::debug;

use crate::compare::{compare, compare_pair, Comparison};
use crate::types::Pokemon;

/// Maximum members of a comparison group.
pub const MAX_GROUP_SIZE: usize = 10;

/// Maximum Pokémon selected for a one-vs-one comparison.
pub const MAX_SELECTION: usize = 2;

/// What an `add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Full,
}

/// A bounded, id-unique, ordered list of Pokémon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    members: Vec<Pokemon>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    /// An empty comparison group (capacity [`MAX_GROUP_SIZE`]).
    pub fn new() -> Self {
        Self::with_capacity(MAX_GROUP_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a Pokémon unless it is already present or the group is full.
    pub fn add(&mut self, pokemon: Pokemon) -> AddOutcome {
        if self.contains(pokemon.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            debug!(id = pokemon.id, capacity = self.capacity, "Group full, ignoring add");
            return AddOutcome::Full;
        }
        self.members.push(pokemon);
        AddOutcome::Added
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.members.len();
        self.members.retain(|p| p.id != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|p| p.id == id)
    }

    pub fn members(&self) -> &[Pokemon] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl FromIterator<Pokemon> for Group {
    /// Collect into a default-capacity group, applying the usual add rules.
    fn from_iter<I: IntoIterator<Item = Pokemon>>(iter: I) -> Self {
        let mut group = Group::new();
        for p in iter {
            group.add(p);
        }
        group
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// One user's comparison workspace: two groups plus a one-vs-one selection.
#[derive(Debug, Clone)]
pub struct CompareSession {
    group_a: Group,
    group_b: Group,
    selection: Group,
}

impl Default for CompareSession {
    fn default() -> Self {
        Self::new(MAX_GROUP_SIZE, MAX_SELECTION)
    }
}

impl CompareSession {
    pub fn new(max_group_size: usize, max_selection: usize) -> Self {
        Self {
            group_a: Group::with_capacity(max_group_size),
            group_b: Group::with_capacity(max_group_size),
            selection: Group::with_capacity(max_selection),
        }
    }

    pub fn group(&self, side: Side) -> &Group {
        match side {
            Side::A => &self.group_a,
            Side::B => &self.group_b,
        }
    }

    fn group_mut(&mut self, side: Side) -> &mut Group {
        match side {
            Side::A => &mut self.group_a,
            Side::B => &mut self.group_b,
        }
    }

    pub fn add_to_group(&mut self, side: Side, pokemon: Pokemon) -> AddOutcome {
        self.group_mut(side).add(pokemon)
    }

    pub fn remove_from_group(&mut self, side: Side, id: u32) -> bool {
        self.group_mut(side).remove(id)
    }

    pub fn selection(&self) -> &Group {
        &self.selection
    }

    pub fn select(&mut self, pokemon: Pokemon) -> AddOutcome {
        self.selection.add(pokemon)
    }

    pub fn deselect(&mut self, id: u32) -> bool {
        self.selection.remove(id)
    }

    /// Group-vs-group comparison; `None` until both groups have members.
    pub fn compare_groups(&self) -> Option<Comparison> {
        if self.group_a.is_empty() || self.group_b.is_empty() {
            return None;
        }
        Some(compare(self.group_a.members(), self.group_b.members()))
    }

    /// One-vs-one comparison; `None` unless exactly two are selected.
    pub fn compare_selected(&self) -> Option<Comparison> {
        match self.selection.members() {
            [a, b] => Some(compare_pair(a, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Winner;

    fn mon(id: u32) -> Pokemon {
        Pokemon::sample(id, &format!("mon-{id}"), [10, 10, 10, 10, 10, 10])
    }

    #[test]
    fn test_add_and_dedup() {
        let mut g = Group::new();
        assert_eq!(g.add(mon(1)), AddOutcome::Added);
        assert_eq!(g.add(mon(2)), AddOutcome::Added);
        assert_eq!(g.add(mon(1)), AddOutcome::AlreadyPresent);
        let ids: Vec<u32> = g.members().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_eleventh_add_is_noop() {
        let mut g = Group::new();
        for id in 1..=10 {
            assert_eq!(g.add(mon(id)), AddOutcome::Added);
        }
        assert!(g.is_full());
        let before = g.clone();

        assert_eq!(g.add(mon(11)), AddOutcome::Full);
        assert_eq!(g, before);
        assert_eq!(g.len(), 10);
        assert!(!g.contains(11));
    }

    #[test]
    fn test_duplicate_on_full_group_reports_present() {
        let mut g = Group::with_capacity(1);
        g.add(mon(1));
        assert_eq!(g.add(mon(1)), AddOutcome::AlreadyPresent);
        assert_eq!(g.add(mon(2)), AddOutcome::Full);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut g = Group::new();
        g.add(mon(1));
        assert!(!g.remove(42));
        assert_eq!(g.len(), 1);
        assert!(g.remove(1));
        assert!(g.is_empty());
        assert!(!g.remove(1));
    }

    #[test]
    fn test_remove_frees_capacity() {
        let mut g = Group::with_capacity(2);
        g.add(mon(1));
        g.add(mon(2));
        g.remove(1);
        assert_eq!(g.add(mon(3)), AddOutcome::Added);
        let ids: Vec<u32> = g.members().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_from_iterator_applies_rules() {
        let g: Group = (1..=12).map(mon).chain(std::iter::once(mon(3))).collect();
        assert_eq!(g.len(), MAX_GROUP_SIZE);
        assert_eq!(g.members().last().unwrap().id, 10);
    }

    #[test]
    fn test_session_compare_groups_needs_both_sides() {
        let mut s = CompareSession::default();
        assert!(s.compare_groups().is_none());
        s.add_to_group(Side::A, mon(1));
        assert!(s.compare_groups().is_none());
        s.add_to_group(Side::B, mon(2));
        s.add_to_group(Side::B, mon(3));

        let c = s.compare_groups().unwrap();
        assert_eq!(c.grand_total_a, 60);
        assert_eq!(c.grand_total_b, 120);
        assert_eq!(c.winner, Winner::GroupB);

        s.remove_from_group(Side::A, 1);
        assert!(s.compare_groups().is_none());
    }

    #[test]
    fn test_session_selection_capped_at_two() {
        let mut s = CompareSession::default();
        assert_eq!(s.select(mon(1)), AddOutcome::Added);
        assert!(s.compare_selected().is_none());
        assert_eq!(s.select(mon(1)), AddOutcome::AlreadyPresent);
        assert_eq!(s.select(mon(2)), AddOutcome::Added);
        assert_eq!(s.select(mon(3)), AddOutcome::Full);

        let c = s.compare_selected().unwrap();
        assert!(c.is_tie());
        assert_eq!(c.winner, Winner::GroupB);

        assert!(s.deselect(2));
        assert!(s.compare_selected().is_none());
        assert_eq!(s.selection().len(), 1);
    }

    #[test]
    fn test_groups_are_independent() {
        let mut s = CompareSession::new(3, 2);
        s.add_to_group(Side::A, mon(1));
        assert_eq!(s.add_to_group(Side::B, mon(1)), AddOutcome::Added);
        assert_eq!(s.group(Side::A).capacity(), 3);
        assert!(s.group(Side::B).contains(1));
    }
}
