//! This module defines `Program`, the ordered list of editor rows a machine executes.

use crate::types::{Slot, Transition};
use serde::{Deserialize, Serialize};

/// An ordered sequence of program rows, each either a statement or an empty placeholder.
///
/// Row order is significant: when several statements share the same
/// (`current_state`, `input`) key, the one with the lowest index wins.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    slots: Vec<Slot>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the first statement that fires for `state` and `symbol`.
    ///
    /// Empty rows are skipped. The returned index is the row position, which is
    /// what a host highlights as the matched statement.
    ///
    /// # Returns
    ///
    /// * `Some((&Transition, usize))` for the lowest-index match.
    /// * `None` if no statement matches.
    pub fn lookup(&self, state: &str, symbol: &str) -> Option<(&Transition, usize)> {
        self.slots.iter().enumerate().find_map(|(i, slot)| {
            slot.transition()
                .filter(|t| t.matches(state, symbol))
                .map(|t| (t, i))
        })
    }

    /// Overwrites the row at `index`, or appends a new last row when `index` is `None`
    /// or past the end.
    ///
    /// Returns the index the slot ended up at.
    pub fn insert_or_replace(&mut self, slot: impl Into<Slot>, index: Option<usize>) -> usize {
        let slot = slot.into();
        match index {
            Some(i) if i < self.slots.len() => {
                self.slots[i] = slot;
                i
            }
            _ => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    /// Removes the row at `index`, shifting later rows down by one.
    ///
    /// Returns `false` and leaves the program untouched if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }

        self.slots.remove(index);
        true
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the filled statements in row order, skipping empty rows.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.slots.iter().filter_map(Slot::transition)
    }

    /// Returns every row in its editable text form. Empty rows yield empty strings.
    pub fn lines(&self) -> Vec<String> {
        self.slots.iter().map(Slot::to_string).collect()
    }
}

impl From<Vec<Slot>> for Program {
    fn from(slots: Vec<Slot>) -> Self {
        Self { slots }
    }
}

impl FromIterator<Transition> for Program {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Slot::Filled).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;
    use proptest::prelude::*;

    fn rule(state: &str, input: &str, next: &str) -> Transition {
        Transition::new(state, input, next, input, Action::Right)
    }

    fn abc() -> Program {
        Program::from_iter([rule("a", "0", "x"), rule("b", "0", "y"), rule("c", "0", "z")])
    }

    #[test]
    fn test_lookup_finds_match_and_index() {
        let program = abc();

        let (transition, index) = program.lookup("b", "0").unwrap();
        assert_eq!(transition.next_state, "y");
        assert_eq!(index, 1);

        assert!(program.lookup("b", "1").is_none());
        assert!(program.lookup("d", "0").is_none());
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let program = Program::from_iter([
            rule("a", "0", "first"),
            rule("b", "0", "other"),
            rule("a", "0", "second"),
        ]);

        let (transition, index) = program.lookup("a", "0").unwrap();
        assert_eq!(transition.next_state, "first");
        assert_eq!(index, 0);
    }

    #[test]
    fn test_lookup_skips_empty_rows() {
        let program = Program::from(vec![Slot::Empty, Slot::Filled(rule("a", "0", "x"))]);

        let (_, index) = program.lookup("a", "0").unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_insert_appends_when_unspecified_or_out_of_bounds() {
        let mut program = abc();

        assert_eq!(program.insert_or_replace(Slot::Empty, None), 3);
        assert_eq!(program.insert_or_replace(rule("d", "0", "w"), Some(99)), 4);

        assert_eq!(program.len(), 5);
        assert_eq!(program.get(3), Some(&Slot::Empty));
        assert_eq!(program.lookup("d", "0").map(|(_, i)| i), Some(4));
    }

    #[test]
    fn test_replace_in_bounds() {
        let mut program = abc();

        assert_eq!(program.insert_or_replace(rule("q", "1", "r"), Some(1)), 1);

        assert_eq!(program.len(), 3);
        assert!(program.lookup("b", "0").is_none());
        assert_eq!(program.lookup("q", "1").map(|(_, i)| i), Some(1));
    }

    #[test]
    fn test_remove_first_row() {
        let mut program = abc();

        assert!(program.remove(0));
        assert_eq!(
            program.transitions().map(|t| t.current_state.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
    }

    #[test]
    fn test_remove_middle_preserves_order() {
        let mut program = abc();

        assert!(program.remove(1));
        assert!(program.lookup("b", "0").is_none());
        assert_eq!(program.lookup("c", "0").map(|(_, i)| i), Some(1));
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let mut program = abc();

        assert!(!program.remove(3));
        assert_eq!(program, abc());
        assert!(!Program::new().remove(0));
    }

    #[test]
    fn test_iterate_rows_by_reference() {
        let mut program = abc();
        program.insert_or_replace(Slot::Empty, Some(1));

        let empty_rows = (&program).into_iter().filter(|slot| slot.is_empty()).count();
        assert_eq!(empty_rows, 1);

        let mut states = Vec::new();
        for slot in &program {
            if let Some(transition) = slot.transition() {
                states.push(transition.current_state.as_str());
            }
        }
        assert_eq!(states, vec!["a", "c"]);
    }

    #[test]
    fn test_lines() {
        let mut program = abc();
        program.insert_or_replace(Slot::Empty, None);

        assert_eq!(
            program.lines(),
            vec!["a 0 : x 0 R", "b 0 : y 0 R", "c 0 : z 0 R", ""]
        );
    }

    proptest! {
        /// Property: lookup returns the lowest index whose key matches
        #[test]
        fn prop_lookup_returns_lowest_matching_index(
            keys in proptest::collection::vec((0u8..3, 0u8..3), 0..12),
            state in 0u8..3,
            symbol in 0u8..3,
        ) {
            let program: Program = keys
                .iter()
                .map(|(s, i)| rule(&s.to_string(), &i.to_string(), "next"))
                .collect();

            let expected = keys.iter().position(|&(s, i)| s == state && i == symbol);
            let found = program
                .lookup(&state.to_string(), &symbol.to_string())
                .map(|(_, i)| i);

            prop_assert_eq!(found, expected);
        }

        /// Property: a removed row is never returned by lookup
        #[test]
        fn prop_removed_row_never_found(len in 1usize..8, pick in 0usize..8) {
            let index = pick % len;
            let mut program: Program = (0..len)
                .map(|i| rule(&format!("s{i}"), "0", "next"))
                .collect();

            prop_assert!(program.remove(index));
            let key = format!("s{index}");
            prop_assert!(program.lookup(&key, "0").is_none());
            prop_assert_eq!(program.len(), len - 1);
        }
    }
}
