//! LR(1) items and item sets.
//!
//! An item is kept as `(production index, dot position)` rather than a
//! copy of the right-hand side with a dot spliced in: interning the
//! position this way makes equality and hashing cheap and keeps GOTO a
//! lookup instead of a string rebuild. One lookahead terminal is never
//! stored per item; instead an `ItemSet` maps each key to the set of
//! terminals that key has been reached with, so "one item per lookahead"
//! and "one item with a list of lookaheads" are the same representation.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{Grammar, Production, AUGMENTED_PRODUCTION};
use crate::symbol::{Symbol, END_MARKER};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub production: u32,
    pub dot: usize,
}

impl ItemKey {
    pub fn new(production: u32, dot: usize) -> Self {
        Self { production, dot }
    }

    fn production_ref<'g>(&self, grammar: &'g Grammar, augmented: &'g Production) -> &'g Production {
        if self.production == AUGMENTED_PRODUCTION {
            augmented
        } else {
            &grammar.productions[self.production as usize]
        }
    }

    pub fn is_reducible(&self, grammar: &Grammar, augmented: &Production) -> bool {
        self.dot >= self.production_ref(grammar, augmented).effective_right().len()
    }

    pub fn next_symbol<'g>(&self, grammar: &'g Grammar, augmented: &'g Production) -> Option<&'g Symbol> {
        self.production_ref(grammar, augmented).effective_right().get(self.dot)
    }

    pub fn symbols_after_next<'g>(&self, grammar: &'g Grammar, augmented: &'g Production) -> &'g [Symbol] {
        let right = self.production_ref(grammar, augmented).effective_right();
        if self.dot + 1 >= right.len() {
            &[]
        } else {
            &right[self.dot + 1..]
        }
    }

    pub fn shifted(&self) -> Self {
        Self::new(self.production, self.dot + 1)
    }

    pub fn left<'g>(&self, grammar: &'g Grammar, augmented: &'g Production) -> &'g str {
        &self.production_ref(grammar, augmented).left
    }
}

/// An unordered LR(1) item set: each kernel/closure item key mapped to the
/// set of terminals (or `#`) it has been derived with. Two sets are equal
/// iff they carry the same keys with the same lookahead sets — exactly
/// `BTreeMap`'s own `PartialEq`, which is why this is a thin wrapper rather
/// than a hand-rolled equality check.
pub type ItemSet = BTreeMap<ItemKey, BTreeSet<String>>;

/// Inserts `lookahead` into `item_set[key]`, returning whether the set
/// changed (new key, or a lookahead terminal not seen before for that key).
pub fn add_item(item_set: &mut ItemSet, key: ItemKey, lookahead: impl IntoIterator<Item = String>) -> bool {
    let entry = item_set.entry(key).or_default();
    let mut changed = false;
    for terminal in lookahead {
        changed |= entry.insert(terminal);
    }
    changed
}

/// Expands `item_set` to its closure under the grammar's productions.
///
/// For every item `[A -> alpha . B beta, a]` with `B` a nonterminal, adds
/// `[B -> . gamma, b]` for every production `B -> gamma` and every `b` in
/// FIRST(beta a). Iterates to a fixed point since closure items can
/// themselves introduce further nonterminals after their dots.
pub fn closure(mut item_set: ItemSet, grammar: &Grammar, augmented: &Production) -> ItemSet {
    loop {
        let mut additions: Vec<(ItemKey, BTreeSet<String>)> = Vec::new();
        for (key, lookaheads) in item_set.iter() {
            let next = match key.next_symbol(grammar, augmented) {
                Some(Symbol::Nonterminal(name)) => name,
                _ => continue,
            };
            let rest = key.symbols_after_next(grammar, augmented);
            for production in &grammar.productions {
                if &production.left != next {
                    continue;
                }
                let new_key = ItemKey::new(production.index, 0);
                let mut new_lookaheads = BTreeSet::new();
                for inherited in lookaheads {
                    new_lookaheads.extend(grammar.first_of_suffix(rest, inherited));
                }
                additions.push((new_key, new_lookaheads));
            }
        }
        let mut changed = false;
        for (key, lookaheads) in additions {
            changed |= add_item(&mut item_set, key, lookaheads);
        }
        if !changed {
            return item_set;
        }
    }
}

/// The kernel of the transition on `symbol`: every item immediately after
/// shifting the dot past `symbol`, not yet closed.
pub fn goto_kernel(item_set: &ItemSet, symbol: &Symbol, grammar: &Grammar, augmented: &Production) -> ItemSet {
    let mut kernel = ItemSet::new();
    for (key, lookaheads) in item_set.iter() {
        if key.next_symbol(grammar, augmented) == Some(symbol) {
            add_item(&mut kernel, key.shifted(), lookaheads.clone());
        }
    }
    kernel
}

pub fn initial_item_set(grammar: &Grammar, augmented: &Production) -> ItemSet {
    let mut kernel = ItemSet::new();
    add_item(
        &mut kernel,
        ItemKey::new(AUGMENTED_PRODUCTION, 0),
        [END_MARKER.to_string()],
    );
    closure(kernel, grammar, augmented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EPSILON;
    use std::collections::BTreeSet as Set;

    fn toy_grammar() -> (Grammar, Production) {
        let mut first_s = Set::new();
        first_s.insert("(".to_string());
        first_s.insert(EPSILON.to_string());
        let mut first_set = BTreeMap::new();
        first_set.insert("S".to_string(), first_s);

        let grammar = Grammar::new(
            "S",
            ["(".to_string(), ")".to_string()].into_iter().collect(),
            ["S".to_string()].into_iter().collect(),
            vec![
                Production::new(
                    "S",
                    vec![
                        Symbol::terminal("("),
                        Symbol::nonterminal("S"),
                        Symbol::terminal(")"),
                    ],
                    0,
                ),
                Production::new("S", vec![], 1),
            ],
            first_set,
        );
        let augmented = Production::new(
            "S'",
            vec![Symbol::nonterminal("S")],
            AUGMENTED_PRODUCTION,
        );
        (grammar, augmented)
    }

    #[test]
    fn closure_is_idempotent() {
        let (grammar, augmented) = toy_grammar();
        let once = initial_item_set(&grammar, &augmented);
        let twice = closure(once.clone(), &grammar, &augmented);
        assert_eq!(once, twice);
    }

    #[test]
    fn closure_adds_both_alternatives_of_s() {
        let (grammar, augmented) = toy_grammar();
        let state0 = initial_item_set(&grammar, &augmented);
        assert!(state0.contains_key(&ItemKey::new(0, 0)));
        assert!(state0.contains_key(&ItemKey::new(1, 0)));
    }

    #[test]
    fn goto_on_open_paren_reaches_recursive_state() {
        let (grammar, augmented) = toy_grammar();
        let state0 = initial_item_set(&grammar, &augmented);
        let kernel = goto_kernel(&state0, &Symbol::terminal("("), &grammar, &augmented);
        let state1 = closure(kernel, &grammar, &augmented);
        assert!(state1.contains_key(&ItemKey::new(0, 1)));
        assert!(state1.contains_key(&ItemKey::new(0, 0)));
        assert!(state1.contains_key(&ItemKey::new(1, 0)));
    }

    /// `S -> $` (a bare epsilon terminal on the right) must behave exactly
    /// like `S -> ` (an empty right-hand side): same reducibility, same
    /// closure, same GOTO. Without `effective_right` folding the two
    /// together, `[S -> . $, a]` never looks reducible and that alternative
    /// silently produces no ACTION entry.
    #[test]
    fn epsilon_terminal_rhs_is_reducible_at_the_dot_like_an_empty_rhs() {
        let (grammar, augmented) = toy_grammar();
        let epsilon_key = ItemKey::new(1, 0);
        assert!(epsilon_key.is_reducible(&grammar, &augmented));
        assert_eq!(epsilon_key.next_symbol(&grammar, &augmented), None);

        let mut epsilon_written_grammar = grammar.clone();
        epsilon_written_grammar.productions[1] =
            Production::new("S", vec![Symbol::terminal(EPSILON)], 1);
        assert!(epsilon_key.is_reducible(&epsilon_written_grammar, &augmented));
        assert_eq!(epsilon_key.next_symbol(&epsilon_written_grammar, &augmented), None);

        let original_state0 = initial_item_set(&grammar, &augmented);
        let rewritten_state0 = initial_item_set(&epsilon_written_grammar, &augmented);
        assert_eq!(original_state0, rewritten_state0);
    }
}
