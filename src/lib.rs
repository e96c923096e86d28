//! LR(1) automaton construction and ACTION/GOTO table building from a
//! grammar. The table types themselves (`Action`, `ActionTable`,
//! `GotoTable`) and the shift/reduce driver that consumes them live in the
//! sibling `lr1_runtime` crate and are re-exported here, so this crate can
//! stay ignorant of token streams while still offering one coherent API.

pub mod automaton;
pub mod error;
pub mod grammar;
pub mod item;
pub mod symbol;
pub mod table;

pub use automaton::{build_automaton, Automaton, State};
pub use error::{ConfigError, ConflictError};
pub use grammar::{Grammar, Production};
pub use lr1_runtime::{Action, ActionTable, GotoTable, TableFormatError};
pub use symbol::Symbol;
pub use table::build_tables;

#[cfg(test)]
mod end_to_end {
    use super::*;
    use crate::symbol::EPSILON;
    use std::collections::{BTreeMap, BTreeSet};

    /// `S -> a`. The smallest possible grammar: one shift, one reduce,
    /// accept.
    #[test]
    fn single_terminal_grammar_accepts() {
        let mut first_set = BTreeMap::new();
        first_set.insert("S".to_string(), ["a".to_string()].into_iter().collect());
        let grammar = Grammar::new(
            "S",
            ["a".to_string()].into_iter().collect(),
            ["S".to_string()].into_iter().collect(),
            vec![Production::new("S", vec![Symbol::terminal("a")], 0)],
            first_set,
        );
        let automaton = build_automaton(&grammar).unwrap();
        let (action_table, _) = build_tables(&automaton, &grammar).unwrap();
        assert!(matches!(action_table.get(0, "a"), Some(Action::Shift(_))));
    }

    /// `S -> ( S ) | $`. Balanced parens, exercised fully by the driver in
    /// `lr1_runtime`; here just checks the table has both a shift-on-`(`
    /// and a reduce-on-`)`/`#` for the empty alternative.
    #[test]
    fn nested_parens_grammar_has_both_alternatives_in_state_zero() {
        let mut first_s = BTreeSet::new();
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
                    vec![Symbol::terminal("("), Symbol::nonterminal("S"), Symbol::terminal(")")],
                    0,
                ),
                Production::new("S", vec![], 1),
            ],
            first_set,
        );
        let automaton = build_automaton(&grammar).unwrap();
        let (action_table, _) = build_tables(&automaton, &grammar).unwrap();
        assert!(matches!(action_table.get(0, "("), Some(Action::Shift(_))));
        assert!(matches!(action_table.get(0, ")"), Some(Action::Reduce(1))));
        assert!(matches!(action_table.get(0, "#"), Some(Action::Reduce(1))));
    }

    /// `S -> C C; C -> c C | d`, the classical example used to show that
    /// LR(1) needs per-context lookahead: the two occurrences of `C` must
    /// land in distinct states.
    #[test]
    fn classical_example_has_distinct_states_for_each_c() {
        let mut first_c = BTreeSet::new();
        first_c.insert("c".to_string());
        first_c.insert("d".to_string());
        let mut first_set = BTreeMap::new();
        first_set.insert("S".to_string(), first_c.clone());
        first_set.insert("C".to_string(), first_c);

        let grammar = Grammar::new(
            "S",
            ["c".to_string(), "d".to_string()].into_iter().collect(),
            ["S".to_string(), "C".to_string()].into_iter().collect(),
            vec![
                Production::new("S", vec![Symbol::nonterminal("C"), Symbol::nonterminal("C")], 0),
                Production::new("C", vec![Symbol::terminal("c"), Symbol::nonterminal("C")], 1),
                Production::new("C", vec![Symbol::terminal("d")], 2),
            ],
            first_set,
        );
        let automaton = build_automaton(&grammar).unwrap();
        build_tables(&automaton, &grammar).unwrap();
        // The textbook LR(1) automaton for this grammar has 10 states: a
        // grammar with genuinely context-independent lookahead would
        // collapse to fewer, so this is a (weak but direct) check that
        // per-context lookahead was actually computed rather than merged.
        assert_eq!(automaton.states.len(), 10);
    }
}
