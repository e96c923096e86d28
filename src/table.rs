//! ACTION/GOTO table construction from a built automaton.
//!
//! The table *types* (`Action`, `ActionTable`, `GotoTable`) live in the
//! sibling `lr1_runtime` crate alongside the driver that consumes them, so
//! that crate never needs to depend back on this one just to read a cell.
//! This module only builds those tables and reports conflicts, never
//! silently resolving via precedence: inserting a second, different action
//! into an already-occupied cell is an error.

use lr1_runtime::{Action, ActionTable, GotoTable};

use crate::automaton::Automaton;
use crate::error::ConflictError;
use crate::grammar::Grammar;
use crate::symbol::{Symbol, END_MARKER};

fn insert_action(
    table: &mut ActionTable,
    state: usize,
    terminal: &str,
    action: Action,
) -> Result<(), ConflictError> {
    table
        .try_insert(state, terminal, action)
        .map_err(|existing| conflict_error(state, terminal, existing, action))
}

fn conflict_error(state: usize, terminal: &str, existing: Action, incoming: Action) -> ConflictError {
    let is_reduce = |a: Action| matches!(a, Action::Reduce(_));
    if is_reduce(existing) && is_reduce(incoming) {
        ConflictError::ReduceReduce {
            state,
            terminal: terminal.to_string(),
            existing,
            incoming,
        }
    } else {
        ConflictError::ShiftReduce {
            state,
            terminal: terminal.to_string(),
            existing,
            incoming,
        }
    }
}

/// Translates an automaton into ACTION and GOTO tables. Every shift comes
/// straight from a state's terminal transitions; every reduce and the
/// single accept come from each state's reducible items.
pub fn build_tables(automaton: &Automaton, grammar: &Grammar) -> Result<(ActionTable, GotoTable), ConflictError> {
    let mut action_table = ActionTable::default();
    let mut goto_table = GotoTable::default();

    for (state_index, state) in automaton.states.iter().enumerate() {
        for (symbol, target) in &state.transitions {
            match symbol {
                Symbol::Terminal(name) => {
                    insert_action(&mut action_table, state_index, name, Action::Shift(*target))?;
                }
                Symbol::Nonterminal(name) => {
                    goto_table.insert(state_index, name, *target);
                }
            }
        }

        for (key, lookaheads) in &state.items {
            if !key.is_reducible(grammar, &automaton.augmented_production) {
                continue;
            }
            let is_augmented = key.left(grammar, &automaton.augmented_production) == automaton.augmented_production.left;
            for terminal in lookaheads {
                if is_augmented {
                    insert_action(&mut action_table, state_index, END_MARKER, Action::Accept)?;
                } else {
                    insert_action(&mut action_table, state_index, terminal, Action::Reduce(key.production))?;
                }
            }
        }
    }

    Ok((action_table, goto_table))
}

/// Returns true iff every shiftable item in every state has a defined
/// ACTION entry for its shift terminal — the "Coverage" testable property.
pub fn all_shifts_covered(automaton: &Automaton, action_table: &ActionTable) -> bool {
    for (state_index, state) in automaton.states.iter().enumerate() {
        for symbol in state.transitions.keys() {
            if let Symbol::Terminal(name) = symbol {
                if action_table.get(state_index, name).is_none() {
                    return false;
                }
            }
        }
    }
    true
}
