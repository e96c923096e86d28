//! Error kinds for the two phases that can fail before a single token is
//! parsed: building the automaton, and building the tables from it. Kept as
//! two distinct types, rather than one grab-bag enum, so a configuration
//! mistake can never be confused with a genuine grammar ambiguity.

use thiserror::Error;

use lr1_runtime::Action;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("symbol `{0}` is used in a production but is not declared as a terminal or nonterminal")]
    UndeclaredSymbol(String),

    #[error("nonterminal `{0}` has no FIRST set entry")]
    MissingFirstSet(String),

    #[error("`{0}` is declared as both a terminal and a nonterminal")]
    AmbiguousDeclaration(String),

    #[error("start symbol `{0}` is not a declared nonterminal")]
    UnknownStartSymbol(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConflictError {
    #[error("shift/reduce conflict in state {state} on `{terminal}`: {existing:?} vs {incoming:?}")]
    ShiftReduce {
        state: usize,
        terminal: String,
        existing: Action,
        incoming: Action,
    },
    #[error("reduce/reduce conflict in state {state} on `{terminal}`: {existing:?} vs {incoming:?}")]
    ReduceReduce {
        state: usize,
        terminal: String,
        existing: Action,
        incoming: Action,
    },
}

