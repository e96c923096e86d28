//! The grammar value the rest of this crate is built from: terminals,
//! nonterminals, productions, the start symbol, and a precomputed FIRST
//! set. Loading a grammar from a DSL source file is somebody else's
//! concern; by the time a `Grammar` reaches the automaton builder it is
//! already a closed, internally-consistent value (or `validate` says why
//! not).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::symbol::{Symbol, EPSILON};

/// Reserved production index for the implicit augmented production
/// `S' -> S`. User productions are always numbered `0..productions.len()`.
pub const AUGMENTED_PRODUCTION: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub left: String,
    pub right: Vec<Symbol>,
    pub index: u32,
}

impl Production {
    pub fn new(left: &str, right: Vec<Symbol>, index: u32) -> Self {
        Self {
            left: left.to_string(),
            right,
            index,
        }
    }

    /// The right-hand side as the item machinery should see it: a
    /// production written `A -> $` (a bare epsilon terminal) is the same
    /// production as `A -> ` (an empty `right`) as far as items, closure,
    /// GOTO and reduce are concerned, so both collapse to the same empty
    /// slice here rather than needing two code paths downstream.
    pub fn effective_right(&self) -> &[Symbol] {
        if self.right == [Symbol::terminal(EPSILON)] {
            &[]
        } else {
            &self.right
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grammar {
    pub start: String,
    pub terminals: BTreeSet<String>,
    pub nonterminals: BTreeSet<String>,
    pub productions: Vec<Production>,
    pub first_set: BTreeMap<String, BTreeSet<String>>,
}

impl Grammar {
    pub fn new(
        start: &str,
        terminals: BTreeSet<String>,
        nonterminals: BTreeSet<String>,
        productions: Vec<Production>,
        first_set: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        Self {
            start: start.to_string(),
            terminals,
            nonterminals,
            productions,
            first_set,
        }
    }

    /// Checks the invariants spec'd for a `Grammar` value: terminals and
    /// nonterminals are disjoint, every right-hand-side symbol is declared,
    /// the start symbol is a declared nonterminal, and every nonterminal
    /// has a FIRST set entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.terminals.intersection(&self.nonterminals) {
            return Err(ConfigError::AmbiguousDeclaration(name.clone()));
        }
        if !self.nonterminals.contains(&self.start) {
            return Err(ConfigError::UnknownStartSymbol(self.start.clone()));
        }
        for production in &self.productions {
            if !self.nonterminals.contains(&production.left) {
                return Err(ConfigError::UndeclaredSymbol(production.left.clone()));
            }
            for symbol in &production.right {
                let known = match symbol {
                    Symbol::Terminal(name) => name == EPSILON || self.terminals.contains(name),
                    Symbol::Nonterminal(name) => self.nonterminals.contains(name),
                };
                if !known {
                    return Err(ConfigError::UndeclaredSymbol(symbol.name().to_string()));
                }
            }
        }
        for nonterminal in &self.nonterminals {
            if !self.first_set.contains_key(nonterminal) {
                return Err(ConfigError::MissingFirstSet(nonterminal.clone()));
            }
        }
        Ok(())
    }

    /// FIRST of a suffix of symbols, with the inherited lookahead folded
    /// in when the whole suffix is nullable. Stops scanning at the first
    /// non-nullable symbol, per the design note that the epsilon marker
    /// must never leak into a lookahead set.
    pub fn first_of_suffix(&self, suffix: &[Symbol], inherited: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        let mut all_nullable = true;
        for symbol in suffix {
            match symbol {
                Symbol::Terminal(name) => {
                    result.insert(name.clone());
                    all_nullable = false;
                    break;
                }
                Symbol::Nonterminal(name) => {
                    let first = self.first_set.get(name).cloned().unwrap_or_default();
                    for terminal in first.iter().filter(|t| t.as_str() != EPSILON) {
                        result.insert(terminal.clone());
                    }
                    if !first.contains(EPSILON) {
                        all_nullable = false;
                        break;
                    }
                }
            }
        }
        if all_nullable {
            result.insert(inherited.to_string());
        }
        result
    }
}
