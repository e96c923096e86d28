//! Builds the canonical collection of LR(1) item sets: the automaton that
//! recognises viable prefixes of the grammar.

use std::collections::BTreeMap;

use log::debug;

use crate::error::ConfigError;
use crate::grammar::{Grammar, Production, AUGMENTED_PRODUCTION};
use crate::item::{closure, goto_kernel, initial_item_set, ItemSet};
use crate::symbol::Symbol;

#[derive(Debug, Clone)]
pub struct State {
    pub items: ItemSet,
    pub transitions: BTreeMap<Symbol, usize>,
}

#[derive(Debug, Clone)]
pub struct Automaton {
    pub states: Vec<State>,
    pub augmented_production: Production,
}

impl Automaton {
    pub fn state(&self, index: usize) -> &State {
        &self.states[index]
    }
}

/// All symbols a grammar mentions, terminals first then nonterminals, in a
/// stable order so the worklist below processes transitions deterministically.
fn all_symbols(grammar: &Grammar) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = grammar.terminals.iter().map(|t| Symbol::terminal(t)).collect();
    symbols.extend(grammar.nonterminals.iter().map(|n| Symbol::nonterminal(n)));
    symbols
}

/// Builds the automaton by repeatedly computing GOTO on every known state
/// for every grammar symbol, adding newly-discovered states to the
/// worklist, until no state produces a transition to an unseen item set.
pub fn build_automaton(grammar: &Grammar) -> Result<Automaton, ConfigError> {
    grammar.validate()?;

    let augmented_production = Production::new(
        &format!("{}'", grammar.start),
        vec![Symbol::nonterminal(&grammar.start)],
        AUGMENTED_PRODUCTION,
    );

    let symbols = all_symbols(grammar);
    let mut states: Vec<State> = vec![State {
        items: initial_item_set(grammar, &augmented_production),
        transitions: BTreeMap::new(),
    }];

    let mut worklist = vec![0usize];
    while let Some(index) = worklist.pop() {
        let item_set = states[index].items.clone();
        for symbol in &symbols {
            let kernel = goto_kernel(&item_set, symbol, grammar, &augmented_production);
            if kernel.is_empty() {
                continue;
            }
            let target_items = closure(kernel, grammar, &augmented_production);
            let target_index = match states.iter().position(|s| s.items == target_items) {
                Some(existing) => existing,
                None => {
                    states.push(State {
                        items: target_items,
                        transitions: BTreeMap::new(),
                    });
                    let new_index = states.len() - 1;
                    worklist.push(new_index);
                    new_index
                }
            };
            states[index].transitions.insert(symbol.clone(), target_index);
        }
    }

    debug!("automaton has {} states", states.len());
    Ok(Automaton {
        states,
        augmented_production,
    })
}
