//! Table-driven LR(1) shift/reduce recognizer.
//!
//! Unlike a generated parser with one hand-written `match` arm per state,
//! this driver treats the ACTION/GOTO tables as data: `Driver::parse` is
//! one loop over a state stack and a symbol stack, consulting the tables
//! at every step. There is no error recovery — an undefined ACTION cell
//! halts the parse immediately and reports where it happened.

use std::fmt::{Debug, Display};
use std::io::Write;

use log::debug;
use thiserror::Error;

pub mod table;

pub use table::{Action, ActionTable, GotoTable, TableFormatError};

use tokenstream::{Location, Token, TokenStream};

/// How a token's kind and lexeme map onto a grammar terminal name.
pub trait TerminalOf<T: Debug + Display + Clone + Eq> {
    fn terminal_of(&self, token: &Token<T>) -> String;
}

/// A `TerminalOf` that always uses the token's `kind`, for callers whose
/// lexer already classifies every token (including punctuation) uniquely.
pub struct ByKind;

impl<T: Debug + Display + Clone + Eq> TerminalOf<T> for ByKind {
    fn terminal_of(&self, token: &Token<T>) -> String {
        token.kind().to_string()
    }
}

/// A `TerminalOf` that uses the token's `kind` for the names listed in
/// `keyed_kinds` (identifier-class, literal-class) and the raw lexeme for
/// everything else — the default lexer/parser symbol mapping.
pub struct ByLexemeUnless {
    pub keyed_kinds: Vec<String>,
}

impl<T: Debug + Display + Clone + Eq> TerminalOf<T> for ByLexemeUnless {
    fn terminal_of(&self, token: &Token<T>) -> String {
        let kind = token.kind().to_string();
        if self.keyed_kinds.contains(&kind) {
            kind
        } else {
            token.lexeme().to_string()
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error at {position}: {reason}")]
pub struct ParseError {
    pub position: Location,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub steps: u32,
}

/// Mirrors the reference driver's `ParseStack`: a stack of `(state,
/// symbol-name)` pairs, with no attribute stack since semantic-action
/// evaluation is out of scope here.
struct ParseStack {
    states: Vec<usize>,
    symbols: Vec<String>,
}

impl ParseStack {
    fn new() -> Self {
        Self {
            states: vec![0],
            symbols: vec!["#".to_string()],
        }
    }

    fn current_state(&self) -> usize {
        *self.states.last().expect("state stack is never empty")
    }

    fn pop_n(&mut self, n: usize) {
        let new_len = self.states.len() - n;
        self.states.truncate(new_len);
        self.symbols.truncate(new_len);
    }

    fn push(&mut self, symbol: String, state: usize) {
        self.symbols.push(symbol);
        self.states.push(state);
    }
}

/// Holds the tables and the production shapes (`left`, `right.len()`)
/// needed to pop the right number of stack entries on a reduce. Grammar
/// productions stay on the table side; the driver only needs
/// `(left, arity)` per production index.
pub struct Driver<'a> {
    action_table: &'a ActionTable,
    goto_table: &'a GotoTable,
    productions: &'a [(String, usize)],
}

impl<'a> Driver<'a> {
    pub fn new(
        action_table: &'a ActionTable,
        goto_table: &'a GotoTable,
        productions: &'a [(String, usize)],
    ) -> Self {
        Self {
            action_table,
            goto_table,
            productions,
        }
    }

    /// Runs the tables over `tokens`, writing one line per step to `trace`
    /// if given. Returns the step count on `Accept`, or a `ParseError`
    /// naming the token position where no ACTION was defined.
    pub fn parse<T: Debug + Display + Clone + Eq>(
        &self,
        tokens: &mut TokenStream<T>,
        terminal_of: &dyn TerminalOf<T>,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<ParseOutcome, ParseError> {
        let mut stack = ParseStack::new();
        let mut steps = 0u32;

        loop {
            let (terminal, position) = match tokens.front() {
                Some(token) => (terminal_of.terminal_of(token), token.location().clone()),
                None => ("#".to_string(), tokens.end_location()),
            };

            let state = stack.current_state();
            let action = self.action_table.get(state, &terminal);
            if let Some(sink) = trace.as_deref_mut() {
                let _ = writeln!(sink, "state {} read {:?} -> {:?}", state, terminal, action);
            }

            match action {
                Some(Action::Shift(target)) => {
                    stack.push(terminal.clone(), target);
                    tokens.advance();
                    debug!("shift {} -> state {}", terminal, target);
                }
                Some(Action::Reduce(production_index)) => {
                    let (left, arity) = &self.productions[production_index as usize];
                    stack.pop_n(*arity);
                    let goto_state = self
                        .goto_table
                        .get(stack.current_state(), left)
                        .expect("table builder guarantees a GOTO entry for every reachable reduce");
                    stack.push(left.clone(), goto_state);
                    debug!("reduce by production {} ({} -> state {})", production_index, left, goto_state);
                }
                Some(Action::Accept) => {
                    if let Some(sink) = trace.as_deref_mut() {
                        let _ = writeln!(sink, "accept after {} steps", steps + 1);
                    }
                    return Ok(ParseOutcome { steps: steps + 1 });
                }
                None => {
                    let reason = format!("no action for `{}` in state {}", terminal, state);
                    if let Some(sink) = trace.as_deref_mut() {
                        let _ = writeln!(sink, "error at {}: {}", position, reason);
                    }
                    return Err(ParseError { position, reason });
                }
            }
            steps += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr1gen::{build_automaton, build_tables, Grammar, Production, Symbol};
    use std::collections::BTreeMap;
    use tokenstream::{Location, Token, TokenStream};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        A,
    }

    impl Display for Kind {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a")
        }
    }

    fn single_a_grammar() -> Grammar {
        let mut first_set = BTreeMap::new();
        first_set.insert("S".to_string(), ["a".to_string()].into_iter().collect());
        Grammar::new(
            "S",
            ["a".to_string()].into_iter().collect(),
            ["S".to_string()].into_iter().collect(),
            vec![Production::new("S", vec![Symbol::terminal("a")], 0)],
            first_set,
        )
    }

    #[test]
    fn single_terminal_grammar_is_accepted() {
        let grammar = single_a_grammar();
        let automaton = build_automaton(&grammar).unwrap();
        let (action_table, goto_table) = build_tables(&automaton, &grammar).unwrap();
        let productions = vec![("S".to_string(), 1usize)];
        let driver = Driver::new(&action_table, &goto_table, &productions);

        let loc = Location::new("test", 1, 1);
        let mut stream = TokenStream::new(vec![Token::new(Kind::A, "a", loc)]);
        let outcome = driver.parse(&mut stream, &ByKind, None).unwrap();
        assert_eq!(outcome.steps, 3); // shift a, reduce S->a, accept
    }

    #[test]
    fn undefined_action_halts_with_position() {
        let grammar = single_a_grammar();
        let automaton = build_automaton(&grammar).unwrap();
        let (action_table, goto_table) = build_tables(&automaton, &grammar).unwrap();
        let productions = vec![("S".to_string(), 1usize)];
        let driver = Driver::new(&action_table, &goto_table, &productions);

        let mut stream: TokenStream<Kind> = TokenStream::new(vec![]);
        let err = driver.parse(&mut stream, &ByKind, None).unwrap_err();
        assert!(err.reason.contains("no action"));
    }

    /// The default lexer/parser symbol mapping: an identifier- or
    /// literal-class token contributes its `kind` as the terminal name (so
    /// every identifier is the single terminal `id`, not one terminal per
    /// spelling), while every other token contributes its own lexeme (so
    /// punctuation and keywords are each their own terminal).
    #[test]
    fn by_lexeme_unless_uses_kind_only_for_keyed_kinds() {
        let terminal_of = ByLexemeUnless {
            keyed_kinds: vec!["id".to_string(), "num".to_string()],
        };
        let loc = Location::new("test", 1, 1);

        let identifier = Token::new("id".to_string(), "total_count", loc.clone());
        assert_eq!(terminal_of.terminal_of(&identifier), "id");

        let number = Token::new("num".to_string(), "42", loc.clone());
        assert_eq!(terminal_of.terminal_of(&number), "num");

        let keyword = Token::new("kw".to_string(), "return", loc.clone());
        assert_eq!(terminal_of.terminal_of(&keyword), "return");

        let punctuation = Token::new("punct".to_string(), "+", loc);
        assert_eq!(terminal_of.terminal_of(&punctuation), "+");
    }
}
