//! ACTION and GOTO table types, plus the tab-separated text format they're
//! persisted in. Lives alongside the driver rather than the table
//! *builder* (in the sibling `lr1gen` crate) because the driver and the
//! on-disk format are the things that actually need to agree on this
//! shape; the builder only ever produces values of these types and reads
//! them back through this same module.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(u32),
    Accept,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableFormatError {
    #[error("malformed table line: `{0}`")]
    MalformedLine(String),

    #[error("unrecognised action content: `{0}`")]
    UnrecognisedAction(String),

    #[error("invalid state number in `{0}`")]
    InvalidState(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTable {
    entries: BTreeMap<(usize, String), Action>,
}

impl ActionTable {
    pub fn get(&self, state: usize, terminal: &str) -> Option<Action> {
        self.entries.get(&(state, terminal.to_string())).copied()
    }

    /// Inserts `action` at `(state, terminal)`. Returns the action already
    /// there if it differs from `action`, so the caller can turn that into
    /// a shift/reduce or reduce/reduce conflict with its own state/symbol
    /// naming rather than this crate guessing at it.
    pub fn try_insert(&mut self, state: usize, terminal: &str, action: Action) -> Result<(), Action> {
        let key = (state, terminal.to_string());
        if let Some(existing) = self.entries.get(&key) {
            if *existing != action {
                return Err(*existing);
            }
            return Ok(());
        }
        self.entries.insert(key, action);
        Ok(())
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for ((state, symbol), action) in &self.entries {
            let content = match action {
                Action::Shift(target) => format!("s{}", target),
                Action::Reduce(production) => format!("r{}", production + 1),
                Action::Accept => "acc".to_string(),
            };
            writeln!(out, "{}\t{}\t{}", state, symbol, content)?;
        }
        Ok(())
    }

    pub fn read_from<R: BufRead>(input: &mut R) -> Result<Self, TableFormatError> {
        let mut table = ActionTable::default();
        for line in input.lines() {
            let line = line.map_err(|e| TableFormatError::MalformedLine(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(TableFormatError::MalformedLine(line));
            }
            let state: usize = fields[0]
                .parse()
                .map_err(|_| TableFormatError::InvalidState(line.clone()))?;
            let symbol = fields[1].to_string();
            let action = parse_action(fields[2])?;
            table.entries.insert((state, symbol), action);
        }
        Ok(table)
    }
}

fn parse_action(content: &str) -> Result<Action, TableFormatError> {
    if content == "acc" {
        return Ok(Action::Accept);
    }
    let (tag, rest) = content.split_at(1);
    let n: u32 = rest
        .parse()
        .map_err(|_| TableFormatError::UnrecognisedAction(content.to_string()))?;
    match tag {
        "s" => Ok(Action::Shift(n as usize)),
        "r" => Ok(Action::Reduce(n - 1)),
        _ => Err(TableFormatError::UnrecognisedAction(content.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GotoTable {
    entries: BTreeMap<(usize, String), usize>,
}

impl GotoTable {
    pub fn get(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.entries.get(&(state, nonterminal.to_string())).copied()
    }

    pub fn insert(&mut self, state: usize, nonterminal: &str, target: usize) {
        self.entries.insert((state, nonterminal.to_string()), target);
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for ((state, symbol), target) in &self.entries {
            writeln!(out, "{}\t{}\t{}", state, symbol, target)?;
        }
        Ok(())
    }

    pub fn read_from<R: BufRead>(input: &mut R) -> Result<Self, TableFormatError> {
        let mut table = GotoTable::default();
        for line in input.lines() {
            let line = line.map_err(|e| TableFormatError::MalformedLine(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(TableFormatError::MalformedLine(line));
            }
            let state: usize = fields[0]
                .parse()
                .map_err(|_| TableFormatError::InvalidState(line.clone()))?;
            let target: usize = fields[2]
                .parse()
                .map_err(|_| TableFormatError::InvalidState(line.clone()))?;
            table.entries.insert((state, fields[1].to_string()), target);
        }
        Ok(table)
    }
}
