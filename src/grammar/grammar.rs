use std::collections::HashMap;

use super::error::GrammarError;
use super::{END_MARK, EPSILON};

/// Index of the epsilon pseudo-symbol in every `Grammar`.
pub const EPSILON_INDEX: usize = 0;
/// Index of the end-of-input marker in every `Grammar`.
pub const END_MARK_INDEX: usize = 1;

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    /// Ordered production bodies; each body is a sequence of symbol
    /// indices, or exactly `[EPSILON_INDEX]`.
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(nt),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(nt),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// An immutable context-free grammar over interned symbols.
///
/// Symbols are stored in declaration order and referred to by index;
/// `symbols[EPSILON_INDEX]` is the epsilon pseudo-symbol and
/// `symbols[END_MARK_INDEX]` is the end-of-input marker `$`. The first
/// declared non-terminal is the start symbol unless one is set explicitly.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub start_symbol: Option<usize>,
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            start_symbol: None,
        };

        let e_idx = g.add_non_terminal(EPSILON);
        g.symbol_table.insert("ε".to_string(), e_idx);
        g.symbol_table.insert("epsilon".to_string(), e_idx);

        g.add_terminal(END_MARK.to_string());

        g
    }

    /// Builds a grammar from an ordered rule map. Keys are non-terminals;
    /// a body name resolves to a key, an epsilon alias, or a terminal.
    /// The first key becomes the start symbol.
    pub fn from_rules(rules: &[(&str, Vec<Vec<&str>>)]) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        for (left, _) in rules {
            match g.get_symbol_index(left) {
                Some(idx) if idx == EPSILON_INDEX || idx == END_MARK_INDEX => {
                    return Err(GrammarError::ReservedSymbol(left.to_string()));
                }
                Some(_) => {
                    return Err(GrammarError::DuplicateNonTerminal(left.to_string()));
                }
                None => {
                    g.add_non_terminal(left);
                }
            }
        }

        for (left, bodies) in rules {
            let left_idx = g.symbol_table[*left];
            if bodies.is_empty() {
                return Err(GrammarError::NoProductions(left.to_string()));
            }
            for body in bodies {
                let symbols = g.resolve_body(left, body)?;
                g.add_production(left_idx, symbols);
            }
        }

        let start = rules.first().map(|(left, _)| g.symbol_table[*left]);
        g.start_symbol = start;

        Ok(g)
    }

    /// Interns one production body, validating its structure.
    pub(super) fn resolve_body(
        &mut self,
        left: &str,
        body: &[&str],
    ) -> Result<Vec<usize>, GrammarError> {
        if body.is_empty() {
            return Err(GrammarError::EmptyProduction(left.to_string()));
        }
        let mut symbols = Vec::with_capacity(body.len());
        for name in body {
            if *name == END_MARK {
                return Err(GrammarError::ReservedSymbol(END_MARK.to_string()));
            }
            let idx = match self.get_symbol_index(name) {
                Some(idx) => idx,
                None => self.add_terminal(name.to_string()),
            };
            symbols.push(idx);
        }
        if symbols.contains(&EPSILON_INDEX) && symbols.len() > 1 {
            return Err(GrammarError::EpsilonNotAlone(left.to_string()));
        }
        Ok(symbols)
    }

    /// Overrides the default start symbol (the first declared non-terminal).
    pub fn set_start(&mut self, name: &str) -> Result<(), GrammarError> {
        match self.get_symbol_index(name) {
            Some(idx) if idx != EPSILON_INDEX && self.symbols[idx].non_terminal().is_some() => {
                self.start_symbol = Some(idx);
                Ok(())
            }
            _ => Err(GrammarError::NotANonTerminal(name.to_string())),
        }
    }

    /// All terminals in declaration order, `$` included.
    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Terminal(name) => Some(name),
            Symbol::NonTerminal(_) => None,
        })
    }

    /// All non-terminals in declaration order, epsilon excluded.
    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols
            .iter()
            .filter_map(|s| s.non_terminal())
            .filter(|nt| nt.index != EPSILON_INDEX)
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    pub fn add_production(&mut self, left: usize, right: Vec<usize>) {
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            nt.productions.push(right);
        }
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::NonTerminal(nt) => nt.name.as_str(),
            Symbol::Terminal(name) => name.as_str(),
        }
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    /// Appends primes to `name` until it no longer collides with an
    /// existing symbol.
    pub fn get_symbol_prime_name(&self, mut name: String) -> String {
        while self.symbol_table.contains_key(&name) {
            name.push('\'');
        }
        name
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
