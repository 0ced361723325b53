use std::fmt;

use serde::Serialize;

use super::error::{GrammarError, ParseError};
use super::grammar::{Symbol, END_MARK_INDEX, EPSILON_INDEX};
use super::ll1_table::LL1Table;
use crate::Grammar;

/// One token of the input sequence, as produced by an external lexer.
/// `kind` is matched against terminal names; `value` and `line` are
/// carried through for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub value: Option<String>,
    pub line: Option<usize>,
}

impl Token {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            line: None,
        }
    }

    pub fn with_value(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "{}", self.kind),
        }?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

/// One `non-terminal -> production` application in a leftmost derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    pub non_terminal: String,
    pub production: Vec<String>,
}

/// The recorded trace of an accepted parse, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub steps: Vec<DerivationStep>,
}

impl Derivation {
    pub fn to_plaintext(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("{} -> {}", step.non_terminal, step.production.join(" ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table-driven predictive parser. Borrows the grammar and owns the
/// conflict-free table; one parser may run any number of independent
/// parses, each with its own transient stack.
pub struct LL1Parser<'g> {
    grammar: &'g Grammar,
    table: LL1Table,
    start: usize,
}

impl<'g> LL1Parser<'g> {
    /// Derives the analysis artifacts and builds the table. Fails if the
    /// grammar has no start symbol, is left-recursive, or is not LL(1).
    pub fn new(grammar: &'g Grammar) -> Result<Self, GrammarError> {
        let start = grammar.start_symbol.ok_or(GrammarError::NoStartSymbol)?;
        let nff = grammar.nullable_first_follow();
        let table = grammar.ll1_table(&nff)?;
        Ok(Self {
            grammar,
            table,
            start,
        })
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    /// Runs the stack machine over a token sequence, pulling tokens
    /// strictly in order with a single token of lookahead. Returns the
    /// derivation trace on accept.
    pub fn parse<I>(&self, tokens: I) -> Result<Derivation, ParseError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut tokens = tokens.into_iter();
        let mut lookahead = tokens.next();

        let mut stack: Vec<usize> = vec![END_MARK_INDEX, self.start];
        let mut steps: Vec<DerivationStep> = Vec::new();

        while let Some(top) = stack.pop() {
            if top == END_MARK_INDEX {
                match lookahead.take() {
                    Some(token) => return Err(ParseError::TrailingInput { token }),
                    None => continue,
                }
            }

            match &self.grammar.symbols[top] {
                Symbol::Terminal(name) => match lookahead.take() {
                    Some(token) if token.kind == *name => {
                        lookahead = tokens.next();
                    }
                    Some(token) => {
                        return Err(ParseError::UnexpectedToken {
                            non_terminal: None,
                            token,
                            expected: vec![name.clone()],
                        });
                    }
                    None => {
                        return Err(ParseError::PrematureEnd {
                            non_terminal: None,
                            expected: vec![name.clone()],
                        });
                    }
                },
                Symbol::NonTerminal(nt) => {
                    // Exhausted input is looked up as the end marker, so
                    // epsilon productions selected via FOLLOW still fire.
                    let lookahead_idx = match &lookahead {
                        Some(token) => self.grammar.get_symbol_index(&token.kind),
                        None => Some(END_MARK_INDEX),
                    };
                    let ordinal = lookahead_idx.and_then(|t| self.table.production(top, t));
                    let Some(ordinal) = ordinal else {
                        let expected = self.table.expected_kinds(self.grammar, top);
                        return match lookahead.take() {
                            Some(token) => Err(ParseError::UnexpectedToken {
                                non_terminal: Some(nt.name.clone()),
                                token,
                                expected,
                            }),
                            None => Err(ParseError::PrematureEnd {
                                non_terminal: Some(nt.name.clone()),
                                expected,
                            }),
                        };
                    };

                    let production = &nt.productions[ordinal];
                    steps.push(DerivationStep {
                        non_terminal: nt.name.clone(),
                        production: production
                            .iter()
                            .map(|&s| self.grammar.get_symbol_name(s).to_string())
                            .collect(),
                    });

                    // Push the body reversed so its first symbol is next
                    // off the stack; an epsilon body pushes nothing.
                    if production.first() != Some(&EPSILON_INDEX) {
                        for &s in production.iter().rev() {
                            stack.push(s);
                        }
                    }
                }
            }
        }

        match lookahead {
            Some(token) => Err(ParseError::TrailingInput { token }),
            None => Ok(Derivation { steps }),
        }
    }
}
