use std::fmt;

use thiserror::Error;

use super::ll1_parser::Token;

/// A defect detected while constructing a grammar or deriving its LL(1)
/// artifacts. Any of these aborts the build; no partial table is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("non-terminal '{0}' is declared more than once")]
    DuplicateNonTerminal(String),
    #[error("non-terminal '{0}' has no productions")]
    NoProductions(String),
    #[error("non-terminal '{0}' has an empty production body")]
    EmptyProduction(String),
    #[error("in a production of '{0}': ϵ must be the only symbol of its body")]
    EpsilonNotAlone(String),
    #[error("'{0}' is a reserved symbol")]
    ReservedSymbol(String),
    #[error("'{0}' is not a non-terminal of this grammar")]
    NotANonTerminal(String),
    #[error("grammar has no start symbol")]
    NoStartSymbol,
    #[error("grammar is left-recursive: {}", .0.join(" -> "))]
    LeftRecursive(Vec<String>),
    #[error("grammar is not LL(1):\n{}", list_conflicts(.0))]
    NotLL1(Vec<LL1Conflict>),
}

/// Two or more productions of one non-terminal claim the same lookahead
/// terminal. `productions` holds every competing body together with its
/// declaration ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Conflict {
    pub non_terminal: String,
    pub terminal: String,
    pub productions: Vec<(usize, Vec<String>)>,
}

impl fmt::Display for LL1Conflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let candidates = self
            .productions
            .iter()
            .map(|(ordinal, body)| {
                format!("#{} {} -> {}", ordinal, self.non_terminal, body.join(" "))
            })
            .collect::<Vec<_>>()
            .join(" vs ");
        write!(
            f,
            "conflict at ({}, '{}'): {}",
            self.non_terminal, self.terminal, candidates
        )
    }
}

fn list_conflicts(conflicts: &[LL1Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A runtime parse failure. Local to one parse invocation; the analysis
/// artifacts stay valid for subsequent parses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected token '{}'{}{}", .token, in_non_terminal(.non_terminal), expecting(.expected))]
    UnexpectedToken {
        /// The non-terminal being expanded when the lookup failed, or
        /// `None` for a plain terminal mismatch.
        non_terminal: Option<String>,
        token: Token,
        /// Token kinds that would have been accepted here.
        expected: Vec<String>,
    },
    #[error("input ended prematurely{}{}", in_non_terminal(.non_terminal), expecting(.expected))]
    PrematureEnd {
        non_terminal: Option<String>,
        expected: Vec<String>,
    },
    #[error("trailing input after accepted sentence: '{}'", .token)]
    TrailingInput { token: Token },
}

fn in_non_terminal(non_terminal: &Option<String>) -> String {
    match non_terminal {
        Some(name) => format!(" while expanding '{}'", name),
        None => String::new(),
    }
}

fn expecting(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!("; expected one of: {}", expected.join(", "))
    }
}
