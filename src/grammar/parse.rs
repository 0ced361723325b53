use super::error::GrammarError;
use crate::Grammar;

impl Grammar {
    /// Reads a grammar from its text form, one rule per line:
    ///
    /// ```text
    /// E  -> T E'
    /// E' -> + T E' | ϵ
    ///    | - T E'
    /// ```
    ///
    /// A line starting with `|` continues the previous left side. Every
    /// name that appears on a left side anywhere in the input is a
    /// non-terminal; all other names are terminals. The first left side
    /// is the start symbol.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(usize, usize, &str)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            let lineno = i + 1;
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::Syntax {
                    line: lineno,
                    message: "too many \"->\"".to_string(),
                });
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::Syntax {
                        line: lineno,
                        message: "empty left side".to_string(),
                    });
                }
                if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::Syntax {
                        line: lineno,
                        message: "left side contains whitespace".to_string(),
                    });
                }
                let idx = match g.get_symbol_index(left_str) {
                    Some(idx) if g.symbols[idx].is_terminal() || idx == super::grammar::EPSILON_INDEX => {
                        return Err(GrammarError::ReservedSymbol(left_str.to_string()));
                    }
                    Some(idx) => idx,
                    None => g.add_non_terminal(left_str),
                };
                (idx, parts[1].trim())
            } else {
                let trimmed = parts[0].trim();
                let Some(rest) = trimmed.strip_prefix('|') else {
                    return Err(GrammarError::Syntax {
                        line: lineno,
                        message: "cannot find left side".to_string(),
                    });
                };
                let Some(idx) = previous_left else {
                    return Err(GrammarError::Syntax {
                        line: lineno,
                        message: "'|' with no previous left side".to_string(),
                    });
                };
                (idx, rest.trim())
            };

            previous_left = Some(left);

            raw_productions.push((left, lineno, rights));
        }

        // Left sides are all registered by now, so forward references to
        // later-declared non-terminals resolve correctly.
        for (left, lineno, rights) in raw_productions {
            let left_name = g.get_symbol_name(left).to_string();
            for right in rights.split('|') {
                let body: Vec<&str> = right.split_whitespace().collect();
                let symbols = g.resolve_body(&left_name, &body).map_err(|e| match e {
                    GrammarError::EmptyProduction(_) => GrammarError::Syntax {
                        line: lineno,
                        message: format!("empty alternative for '{}'", left_name),
                    },
                    other => other,
                })?;
                g.add_production(left, symbols);
            }
        }

        let start = g.non_terminal_iter().next().map(|nt| nt.index);
        g.start_symbol = start;

        Ok(g)
    }
}
