use std::collections::HashSet;

use super::grammar::{Symbol, END_MARK_INDEX, EPSILON_INDEX};
use crate::Grammar;

/// Nullability, FIRST, and FOLLOW for every symbol of one grammar.
///
/// Computed once by [`Grammar::nullable_first_follow`] and immutable
/// afterwards; recomputing from the same grammar yields identical sets.
/// All three vectors are indexed by symbol index. FIRST and FOLLOW hold
/// terminal indices only: epsilon is never a set member, derivability of
/// the empty string is the `nullable` flag.
#[derive(Debug, Clone)]
pub struct NullableFirstFollow {
    pub nullable: Vec<bool>,
    pub first: Vec<HashSet<usize>>,
    pub follow: Vec<HashSet<usize>>,
}

impl Grammar {
    /// Runs the three fixed-point passes. Termination is guaranteed:
    /// nullability flags only flip false to true and the sets only grow,
    /// over a finite symbol universe.
    pub fn nullable_first_follow(&self) -> NullableFirstFollow {
        let mut nff = NullableFirstFollow {
            nullable: vec![false; self.symbols.len()],
            first: vec![HashSet::new(); self.symbols.len()],
            follow: vec![HashSet::new(); self.symbols.len()],
        };
        nff.nullable[EPSILON_INDEX] = true;

        nff.compute_nullable(self);
        nff.compute_first(self);
        nff.compute_follow(self);

        nff
    }
}

impl NullableFirstFollow {
    /// FIRST of a symbol sequence: walk left to right, collecting each
    /// symbol's contribution, and stop at the first non-nullable symbol.
    /// The second return value is true when the walk consumed the whole
    /// sequence, i.e. the sequence itself is nullable.
    pub fn first_of_sequence(&self, grammar: &Grammar, sequence: &[usize]) -> (HashSet<usize>, bool) {
        let mut first = HashSet::new();
        for &idx in sequence {
            match &grammar.symbols[idx] {
                Symbol::Terminal(_) => {
                    first.insert(idx);
                    return (first, false);
                }
                Symbol::NonTerminal(_) => {
                    first.extend(self.first[idx].iter().cloned());
                    if !self.nullable[idx] {
                        return (first, false);
                    }
                }
            }
        }
        (first, true)
    }

    fn compute_nullable(&mut self, grammar: &Grammar) {
        let mut changed = true;
        while changed {
            changed = false;
            for nt in grammar.non_terminal_iter() {
                if self.nullable[nt.index] {
                    continue;
                }
                let nullable = nt
                    .productions
                    .iter()
                    .any(|production| production.iter().all(|&s| self.nullable[s]));
                if nullable {
                    self.nullable[nt.index] = true;
                    changed = true;
                }
            }
        }
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        let mut changed = true;
        while changed {
            changed = false;
            for nt in grammar.non_terminal_iter() {
                let mut additions = HashSet::new();
                for production in &nt.productions {
                    let (first, _) = self.first_of_sequence(grammar, production);
                    additions.extend(first);
                }
                let before = self.first[nt.index].len();
                self.first[nt.index].extend(additions);
                if self.first[nt.index].len() != before {
                    changed = true;
                }
            }
        }
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        if let Some(start) = grammar.start_symbol {
            self.follow[start].insert(END_MARK_INDEX);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for left in grammar.non_terminal_iter() {
                for production in &left.productions {
                    for (i, &s) in production.iter().enumerate() {
                        if s == EPSILON_INDEX || grammar.symbols[s].is_terminal() {
                            continue;
                        }
                        let rest = &production[i + 1..];
                        let (mut additions, rest_nullable) = self.first_of_sequence(grammar, rest);
                        if rest_nullable {
                            additions.extend(self.follow[left.index].iter().cloned());
                        }
                        let before = self.follow[s].len();
                        self.follow[s].extend(additions);
                        if self.follow[s].len() != before {
                            changed = true;
                        }
                    }
                }
            }
        }
    }
}
