use std::collections::{BTreeMap, HashMap};

use super::error::{GrammarError, LL1Conflict};
use super::nullable_first_follow::NullableFirstFollow;
use crate::Grammar;

/// A conflict-free LL(1) parse table: (non-terminal index, lookahead
/// terminal index) to the ordinal of the production to apply. Immutable
/// once built; shared read-only across any number of parses.
#[derive(Debug, Clone)]
pub struct LL1Table {
    cells: HashMap<(usize, usize), usize>,
}

impl LL1Table {
    /// The production ordinal to apply for `non_terminal` on lookahead
    /// `terminal`, if that cell exists.
    pub fn production(&self, non_terminal: usize, terminal: usize) -> Option<usize> {
        self.cells.get(&(non_terminal, terminal)).cloned()
    }

    /// Terminal names with an entry in the row of `non_terminal`, sorted.
    /// This is the set of lookaheads the parser would have accepted.
    pub fn expected_kinds(&self, grammar: &Grammar, non_terminal: usize) -> Vec<String> {
        let mut kinds: Vec<String> = self
            .cells
            .keys()
            .filter(|(nt, _)| *nt == non_terminal)
            .map(|(_, t)| grammar.get_symbol_name(*t).to_string())
            .collect();
        kinds.sort();
        kinds
    }
}

impl Grammar {
    /// Collects every candidate production per (non-terminal, terminal)
    /// cell. A production is a candidate under each terminal of the FIRST
    /// of its body, and additionally under each terminal of FOLLOW(left)
    /// when the body is fully nullable; the `[ϵ]` body has an empty FIRST
    /// and is nullable, so it lands on the FOLLOW cells alone.
    pub fn ll1_candidates(
        &self,
        nff: &NullableFirstFollow,
    ) -> BTreeMap<(usize, usize), Vec<usize>> {
        let mut candidates: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();

        for nt in self.non_terminal_iter() {
            for (ordinal, production) in nt.productions.iter().enumerate() {
                let (first, body_nullable) = nff.first_of_sequence(self, production);
                let mut terminals: Vec<usize> = first.into_iter().collect();
                if body_nullable {
                    terminals.extend(nff.follow[nt.index].iter().cloned());
                }
                for t in terminals {
                    let cell = candidates.entry((nt.index, t)).or_default();
                    if !cell.contains(&ordinal) {
                        cell.push(ordinal);
                    }
                }
            }
        }

        candidates
    }

    /// Builds the parse table, or reports why the grammar cannot drive a
    /// predictive parser: a left-recursion cycle, or the complete list of
    /// conflicting cells (not just the first) so a caller can repair the
    /// grammar in one pass.
    pub fn ll1_table(&self, nff: &NullableFirstFollow) -> Result<LL1Table, GrammarError> {
        if let Some(cycle) = self.left_recursion_cycle(nff) {
            return Err(GrammarError::LeftRecursive(cycle));
        }

        let candidates = self.ll1_candidates(nff);

        let mut conflicts: Vec<LL1Conflict> = Vec::new();
        for (&(nt_idx, t_idx), ordinals) in &candidates {
            if ordinals.len() < 2 {
                continue;
            }
            let Some(nt) = self.symbols[nt_idx].non_terminal() else {
                continue;
            };
            let productions = ordinals
                .iter()
                .map(|&ordinal| {
                    let body = nt.productions[ordinal]
                        .iter()
                        .map(|&s| self.get_symbol_name(s).to_string())
                        .collect();
                    (ordinal, body)
                })
                .collect();
            conflicts.push(LL1Conflict {
                non_terminal: nt.name.clone(),
                terminal: self.get_symbol_name(t_idx).to_string(),
                productions,
            });
        }

        if !conflicts.is_empty() {
            return Err(GrammarError::NotLL1(conflicts));
        }

        let cells = candidates
            .into_iter()
            .filter_map(|(key, ordinals)| ordinals.first().map(|&ordinal| (key, ordinal)))
            .collect();

        Ok(LL1Table { cells })
    }
}
