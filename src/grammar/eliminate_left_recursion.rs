use std::collections::HashMap;

use super::grammar::{NonTerminal, EPSILON_INDEX};
use super::nullable_first_follow::NullableFirstFollow;
use crate::Grammar;

impl Grammar {
    /// Looks for a left-recursion cycle: a chain `N -> M -> ... -> N`
    /// where each step reaches a non-terminal through a nullable prefix
    /// of some production body. Such a grammar can never drive a
    /// predictive parser, so the table builder rejects it with the cycle
    /// returned here instead of an opaque conflict list.
    pub fn left_recursion_cycle(&self, nff: &NullableFirstFollow) -> Option<Vec<String>> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        fn visit(
            grammar: &Grammar,
            nff: &NullableFirstFollow,
            idx: usize,
            colors: &mut Vec<u8>,
            path: &mut Vec<usize>,
        ) -> Option<usize> {
            colors[idx] = GRAY;
            path.push(idx);
            if let Some(nt) = grammar.symbols[idx].non_terminal() {
                for production in &nt.productions {
                    for &s in production {
                        if s == EPSILON_INDEX {
                            continue;
                        }
                        if grammar.symbols[s].is_terminal() {
                            break;
                        }
                        match colors[s] {
                            GRAY => return Some(s),
                            WHITE => {
                                if let Some(found) = visit(grammar, nff, s, colors, path) {
                                    return Some(found);
                                }
                            }
                            _ => {}
                        }
                        if !nff.nullable[s] {
                            break;
                        }
                    }
                }
            }
            path.pop();
            colors[idx] = BLACK;
            None
        }

        let mut colors = vec![WHITE; self.symbols.len()];
        let mut path: Vec<usize> = Vec::new();
        for nt in self.non_terminal_iter() {
            if colors[nt.index] != WHITE {
                continue;
            }
            if let Some(target) = visit(self, nff, nt.index, &mut colors, &mut path) {
                let from = path.iter().position(|&p| p == target).unwrap_or(0);
                let mut cycle: Vec<String> = path[from..]
                    .iter()
                    .map(|&p| self.get_symbol_name(p).to_string())
                    .collect();
                cycle.push(self.get_symbol_name(target).to_string());
                return Some(cycle);
            }
        }
        None
    }

    /// Rewrites the grammar to remove left recursion: productions whose
    /// body starts with an earlier non-terminal are expanded with that
    /// non-terminal's bodies, then direct recursion is split off into a
    /// prime-named tail non-terminal ending in an epsilon production.
    pub fn eliminate_left_recursion(&mut self) {
        let order: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        let rank: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(r, &idx)| (idx, r))
            .collect();

        let base = self.symbols.len();
        let mut tails: Vec<NonTerminal> = Vec::new();

        for (i, &idx) in order.iter().enumerate() {
            let old_productions = match self.symbols[idx].mut_non_terminal() {
                Some(nt) => std::mem::take(&mut nt.productions),
                None => continue,
            };

            // Substitute bodies that start with an already-processed
            // non-terminal, so only direct recursion remains.
            let mut expanded: Vec<Vec<usize>> = Vec::new();
            for production in old_productions {
                match production.first().and_then(|s| rank.get(s)) {
                    Some(&r) if r < i => {
                        let prefixes = self.symbols[order[r]]
                            .non_terminal()
                            .map(|nt| nt.productions.clone())
                            .unwrap_or_default();
                        for prefix in prefixes {
                            expanded.push(concat_bodies(&prefix, &production[1..]));
                        }
                    }
                    _ => expanded.push(production),
                }
            }

            let (recursive, mut rest): (Vec<_>, Vec<_>) = expanded
                .into_iter()
                .partition(|production| production.first() == Some(&idx));

            if !recursive.is_empty() {
                let tail_idx = base + tails.len();
                for production in &mut rest {
                    if production.first() == Some(&EPSILON_INDEX) {
                        *production = vec![tail_idx];
                    } else {
                        production.push(tail_idx);
                    }
                }
                let mut tail_productions: Vec<Vec<usize>> = recursive
                    .into_iter()
                    .map(|production| {
                        let mut tail_body: Vec<usize> =
                            production.into_iter().skip(1).collect();
                        tail_body.push(tail_idx);
                        tail_body
                    })
                    .collect();
                tail_productions.push(vec![EPSILON_INDEX]);

                let name = self.get_symbol_name(idx).to_string();
                tails.push(NonTerminal {
                    index: tail_idx,
                    name,
                    productions: tail_productions,
                });
            }

            if let Some(nt) = self.symbols[idx].mut_non_terminal() {
                nt.productions = rest;
            }
        }

        for mut tail in tails {
            tail.name = self.get_symbol_prime_name(tail.name);
            self.symbol_table.insert(tail.name.clone(), tail.index);
            self.symbols.push(super::grammar::Symbol::NonTerminal(tail));
        }
    }
}

/// Concatenates a substituted prefix body with the remainder of the
/// original body, never letting epsilon appear inside a longer body.
fn concat_bodies(prefix: &[usize], rest: &[usize]) -> Vec<usize> {
    let mut body: Vec<usize> = prefix
        .iter()
        .chain(rest.iter())
        .cloned()
        .filter(|&s| s != EPSILON_INDEX)
        .collect();
    if body.is_empty() {
        body.push(EPSILON_INDEX);
    }
    body
}
