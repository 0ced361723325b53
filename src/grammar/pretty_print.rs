use std::collections::HashMap;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::nullable_first_follow::NullableFirstFollow;
use super::{Grammar, EPSILON};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = format!("{} & \\rightarrow &", escape::tex(self.left));
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        (left + &right).replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|p| p.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &Vec<&str>) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let mut productions = Vec::new();
        for non_terminal in self.non_terminal_iter() {
            let rights = non_terminal
                .productions
                .iter()
                .map(|production| self.production_to_vec_str(production))
                .collect();
            productions.push(ProductionOutput {
                left: non_terminal.name.as_str(),
                rights,
            });
        }
        ProductionOutputVec { productions }
    }

    /// The nullable/FIRST/FOLLOW report, rows in declaration order with
    /// name-sorted sets so repeated renderings are byte-identical. The
    /// displayed FIRST column additionally shows ϵ for nullable rows.
    pub fn to_non_terminal_output_vec(&self, nff: &NullableFirstFollow) -> NonTerminalOutputVec {
        let mut data = Vec::new();
        for non_terminal in self.non_terminal_iter() {
            let mut t = NonTerminalOutput {
                name: non_terminal.name.as_str(),
                nullable: nff.nullable[non_terminal.index],
                first: nff.first[non_terminal.index]
                    .iter()
                    .map(|idx| self.get_symbol_name(*idx))
                    .collect(),
                follow: nff.follow[non_terminal.index]
                    .iter()
                    .map(|idx| self.get_symbol_name(*idx))
                    .collect(),
            };
            t.first.sort();
            t.follow.sort();

            if nff.nullable[non_terminal.index] {
                t.first.push(EPSILON);
            }
            data.push(t);
        }
        NonTerminalOutputVec { data }
    }
}

#[derive(Debug, Serialize)]
pub struct LL1TableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<Vec<ProductionOutput<'a>>>)>,
}

impl LL1TableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|candidates| {
                candidates
                    .iter()
                    .map(|production| production.to_plaintext(left.len(), false))
                    .collect::<Vec<_>>()
                    .join(", ")
            }));
            output.push(line);
        }

        let mut width = vec![0; self.terminals.len() + 1];
        for (j, w) in width.iter_mut().enumerate() {
            *w = output.iter().map(|line| line[j].len()).max().unwrap_or(0);
        }
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![escape::tex(*left).to_string()];
            line.extend(row.iter().map(|candidates| {
                candidates
                    .iter()
                    .map(|production| production.to_latex())
                    .collect::<Vec<_>>()
                    .join(", ")
            }));
            output.push(line.join(" & "));
        }
        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl Grammar {
    /// Renders the LL(1) table with the full candidate list in every
    /// cell, so a conflicting grammar shows its competing productions
    /// side by side in the printout.
    pub fn to_ll1_table_output(&self, nff: &NullableFirstFollow) -> LL1TableOutput {
        let terminals: Vec<&str> = self.terminal_iter().map(|t| t.as_str()).collect();
        let columns: HashMap<usize, usize> = terminals
            .iter()
            .enumerate()
            .filter_map(|(i, t)| self.get_symbol_index(t).map(|idx| (idx, i)))
            .collect();

        let candidates = self.ll1_candidates(nff);

        let mut rows: Vec<(&str, Vec<Vec<ProductionOutput>>)> = Vec::new();
        for nt in self.non_terminal_iter() {
            let left = nt.name.as_str();
            let mut row: Vec<Vec<ProductionOutput>> = vec![Vec::new(); terminals.len()];
            for (&(_, t_idx), ordinals) in candidates.range((nt.index, 0)..(nt.index + 1, 0)) {
                let col = columns[&t_idx];
                for &ordinal in ordinals {
                    row[col].push(ProductionOutput {
                        left,
                        rights: vec![self.production_to_vec_str(&nt.productions[ordinal])],
                    });
                }
            }
            rows.push((left, row));
        }

        LL1TableOutput { terminals, rows }
    }
}
