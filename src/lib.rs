extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{
    Derivation, DerivationStep, Grammar, GrammarError, LL1Conflict, LL1Parser, LL1Table,
    NullableFirstFollow, ParseError, Token,
};

fn error_json(message: String) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let nff = g.nullable_first_follow();
            g.to_non_terminal_output_vec(&nff).to_json()
        }
        Err(e) => error_json(e.to_string()),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let nff = g.nullable_first_follow();
            g.to_ll1_table_output(&nff).to_json()
        }
        Err(e) => error_json(e.to_string()),
    }
}

/// Parses a whitespace-separated sequence of token kinds against the
/// grammar and returns the derivation trace (or the error) as JSON.
#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, tokens: &str) -> String {
    let g = match Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return error_json(e.to_string()),
    };
    let parser = match LL1Parser::new(&g) {
        Ok(p) => p,
        Err(e) => return error_json(e.to_string()),
    };
    match parser.parse(tokens.split_whitespace().map(Token::new)) {
        Ok(derivation) => {
            serde_json::json!({ "accept": true, "derivation": derivation.steps }).to_string()
        }
        Err(e) => error_json(e.to_string()),
    }
}


#[cfg(test)]
mod from_rules_tests {
    use crate::grammar::GrammarError;
    use crate::Grammar;

    #[test]
    fn classifies_symbols() {
        let g = Grammar::from_rules(&[
            ("S", vec![vec!["A", "x"]]),
            ("A", vec![vec!["a"], vec!["epsilon"]]),
        ])
        .unwrap();

        let a_nt = g.get_symbol_index("A").unwrap();
        let x = g.get_symbol_index("x").unwrap();
        assert!(g.symbols[a_nt].non_terminal().is_some());
        assert!(g.symbols[x].is_terminal());
        assert_eq!(g.start_symbol, g.get_symbol_index("S"));
    }

    #[test]
    fn set_start_overrides_first_key() {
        let mut g = Grammar::from_rules(&[
            ("S", vec![vec!["a"]]),
            ("T", vec![vec!["b"]]),
        ])
        .unwrap();
        g.set_start("T").unwrap();
        assert_eq!(g.start_symbol, g.get_symbol_index("T"));

        assert!(matches!(
            g.set_start("a"),
            Err(GrammarError::NotANonTerminal(_))
        ));
    }

    #[test]
    fn rejects_key_without_productions() {
        let r = Grammar::from_rules(&[("S", vec![vec!["A"]]), ("A", vec![])]);
        assert_eq!(r.unwrap_err(), GrammarError::NoProductions("A".to_string()));
    }

    #[test]
    fn rejects_duplicate_key() {
        let r = Grammar::from_rules(&[("A", vec![vec!["a"]]), ("A", vec![vec!["b"]])]);
        assert_eq!(
            r.unwrap_err(),
            GrammarError::DuplicateNonTerminal("A".to_string())
        );
    }

    #[test]
    fn rejects_empty_body() {
        let r = Grammar::from_rules(&[("S", vec![vec![]])]);
        assert_eq!(r.unwrap_err(), GrammarError::EmptyProduction("S".to_string()));
    }

    #[test]
    fn rejects_epsilon_in_longer_body() {
        let r = Grammar::from_rules(&[("S", vec![vec!["a", "epsilon"]])]);
        assert_eq!(r.unwrap_err(), GrammarError::EpsilonNotAlone("S".to_string()));
    }
}


#[cfg(test)]
mod ll1_table_tests {
    use crate::grammar::GrammarError;
    use crate::Grammar;

    fn classic() -> Grammar {
        Grammar::from_rules(&[
            ("E", vec![vec!["T", "E'"]]),
            (
                "E'",
                vec![vec!["+", "T", "E'"], vec!["-", "T", "E'"], vec!["epsilon"]],
            ),
            ("T", vec![vec!["F", "T'"]]),
            (
                "T'",
                vec![vec!["*", "F", "T'"], vec!["/", "F", "T'"], vec!["epsilon"]],
            ),
            ("F", vec![vec!["id"], vec!["(", "E", ")"]]),
        ])
        .unwrap()
    }

    #[test]
    fn classic_table_cells() {
        let g = classic();
        let nff = g.nullable_first_follow();
        let table = g.ll1_table(&nff).unwrap();

        let e = g.get_symbol_index("E").unwrap();
        let e_prime = g.get_symbol_index("E'").unwrap();
        let f = g.get_symbol_index("F").unwrap();
        let id = g.get_symbol_index("id").unwrap();
        let lparen = g.get_symbol_index("(").unwrap();
        let rparen = g.get_symbol_index(")").unwrap();
        let plus = g.get_symbol_index("+").unwrap();
        let end = crate::grammar::grammar::END_MARK_INDEX;

        assert_eq!(table.production(e, id), Some(0));
        assert_eq!(table.production(e, lparen), Some(0));
        assert_eq!(table.production(e_prime, plus), Some(0));
        // ϵ is applied on FOLLOW(E') lookaheads.
        assert_eq!(table.production(e_prime, rparen), Some(2));
        assert_eq!(table.production(e_prime, end), Some(2));
        assert_eq!(table.production(f, id), Some(0));
        assert_eq!(table.production(f, lparen), Some(1));
        assert_eq!(table.production(f, plus), None);
    }

    #[test]
    fn first_first_conflict_names_both_productions() {
        let g = Grammar::from_rules(&[
            ("S", vec![vec!["a", "A"], vec!["a", "B"]]),
            ("A", vec![vec!["x"]]),
            ("B", vec![vec!["y"]]),
        ])
        .unwrap();
        let nff = g.nullable_first_follow();

        let Err(GrammarError::NotLL1(conflicts)) = g.ll1_table(&nff) else {
            panic!("expected an LL(1) conflict");
        };
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.non_terminal, "S");
        assert_eq!(c.terminal, "a");
        assert_eq!(
            c.productions,
            vec![
                (0, vec!["a".to_string(), "A".to_string()]),
                (1, vec!["a".to_string(), "B".to_string()]),
            ]
        );
    }

    #[test]
    fn all_conflicts_reported_in_one_pass() {
        let g = Grammar::from_rules(&[
            (
                "S",
                vec![vec!["a", "A"], vec!["a", "B"], vec!["b"], vec!["b", "c"]],
            ),
            ("A", vec![vec!["x"]]),
            ("B", vec![vec!["y"]]),
        ])
        .unwrap();
        let nff = g.nullable_first_follow();

        let Err(GrammarError::NotLL1(conflicts)) = g.ll1_table(&nff) else {
            panic!("expected LL(1) conflicts");
        };
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].terminal, "a");
        assert_eq!(conflicts[1].terminal, "b");
    }

    #[test]
    fn first_follow_conflict_on_nullable_body() {
        let g = Grammar::from_rules(&[
            ("S", vec![vec!["A", "a"]]),
            ("A", vec![vec!["a"], vec!["epsilon"]]),
        ])
        .unwrap();
        let nff = g.nullable_first_follow();

        let Err(GrammarError::NotLL1(conflicts)) = g.ll1_table(&nff) else {
            panic!("expected an LL(1) conflict");
        };
        assert_eq!(conflicts[0].non_terminal, "A");
        assert_eq!(conflicts[0].terminal, "a");
        assert_eq!(conflicts[0].productions.len(), 2);
    }

    #[test]
    fn left_recursion_is_diagnosed() {
        let g = Grammar::from_rules(&[
            ("E", vec![vec!["E", "+", "T"], vec!["T"]]),
            ("T", vec![vec!["id"]]),
        ])
        .unwrap();
        let nff = g.nullable_first_follow();

        let Err(GrammarError::LeftRecursive(cycle)) = g.ll1_table(&nff) else {
            panic!("expected a left-recursion diagnostic");
        };
        assert_eq!(cycle.first().map(String::as_str), Some("E"));
        assert_eq!(cycle.last().map(String::as_str), Some("E"));
    }

    #[test]
    fn indirect_left_recursion_through_nullable_prefix() {
        // A reaches itself leftmost through the nullable B.
        let g = Grammar::from_rules(&[
            ("A", vec![vec!["B", "A", "x"], vec!["a"]]),
            ("B", vec![vec!["b"], vec!["epsilon"]]),
        ])
        .unwrap();
        let nff = g.nullable_first_follow();

        assert!(matches!(
            g.ll1_table(&nff),
            Err(GrammarError::LeftRecursive(_))
        ));
    }

    #[test]
    fn elimination_makes_left_recursive_grammar_ll1() {
        let mut g = Grammar::from_rules(&[
            ("E", vec![vec!["E", "+", "T"], vec!["T"]]),
            ("T", vec![vec!["id"]]),
        ])
        .unwrap();
        g.eliminate_left_recursion();

        let e_prime = g.get_symbol_index("E'").unwrap();
        let tail = g.symbols[e_prime].non_terminal().unwrap();
        assert_eq!(tail.productions.len(), 2);

        let nff = g.nullable_first_follow();
        assert!(g.ll1_table(&nff).is_ok());
        assert!(nff.nullable[e_prime]);
    }
}


#[cfg(test)]
mod json_api_tests {
    const CLASSIC: &str = "E -> T E'
E' -> + T E' | - T E' | ϵ
T -> F T'
T' -> * F T' | / F T' | ϵ
F -> id | ( E )";

    #[test]
    fn nullable_first_follow_to_json_reports_sets() {
        let json = crate::nullable_first_follow_to_json(CLASSIC);
        assert!(json.contains("\"name\":\"E'\""));
        assert!(json.contains("\"nullable\":true"));
    }

    #[test]
    fn parse_to_json_accepts() {
        let json = crate::parse_to_json(CLASSIC, "id * id - id");
        assert!(json.contains("\"accept\":true"));
        assert!(json.contains("\"non_terminal\":\"E\""));
    }

    #[test]
    fn parse_to_json_surfaces_errors() {
        let json = crate::parse_to_json(CLASSIC, "id +");
        assert!(json.contains("\"error\""));

        let json = crate::parse_to_json("S -> a -> b", "a");
        assert!(json.contains("\"error\""));
    }
}
