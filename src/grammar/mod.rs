pub mod eliminate_left_recursion;
pub mod error;
pub mod grammar;
pub mod ll1_parser;
pub mod ll1_table;
pub mod nullable_first_follow;
pub mod parse;
pub mod pretty_print;

pub use error::{GrammarError, LL1Conflict, ParseError};
pub use grammar::Grammar;
pub use ll1_parser::{Derivation, DerivationStep, LL1Parser, Token};
pub use ll1_table::LL1Table;
pub use nullable_first_follow::NullableFirstFollow;

/// Display spelling of the epsilon pseudo-symbol. The aliases "ε" and
/// "epsilon" resolve to the same symbol when a grammar is read in.
pub const EPSILON: &str = "ϵ";
pub const END_MARK: &str = "$";
