mod cell_cache;
mod dataset;
mod highlight;
mod keywords;
mod options;
mod query;
mod selection;

pub use cell_cache::*;
pub use dataset::*;
pub use highlight::*;
pub use keywords::*;
pub use options::*;
pub use query::*;
pub use selection::*;

pub use query_syntax::{CompileError, Operator, Token, compile_to_postfix, operand_values, tokenize};
