//! Tokenizer and grammars for `${opt:..}`, `${self:..}` and `${tfile:..}`

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{extract_tfile, extract_variable, parse_param_list};
pub use lexer::{next_token, scan_from, ScanOptions};
