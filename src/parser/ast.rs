//! Token and placeholder types shared by the tokenizer, grammar and resolver

use std::collections::BTreeMap;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Parameter table: name -> value. Names are opaque strings, `service.name`
/// is matched as-is.
pub type Params = BTreeMap<String, String>;

/// Kind of a token found by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// `${opt`
    ParamOptStart,
    /// `${self`
    ParamSelfStart,
    /// `}` closing a placeholder
    ParamEnd,
    /// `${tfile`
    FileStart,
    /// `}` closing a file directive
    FileEnd,
}

impl TokenType {
    /// Opener of a `${opt:..}` or `${self:..}` placeholder
    pub fn is_param_start(self) -> bool {
        matches!(self, TokenType::ParamOptStart | TokenType::ParamSelfStart)
    }

    /// Any opener that can sit on the token stack
    pub fn is_start(self) -> bool {
        self.is_param_start() || self == TokenType::FileStart
    }
}

/// A token produced on demand by [`crate::parser::lexer::next_token`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte offset into the text being resolved
    pub index: usize,
    pub token_type: TokenType,
    /// Leading whitespace of the directive's line (only on `FileStart`)
    pub indentation: Option<String>,
}

impl Token {
    pub fn new(index: usize, token_type: TokenType) -> Self {
        Self {
            index,
            token_type,
            indentation: None,
        }
    }

    pub fn file_start(index: usize, indentation: impl Into<String>) -> Self {
        Self {
            index,
            token_type: TokenType::FileStart,
            indentation: Some(indentation.into()),
        }
    }
}

/// Which namespace a placeholder refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Opt,
    SelfRef,
}

/// A parsed `${opt:name[, default]}` / `${self:name[, default]}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub kind: VariableKind,
    pub name: String,
    /// Word after the comma. `Some("")` for `${opt:x, }`.
    pub default_value: Option<String>,
}

/// A parsed `${tfile:path[:name=value,...]}` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TFile {
    pub file_path: String,
    /// Directive-local parameters; values may still hold placeholders
    pub params: Params,
}
