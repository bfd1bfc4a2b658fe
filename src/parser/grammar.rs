//! Placeholder and directive grammars using chumsky
//!
//! These run on the exact substring delimited by an opener/closer pair, so
//! they never have to search: the outer `${` and closing `}` are stripped and
//! the body must match completely.

use chumsky::prelude::*;

use crate::parser::ast::{Params, TFile, Variable, VariableKind};

type Extra<'a> = extra::Err<Rich<'a, char>>;

/// `(opt|self):<name>[,<default>]`
///
/// The name stays on one line. The default is a single run of non-whitespace,
/// optionally surrounded by whitespace (newlines included).
fn variable_body<'a>(
) -> impl Parser<'a, &'a str, (VariableKind, String, Option<String>), Extra<'a>> + Clone {
    let kind = choice((
        just("opt").to(VariableKind::Opt),
        just("self").to(VariableKind::SelfRef),
    ));
    let space = any().filter(|c: &char| c.is_whitespace()).repeated();
    let word = any()
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .collect::<String>();
    let name = none_of(",\n").repeated().at_least(1).collect::<String>();
    let default = just(',')
        .ignore_then(space.clone())
        .ignore_then(word)
        .then_ignore(space);

    kind.then_ignore(just(':'))
        .then(name)
        .then(default.or_not())
        .then_ignore(end())
        .map(|((kind, name), default)| (kind, name, default))
}

/// `tfile:<path>[:<raw params>]`
fn tfile_body<'a>() -> impl Parser<'a, &'a str, (String, Option<String>), Extra<'a>> + Clone {
    let path = none_of(":}").repeated().collect::<String>();
    let raw_params = just(':').ignore_then(any().repeated().collect::<String>());

    just("tfile")
        .ignore_then(just(':'))
        .ignore_then(path)
        .then(raw_params.or_not())
        .then_ignore(end())
}

/// Parse a complete `${opt:name[, default]}` or `${self:name[, default]}`.
///
/// Returns `None` when the text does not follow the grammar; the caller then
/// leaves it untouched.
pub fn extract_variable(placeholder: &str) -> Option<Variable> {
    let body = placeholder.strip_prefix("${")?.strip_suffix('}')?;
    let (kind, name, default) = variable_body().parse(body).into_result().ok()?;

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(Variable {
        kind,
        name: name.to_string(),
        default_value: default,
    })
}

/// Parse a complete `${tfile:path}` or `${tfile:path:name=value,...}`.
///
/// On failure the error describes what is wrong with the directive.
pub fn extract_tfile(directive: &str) -> Result<TFile, String> {
    let body = directive
        .strip_prefix("${")
        .and_then(|d| d.strip_suffix('}'))
        .ok_or_else(|| "directive must be wrapped in `${` and `}`".to_string())?;

    let (path, raw_params) = tfile_body().parse(body).into_result().map_err(|errs| {
        errs.iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    })?;

    let file_path = path.trim();
    if file_path.is_empty() {
        return Err("missing file path".to_string());
    }

    let params = raw_params.as_deref().map(parse_param_list).unwrap_or_default();
    Ok(TFile {
        file_path: file_path.to_string(),
        params,
    })
}

/// Converts `foo =bar, stage= test` into `{foo: bar, stage: test}`.
///
/// Pairs without a name or a value are dropped; the last duplicate wins.
pub fn parse_param_list(raw: &str) -> Params {
    raw.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
