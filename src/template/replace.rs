//! Replacement strategies over a mutable text buffer
//!
//! Every replacement shifts the offsets of everything after it, so each
//! operation reports the cursor where scanning has to resume.

use crate::observer::{ResolveEvent, ResolveObserver};
use crate::parser::ast::Params;
use crate::parser::extract_variable;

/// Outcome of a placeholder replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Placeholder substituted; `next` is the end of the inserted value
    Replaced { next: usize },
    /// Placeholder kept as-is; `next` is just past its closing brace
    Unresolved { next: usize },
}

impl Replacement {
    /// Offset where scanning resumes
    pub fn next(self) -> usize {
        match self {
            Replacement::Replaced { next } | Replacement::Unresolved { next } => next,
        }
    }
}

/// Replace `span` of `text` with `replacement`, returning the offset right
/// after the inserted text.
pub fn splice(text: &mut String, span: std::ops::Range<usize>, replacement: &str) -> usize {
    let start = span.start;
    text.replace_range(span, replacement);
    start + replacement.len()
}

/// Replace the placeholder spanning `start..=end` with its parameter value or
/// default. Key presence decides, so `""` and `"0"` are valid values.
pub fn replace_variable(
    text: &mut String,
    start: usize,
    end: usize,
    params: &Params,
    observer: &dyn ResolveObserver,
) -> Replacement {
    let unresolved = Replacement::Unresolved { next: end + 1 };
    let Some(placeholder) = text.get(start..=end) else {
        return unresolved;
    };
    let Some(variable) = extract_variable(placeholder) else {
        return unresolved;
    };

    let value = match params.get(&variable.name) {
        Some(value) => value.clone(),
        None => match variable.default_value {
            Some(default) => default,
            None => {
                observer.on_event(&ResolveEvent::VariableUnresolved { placeholder });
                return unresolved;
            }
        },
    };

    observer.on_event(&ResolveEvent::VariableResolved {
        placeholder,
        value: &value,
    });
    Replacement::Replaced {
        next: splice(text, start..end + 1, &value),
    }
}

/// Prefix every line but the first with `indentation`.
///
/// The first line continues the directive's own line, which already carries
/// the indentation.
pub fn indent_continuation_lines(content: &str, indentation: &str) -> String {
    if indentation.is_empty() {
        return content.to_string();
    }
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", indentation, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overlay directive-local parameters on the caller's table
pub fn merge_params(base: &Params, local: &Params) -> Params {
    let mut merged = base.clone();
    merged.extend(local.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
