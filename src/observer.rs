//! Progress reporting for resolution passes
//!
//! The resolver never prints. Everything it wants to tell the outside world
//! goes through a [`ResolveObserver`]; [`LogObserver`] forwards to `tracing`.

use std::path::Path;

use crate::parser::ast::Params;

/// Something that happened while resolving a template
#[derive(Debug, Clone, Copy)]
pub enum ResolveEvent<'a> {
    /// A root template is about to be resolved
    Processing { path: &'a Path, params: &'a Params },
    /// A `${tfile:..}` directive is being loaded
    FileIncluded {
        path: &'a Path,
        params: &'a Params,
        indentation: usize,
    },
    /// A placeholder was replaced
    VariableResolved {
        placeholder: &'a str,
        value: &'a str,
    },
    /// A placeholder had no value and no default
    VariableUnresolved { placeholder: &'a str },
}

/// Receives [`ResolveEvent`]s
pub trait ResolveObserver {
    fn on_event(&self, event: &ResolveEvent<'_>);
}

impl<F> ResolveObserver for F
where
    F: Fn(&ResolveEvent<'_>),
{
    fn on_event(&self, event: &ResolveEvent<'_>) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {
    fn on_event(&self, _event: &ResolveEvent<'_>) {}
}

/// Emits events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ResolveObserver for LogObserver {
    fn on_event(&self, event: &ResolveEvent<'_>) {
        match event {
            ResolveEvent::Processing { path, params } => {
                tracing::info!(path = %path.display(), params = %params_to_string(params), "Processing");
            }
            ResolveEvent::FileIncluded {
                path,
                params,
                indentation,
            } => {
                tracing::info!(
                    path = %path.display(),
                    params = %params_to_string(params),
                    indentation,
                    "Loading"
                );
            }
            ResolveEvent::VariableResolved { placeholder, value } => {
                tracing::debug!("{} => {}", placeholder, value);
            }
            ResolveEvent::VariableUnresolved { placeholder } => {
                tracing::trace!("{} left unresolved", placeholder);
            }
        }
    }
}

/// `name=value` pairs joined by `,`
pub fn params_to_string(params: &Params) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(",")
}
