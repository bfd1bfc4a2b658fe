//! Error types for template resolution

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::codec::CodecError;
use crate::parser::ast::Span;

/// Errors that abort a resolution pass.
///
/// Unresolved or malformed placeholders are not errors: they stay in the
/// output verbatim.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Included file is missing or unreadable
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `${tfile...}` that does not follow the directive grammar
    #[error("malformed directive in {origin} at {span:?}: {reason}")]
    MalformedDirective {
        /// File (or `<input>`) the directive was found in
        origin: String,
        /// Byte range of the directive within `text`
        span: Span,
        /// Text being resolved when the directive was found
        text: String,
        reason: String,
    },

    /// A file includes itself, directly or through other files
    #[error("circular include detected: {chain}")]
    CircularInclude { chain: String },

    /// JSON include that could not be converted to YAML
    #[error("failed to convert {}: {source}", .path.display())]
    Codec { path: PathBuf, source: CodecError },
}

impl ResolveError {
    /// Format the error, with source context for malformed directives
    pub fn format(&self) -> String {
        match self {
            ResolveError::MalformedDirective {
                origin,
                span,
                text,
                reason,
            } => {
                // ariadne counts characters, not bytes
                let start = char_offset(text, span.start);
                let end = char_offset(text, span.end);
                let origin = origin.as_str();

                let mut buf = Vec::new();
                let written = Report::build(ReportKind::Error, origin, start)
                    .with_message("malformed file directive")
                    .with_label(
                        Label::new((origin, start..end))
                            .with_message(reason)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((origin, Source::from(text.as_str())), &mut buf);

                match written {
                    Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
                    Err(_) => self.to_string(),
                }
            }
            other => other.to_string(),
        }
    }
}

fn char_offset(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or(text.chars().count(), |s| s.chars().count())
}
