//! Template resolution - the stack-based, recursive placeholder resolver

use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::ResolveError;
use crate::observer::{LogObserver, ResolveEvent, ResolveObserver};
use crate::parser::ast::{Params, Token, TokenType};
use crate::parser::{extract_tfile, scan_from, ScanOptions};

use super::replace::{indent_continuation_lines, merge_params, replace_variable, splice};
use super::source::{normalize_path, FsSource, TemplateSource};

static DEFAULT_SOURCE: FsSource = FsSource;
static DEFAULT_OBSERVER: LogObserver = LogObserver;

/// Context for template resolution
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Parameter values for the current scope
    pub params: Params,
    /// Directory that relative `${tfile:..}` paths are resolved against
    pub base_dir: PathBuf,
    /// Files currently being resolved, outermost first (for cycle detection)
    pub including: Vec<PathBuf>,
}

impl ResolutionContext {
    /// Create a context for text that doesn't come from a file
    pub fn new(base_dir: impl Into<PathBuf>, params: Params) -> Self {
        Self {
            params,
            base_dir: base_dir.into(),
            including: Vec::new(),
        }
    }

    /// Create a context for the contents of `path`
    pub fn for_file(path: &Path, params: Params) -> Self {
        let path = normalize_path(path);
        Self {
            params,
            base_dir: parent_dir(&path),
            including: vec![path],
        }
    }

    /// Create a nested context for an included file
    pub fn nested(&self, path: PathBuf, params: Params) -> Self {
        let mut including = self.including.clone();
        let base_dir = parent_dir(&path);
        including.push(path);
        Self {
            params,
            base_dir,
            including,
        }
    }

    /// Check if a file is currently being resolved
    pub fn is_including(&self, path: &Path) -> bool {
        self.including.iter().any(|p| p == path)
    }

    /// Name of the file being resolved, for diagnostics
    pub fn origin(&self) -> String {
        self.including
            .last()
            .map_or_else(|| "<input>".to_string(), |p| p.display().to_string())
    }

    fn chain_to(&self, path: &Path) -> String {
        self.including
            .iter()
            .map(|p| p.as_path())
            .chain(std::iter::once(path))
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Resolves placeholders and file directives in template text.
///
/// Stateless across calls: the token stack and the text being rewritten are
/// local to one resolution.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    source: &'a dyn TemplateSource,
    observer: &'a dyn ResolveObserver,
    options: ScanOptions,
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_SOURCE)
    }
}

impl<'a> Resolver<'a> {
    /// Create a resolver reading includes from `source`, logging through `tracing`
    pub fn new(source: &'a dyn TemplateSource) -> Self {
        Self {
            source,
            observer: &DEFAULT_OBSERVER,
            options: ScanOptions::default(),
        }
    }

    /// Set the observer that receives progress events
    pub fn with_observer(mut self, observer: &'a dyn ResolveObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Set the tokenizer options
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer(&self) -> &'a dyn ResolveObserver {
        self.observer
    }

    pub fn source(&self) -> &'a dyn TemplateSource {
        self.source
    }

    /// Resolve `text` with `params`, resolving includes relative to `base_dir`
    pub fn resolve_tokens_recursive(
        &self,
        base_dir: &Path,
        text: &str,
        params: &Params,
    ) -> Result<String, ResolveError> {
        let ctx = ResolutionContext::new(base_dir, params.clone());
        self.resolve_in(&ctx, text.to_string())
    }

    /// Resolve the contents of the file at `path`, which were already read
    pub fn resolve_file_contents(
        &self,
        path: &Path,
        text: &str,
        params: &Params,
    ) -> Result<String, ResolveError> {
        let ctx = ResolutionContext::for_file(path, params.clone());
        self.resolve_in(&ctx, text.to_string())
    }

    /// Resolve a whole text in `ctx` with a fresh token stack
    pub fn resolve_in(
        &self,
        ctx: &ResolutionContext,
        mut text: String,
    ) -> Result<String, ResolveError> {
        let mut stack = Vec::new();
        self.resolve_level(ctx, &mut text, &mut stack, 0, None)?;
        Ok(text)
    }

    /// Drive the tokenizer over `text` from `cursor`.
    ///
    /// With a `floor`, this is a nested call for the placeholder at
    /// `stack[floor]` and returns as soon as that opener is closed.
    /// Returns the cursor where the caller resumes scanning.
    fn resolve_level(
        &self,
        ctx: &ResolutionContext,
        text: &mut String,
        stack: &mut Vec<Token>,
        mut cursor: usize,
        floor: Option<usize>,
    ) -> Result<usize, ResolveError> {
        while let Some(token) = scan_from(text, cursor, stack, None, self.options) {
            match token.token_type {
                TokenType::FileStart => {
                    cursor = token.index + 1;
                    stack.push(token);
                }
                TokenType::FileEnd => {
                    let Some(opener) = stack.pop() else { break };
                    cursor = self.replace_tfile(ctx, text, &opener, token.index)?;
                }
                TokenType::ParamOptStart | TokenType::ParamSelfStart => {
                    let nested = stack
                        .last()
                        .is_some_and(|top| top.token_type.is_param_start());
                    cursor = token.index + 1;
                    stack.push(token);
                    if nested {
                        // Resolve the inner placeholder before the outer one is looked at
                        let inner = stack.len() - 1;
                        cursor = self.resolve_level(ctx, text, stack, cursor, Some(inner))?;
                    }
                }
                TokenType::ParamEnd => {
                    let Some(opener) = stack.pop() else { break };
                    cursor = replace_variable(
                        text,
                        opener.index,
                        token.index,
                        &ctx.params,
                        self.observer,
                    )
                    .next();
                }
            }

            if floor.is_some_and(|floor| stack.len() <= floor) {
                break;
            }
        }

        Ok(cursor)
    }

    /// Replace the directive spanning `opener.index..=end` with the resolved
    /// contents of the file it names. Returns the offset after the inserted text.
    fn replace_tfile(
        &self,
        ctx: &ResolutionContext,
        text: &mut String,
        opener: &Token,
        end: usize,
    ) -> Result<usize, ResolveError> {
        let start = opener.index;
        let span = start..end + 1;
        // With `}:` termination the end token sits on the colon
        let close = if self.options.trailing_colon && text[end..].starts_with(':') {
            end
        } else {
            end + 1
        };
        let directive = extract_tfile(&text[start..close]).map_err(|reason| {
            ResolveError::MalformedDirective {
                origin: ctx.origin(),
                span: start..close,
                text: text.clone(),
                reason,
            }
        })?;

        let path = normalize_path(&ctx.base_dir.join(&directive.file_path));
        if ctx.is_including(&path) {
            return Err(ResolveError::CircularInclude {
                chain: ctx.chain_to(&path),
            });
        }

        let mut content = self
            .source
            .read(&path)
            .map_err(|source| ResolveError::Io {
                path: path.clone(),
                source,
            })?;

        if is_json(&path) {
            content = codec::json_to_yaml(&content).map_err(|source| ResolveError::Codec {
                path: path.clone(),
                source,
            })?;
        }

        let indentation = opener.indentation.as_deref().unwrap_or("");
        let content = indent_continuation_lines(&content, indentation);
        let merged = merge_params(&ctx.params, &directive.params);

        self.observer.on_event(&ResolveEvent::FileIncluded {
            path: &path,
            params: &merged,
            indentation: indentation.len(),
        });

        let nested = ctx.nested(path, merged);
        let resolved = self.resolve_in(&nested, content)?;

        Ok(splice(text, span, &resolved))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
