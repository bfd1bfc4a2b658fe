//! Template resolution: placeholders, file directives and their sources
//!
//! # Example
//!
//! ```text
//! # serverless.yml
//! service: ${opt:name}-${opt:stage, dev}
//! provider:
//!   ${tfile:resources/provider.yml:region=ap-southeast-2}
//! ```
//!
//! `${opt:..}` / `${self:..}` are looked up in the parameter table. The
//! `${tfile:..}` directive is replaced by the resolved content of
//! `resources/provider.yml`, indented to the directive's column, with
//! `region` added to the parameters visible inside that file.

mod replace;
mod resolver;
mod source;

pub use replace::{
    indent_continuation_lines, merge_params, replace_variable, splice, Replacement,
};
pub use resolver::{ResolutionContext, Resolver};
pub use source::{normalize_path, FsSource, MemorySource, TemplateSource};
