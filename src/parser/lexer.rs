//! Tokenizer for placeholders and file directives using logos
//!
//! The logos lexer only finds the glyphs that can start or end a construct
//! (`$`, `}`, `#` and newlines). Deciding what a glyph means depends on the
//! stack of currently open tokens, so that part lives in [`scan_from`].

use logos::Logos;

use super::ast::{Token, TokenType};

pub const OPT_PREFIX: &str = "${opt";
pub const SELF_PREFIX: &str = "${self";
pub const TFILE_PREFIX: &str = "${tfile";

/// Significant characters; everything else is skipped
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[^$}#\n]+")]
pub enum Glyph {
    #[token("$")]
    Dollar,
    #[token("}")]
    Close,
    #[token("#")]
    Hash,
    #[token("\n")]
    Newline,
}

/// Grammar switches for the tokenizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Treat `}:` as the end of a file directive, reporting the `:` index
    pub trailing_colon: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trailing_colon(mut self, enabled: bool) -> Self {
        self.trailing_colon = enabled;
        self
    }
}

/// Find the next token after `after` (or from the start of `text`).
///
/// `open` is the stack of unclosed start tokens; its top decides whether a
/// `}` is a placeholder end, a directive end or plain text. `filter` limits
/// the token types that may be returned.
pub fn next_token(
    text: &str,
    after: Option<&Token>,
    open: &[Token],
    filter: Option<&[TokenType]>,
    options: ScanOptions,
) -> Option<Token> {
    let from = after.map_or(0, |t| t.index + 1);
    scan_from(text, from, open, filter, options)
}

/// Scan `text` from byte offset `from` for the next token.
pub fn scan_from(
    text: &str,
    from: usize,
    open: &[Token],
    filter: Option<&[TokenType]>,
    options: ScanOptions,
) -> Option<Token> {
    let rest = text.get(from..)?;
    let top = open.last().map(|t| t.token_type).filter(|t| t.is_start());
    let allows = |token_type: TokenType| filter.map_or(true, |f| f.contains(&token_type));

    let mut inside_comment = false;
    let mut lexer = Glyph::lexer(rest);

    while let Some(glyph) = lexer.next() {
        let Ok(glyph) = glyph else { continue };
        let index = from + lexer.span().start;

        match glyph {
            Glyph::Newline => inside_comment = false,
            Glyph::Hash => inside_comment = true,
            Glyph::Close => {
                if inside_comment {
                    continue;
                }
                let Some(top) = top else { continue };
                let token_type = if top == TokenType::FileStart {
                    TokenType::FileEnd
                } else {
                    TokenType::ParamEnd
                };
                if !allows(token_type) {
                    continue;
                }
                if token_type == TokenType::FileEnd
                    && options.trailing_colon
                    && text[index + 1..].starts_with(':')
                {
                    return Some(Token::new(index + 1, token_type));
                }
                return Some(Token::new(index, token_type));
            }
            Glyph::Dollar => {
                if inside_comment {
                    continue;
                }
                let lookahead = &text[index..];
                if lookahead.starts_with(OPT_PREFIX) && allows(TokenType::ParamOptStart) {
                    return Some(Token::new(index, TokenType::ParamOptStart));
                }
                if lookahead.starts_with(SELF_PREFIX) && allows(TokenType::ParamSelfStart) {
                    return Some(Token::new(index, TokenType::ParamSelfStart));
                }
                if lookahead.starts_with(TFILE_PREFIX) && allows(TokenType::FileStart) {
                    return Some(Token::file_start(index, line_indentation(text, index)));
                }
            }
        }
    }

    None
}

/// Leading spaces and tabs of the line that contains `index`
fn line_indentation(text: &str, index: usize) -> &str {
    let line_start = text[..index].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..index];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: ScanOptions = ScanOptions { trailing_colon: false };

    /// Walk the whole text keeping a stack the way the resolver does, minus replacements
    fn walk(text: &str, options: ScanOptions) -> Vec<(usize, TokenType)> {
        let mut stack: Vec<Token> = Vec::new();
        let mut seen = Vec::new();
        let mut from = 0;
        while let Some(token) = scan_from(text, from, &stack, None, options) {
            seen.push((token.index, token.token_type));
            from = token.index + 1;
            if token.token_type.is_start() {
                stack.push(token);
            } else {
                stack.pop();
            }
        }
        seen
    }

    #[test]
    fn test_match_start_tokens() {
        let token = next_token("0123${opt:foo", None, &[], None, DEFAULT);
        assert_eq!(token, Some(Token::new(4, TokenType::ParamOptStart)));

        let token = next_token("0123${self:foo", None, &[], None, DEFAULT);
        assert_eq!(token, Some(Token::new(4, TokenType::ParamSelfStart)));
    }

    #[test]
    fn test_match_end_token() {
        let last = Token::new(0, TokenType::ParamOptStart);
        let token = next_token("0123}", Some(&last), &[last.clone()], None, DEFAULT);
        assert_eq!(token, Some(Token::new(4, TokenType::ParamEnd)));
    }

    #[test]
    fn test_file_end_token() {
        let last = Token::file_start(0, "");
        let token = next_token("0123}", Some(&last), &[last.clone()], None, DEFAULT);
        assert_eq!(token, Some(Token::new(4, TokenType::FileEnd)));
    }

    #[test]
    fn test_no_token() {
        assert_eq!(next_token("0123${op", None, &[], None, DEFAULT), None);
        assert_eq!(next_token("0123", None, &[], None, DEFAULT), None);
        assert_eq!(next_token("", None, &[], None, DEFAULT), None);
    }

    #[test]
    fn test_close_without_opener_is_text() {
        assert_eq!(next_token("a: {b}", None, &[], None, DEFAULT), None);
    }

    #[test]
    fn test_match_start_tokens_after_index() {
        let after = Token::new(4, TokenType::ParamEnd);
        assert_eq!(next_token("0123${opt:foo", Some(&after), &[], None, DEFAULT), None);

        let after = Token::new(3, TokenType::ParamEnd);
        assert_eq!(
            next_token("0123${opt:foo", Some(&after), &[], None, DEFAULT),
            Some(Token::new(4, TokenType::ParamOptStart))
        );

        let after = Token::new(4, TokenType::ParamEnd);
        assert_eq!(
            next_token("0123${opt:foo${self", Some(&after), &[], None, DEFAULT),
            Some(Token::new(13, TokenType::ParamSelfStart))
        );
    }

    #[test]
    fn test_indentation_in_front_of_tfile() {
        assert_eq!(
            next_token("  ${tfile", None, &[], None, DEFAULT),
            Some(Token::file_start(2, "  "))
        );
        assert_eq!(next_token("${tfile", None, &[], None, DEFAULT), Some(Token::file_start(0, "")));
        assert_eq!(
            next_token("\n  ${tfile", None, &[], None, DEFAULT),
            Some(Token::file_start(3, "  "))
        );
        assert_eq!(
            next_token("\t key: ${tfile", None, &[], None, DEFAULT),
            Some(Token::file_start(7, "\t "))
        );
    }

    #[test]
    fn test_comment_hides_tokens_until_newline() {
        let text = "#${opt:a}\n${opt:b}";
        assert_eq!(
            next_token(text, None, &[], None, DEFAULT),
            Some(Token::new(10, TokenType::ParamOptStart))
        );

        let opener = Token::new(0, TokenType::ParamOptStart);
        assert_eq!(next_token("${opt:a # }", Some(&opener), &[opener.clone()], None, DEFAULT), None);
    }

    #[test]
    fn test_filter_skips_other_types() {
        let text = "${opt:a}${self:b}${tfile:c}";
        let self_only = [TokenType::ParamSelfStart];
        assert_eq!(
            next_token(text, None, &[], Some(&self_only), DEFAULT),
            Some(Token::new(8, TokenType::ParamSelfStart))
        );

        let files_only = [TokenType::FileStart];
        assert_eq!(
            next_token(text, None, &[], Some(&files_only), DEFAULT),
            Some(Token::file_start(17, ""))
        );

        let opener = Token::new(0, TokenType::ParamOptStart);
        let file_end = [TokenType::FileEnd];
        assert_eq!(next_token(text, Some(&opener), &[opener.clone()], Some(&file_end), DEFAULT), None);
    }

    #[test]
    fn test_trailing_colon_is_opt_in() {
        let text = "${tfile:a.yml}: rest";
        let opener = Token::file_start(0, "");
        let stack = [opener.clone()];

        let plain = scan_from(text, 1, &stack, None, ScanOptions::default());
        assert_eq!(plain, Some(Token::new(13, TokenType::FileEnd)));

        let colon = scan_from(text, 1, &stack, None, ScanOptions::new().with_trailing_colon(true));
        assert_eq!(colon, Some(Token::new(14, TokenType::FileEnd)));

        // Placeholders never take the colon
        let opener = Token::new(0, TokenType::ParamOptStart);
        let var = scan_from("${opt:a}:", 1, &[opener], None, ScanOptions::new().with_trailing_colon(true));
        assert_eq!(var, Some(Token::new(7, TokenType::ParamEnd)));
    }

    #[test]
    fn test_next_token_takes_trailing_colon_option() {
        let opener = Token::file_start(0, "");
        let text = "${tfile:a.yml}:";
        let colon = ScanOptions::new().with_trailing_colon(true);
        assert_eq!(
            next_token(text, Some(&opener), &[opener.clone()], None, colon),
            Some(Token::new(14, TokenType::FileEnd))
        );
        assert_eq!(
            next_token(text, Some(&opener), &[opener.clone()], None, DEFAULT),
            Some(Token::new(13, TokenType::FileEnd))
        );
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let text = "名前: ${opt:x}";
        let token = next_token(text, None, &[], None, DEFAULT);
        assert_eq!(token, Some(Token::new("名前: ".len(), TokenType::ParamOptStart)));
    }

    #[test]
    fn test_walk_nested_and_commented() {
        let text = "a: ${self:${opt:env}.t} # ${opt:c}\nb: ${tfile:x.yml:k=${opt:v}}";
        insta::assert_snapshot!(
            format!("{:?}", walk(text, ScanOptions::default())),
            @"[(3, ParamSelfStart), (10, ParamOptStart), (19, ParamEnd), (22, ParamEnd), (38, FileStart), (54, ParamOptStart), (61, ParamEnd), (62, FileEnd)]"
        );
    }
}
