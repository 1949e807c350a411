//! Expression lexer converting source text into positioned tokens.

use std::str::CharIndices;

use crate::errors::{ExpressionError, syntax_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Not,
    And,
    Or,
    Xor,
    OpenParen,
    CloseParen,
    /// Unquoted run of characters. `glob` is set when the run contained an
    /// unescaped wildcard and holds the run in glob syntax.
    Word { text: String, glob: Option<String> },
    Quoted(String),
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Characters a backslash turns into plain token text.
fn is_escapable(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')' | '&' | '|' | '^' | '!' | '~' | '*' | '?' | '"' | '\\'
    ) || ch.is_whitespace()
}

/// Accumulates one bare token, dropping unescaped whitespace at its edges.
#[derive(Default)]
struct WordBuilder {
    start: Option<usize>,
    end: usize,
    text: String,
    glob: String,
    pending_space: String,
    wildcard: bool,
}

impl WordBuilder {
    fn begin(&mut self, pos: usize) {
        if self.start.is_none() {
            self.start = Some(pos);
        } else if !self.pending_space.is_empty() {
            self.text.push_str(&self.pending_space);
            self.glob.push_str(&self.pending_space);
            self.pending_space.clear();
        }
    }

    fn push_space(&mut self, ch: char) {
        if self.start.is_some() {
            self.pending_space.push(ch);
        }
    }

    fn push_plain(&mut self, pos: usize, ch: char) {
        self.begin(pos);
        self.text.push(ch);
        if ch == '\\' {
            self.glob.push('\\');
        }
        self.glob.push(ch);
        self.end = pos + ch.len_utf8();
    }

    fn push_escaped(&mut self, pos: usize, ch: char) {
        self.begin(pos);
        self.text.push(ch);
        self.glob.push('\\');
        self.glob.push(ch);
        self.end = pos + 1 + ch.len_utf8();
    }

    fn push_wildcard(&mut self, pos: usize, ch: char) {
        self.begin(pos);
        self.wildcard = true;
        self.text.push(ch);
        self.glob.push(ch);
        self.end = pos + 1;
    }

    fn finish(&mut self, tokens: &mut Vec<Token>) {
        let taken = std::mem::take(self);
        if let Some(start) = taken.start {
            tokens.push(Token {
                kind: TokenKind::Word {
                    text: taken.text,
                    glob: taken.wildcard.then_some(taken.glob),
                },
                start,
                end: taken.end,
            });
        }
    }
}

/// Read a delimited body (`"..."` or `~...~`) whose opening delimiter sits
/// at `start`. A backslash before the delimiter yields the bare delimiter;
/// `unescape_backslash` additionally collapses `\\` to `\`. Every other
/// backslash pair is kept verbatim.
fn lex_delimited(
    chars: &mut CharIndices<'_>,
    start: usize,
    delimiter: char,
    unescape_backslash: bool,
    unterminated: &'static str,
) -> Result<(String, usize), ExpressionError> {
    let mut body = String::new();
    while let Some((pos, ch)) = chars.next() {
        if ch == delimiter {
            return Ok((body, pos + 1));
        }
        if ch != '\\' {
            body.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, next)) if next == delimiter => body.push(next),
            Some((_, '\\')) if unescape_backslash => body.push('\\'),
            Some((_, next)) => {
                body.push('\\');
                body.push(next);
            }
            None => body.push('\\'),
        }
    }
    Err(syntax_error(unterminated, start, None))
}

pub(crate) fn lex_expression(expression: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut chars = expression.char_indices();
    let mut tokens = Vec::new();
    let mut word = WordBuilder::default();

    while let Some((pos, ch)) = chars.next() {
        let operator = match ch {
            '!' => Some(TokenKind::Not),
            '&' => Some(TokenKind::And),
            '|' => Some(TokenKind::Or),
            '^' => Some(TokenKind::Xor),
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            _ => None,
        };
        if let Some(kind) = operator {
            word.finish(&mut tokens);
            tokens.push(Token {
                kind,
                start: pos,
                end: pos + 1,
            });
            continue;
        }

        match ch {
            '"' => {
                word.finish(&mut tokens);
                let (body, end) = lex_delimited(
                    &mut chars,
                    pos,
                    '"',
                    true,
                    "unterminated quoted string",
                )?;
                tokens.push(Token {
                    kind: TokenKind::Quoted(body),
                    start: pos,
                    end,
                });
            }
            '~' => {
                word.finish(&mut tokens);
                let (body, end) =
                    lex_delimited(&mut chars, pos, '~', false, "unterminated regular expression")?;
                tokens.push(Token {
                    kind: TokenKind::Regex(body),
                    start: pos,
                    end,
                });
            }
            '\\' => match chars.next() {
                Some((_, next)) if is_escapable(next) => word.push_escaped(pos, next),
                Some((next_pos, next)) => {
                    word.push_plain(pos, '\\');
                    word.push_plain(next_pos, next);
                }
                None => return Err(syntax_error("dangling escape", pos, Some("\\".into()))),
            },
            '*' | '?' => word.push_wildcard(pos, ch),
            c if c.is_whitespace() => word.push_space(c),
            c => word.push_plain(pos, c),
        }
    }

    word.finish(&mut tokens);
    Ok(tokens)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lexing fallibility")]
mod tests {
    use super::*;

    fn word(text: &str, start: usize, end: usize) -> Token {
        Token {
            kind: TokenKind::Word {
                text: text.into(),
                glob: None,
            },
            start,
            end,
        }
    }

    fn kinds(expression: &str) -> Vec<TokenKind> {
        lex_expression(expression)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenises_operators_and_words() {
        let tokens = lex_expression("A&!(B|C)^D").unwrap();
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens.first(), Some(&word("A", 0, 1)));
        assert_eq!(
            tokens.get(1).map(|t| &t.kind),
            Some(&TokenKind::And)
        );
        assert_eq!(tokens.last(), Some(&word("D", 9, 10)));
    }

    #[test]
    fn trims_unescaped_whitespace_around_words() {
        let tokens = lex_expression("  red apple  | B").unwrap();
        assert_eq!(tokens.first(), Some(&word("red apple", 2, 11)));
        assert_eq!(tokens.get(2), Some(&word("B", 15, 16)));
    }

    #[test]
    fn keeps_escaped_operators_in_words() {
        assert_eq!(
            kinds(r"\(A\&B"),
            vec![TokenKind::Word {
                text: "(A&B".into(),
                glob: None,
            }]
        );
    }

    #[test]
    fn keeps_backslash_before_ordinary_characters() {
        assert_eq!(
            kinds(r"\n"),
            vec![TokenKind::Word {
                text: r"\n".into(),
                glob: None,
            }]
        );
    }

    #[test]
    fn records_glob_form_for_wildcards() {
        assert_eq!(
            kinds(r"A?\*"),
            vec![TokenKind::Word {
                text: "A?*".into(),
                glob: Some(r"A?\*".into()),
            }]
        );
    }

    #[test]
    fn unescapes_quoted_strings() {
        assert_eq!(
            kinds(r#""a \"b\" \\ \n""#),
            vec![TokenKind::Quoted(r#"a "b" \ \n"#.into())]
        );
    }

    #[test]
    fn keeps_regex_escapes_except_delimiter() {
        assert_eq!(
            kinds(r"~\d+\~x~"),
            vec![TokenKind::Regex(r"\d+~x".into())]
        );
    }

    #[test]
    fn quoted_text_is_not_trimmed() {
        let tokens = lex_expression(r#"  " A "  "#).unwrap();
        assert_eq!(
            tokens,
            vec![Token {
                kind: TokenKind::Quoted(" A ".into()),
                start: 2,
                end: 7,
            }]
        );
    }

    #[test]
    fn errors_on_unterminated_quote() {
        let err = lex_expression(r#"A|"B"#).unwrap_err();
        assert_eq!(err.position(), Some(2));
        assert!(err.to_string().contains("unterminated quoted string"));
    }

    #[test]
    fn errors_on_unterminated_regex() {
        let err = lex_expression("~abc").unwrap_err();
        assert!(err.to_string().contains("unterminated regular expression"));
    }

    #[test]
    fn errors_on_dangling_escape() {
        let err = lex_expression("A\\").unwrap_err();
        assert_eq!(err.position(), Some(1));
    }
}
