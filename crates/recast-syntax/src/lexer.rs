use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

/// Lex `text` into a lossless token stream (trivia included).
pub fn lex(text: &str) -> Vec<Token> {
    lex_with_errors(text).0
}

pub fn lex_with_errors(text: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    (tokens, lexer.errors)
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let start = self.pos;
        let c = self.peek()?;

        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            SyntaxKind::Whitespace
        } else if self.rest().starts_with("//") {
            self.eat_while(|c| c != '\n' && c != '\r');
            SyntaxKind::LineComment
        } else if self.rest().starts_with("/*") {
            self.lex_block_comment(start)
        } else if c == '@' && self.nth_char(1) == Some('"') {
            self.lex_verbatim_string(start)
        } else if c == '@' && self.nth_char(1).map_or(false, is_ident_start) {
            self.bump();
            self.eat_while(is_ident_continue);
            SyntaxKind::Identifier
        } else if is_ident_start(c) {
            self.eat_while(is_ident_continue);
            SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(SyntaxKind::Identifier)
        } else if c.is_ascii_digit()
            || (c == '.' && self.nth_char(1).map_or(false, |c| c.is_ascii_digit()))
        {
            self.lex_number()
        } else if c == '"' {
            self.lex_string(start)
        } else if c == '\'' {
            self.lex_char(start)
        } else if let Some((kind, len)) = punctuation(self.rest()) {
            self.pos += len;
            kind
        } else {
            self.bump();
            self.error(start, format!("unexpected character `{c}`"));
            SyntaxKind::Error
        };

        Some(Token {
            kind,
            range: TextRange::new(offset(start), offset(self.pos)),
        })
    }

    fn lex_block_comment(&mut self, start: usize) -> SyntaxKind {
        self.pos += 2;
        match self.rest().find("*/") {
            Some(idx) => self.pos += idx + 2,
            None => {
                self.pos = self.input.len();
                self.error(start, "unterminated block comment");
            }
        }
        SyntaxKind::BlockComment
    }

    fn lex_number(&mut self) -> SyntaxKind {
        let mut kind = SyntaxKind::IntLiteral;
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') && self.nth_char(1).map_or(false, |c| c.is_ascii_digit()) {
                kind = SyntaxKind::RealLiteral;
                self.bump();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                kind = SyntaxKind::RealLiteral;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        match self.peek() {
            Some('f' | 'F' | 'd' | 'D' | 'm' | 'M') => {
                kind = SyntaxKind::RealLiteral;
                self.bump();
            }
            Some('u' | 'U' | 'l' | 'L') => {
                self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            }
            _ => {}
        }
        kind
    }

    fn lex_string(&mut self, start: usize) -> SyntaxKind {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().map_or(false, |c| c != '\n') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    self.error(start, "unterminated string literal");
                    break;
                }
                Some(_) => self.bump(),
            }
        }
        SyntaxKind::StringLiteral
    }

    fn lex_verbatim_string(&mut self, start: usize) -> SyntaxKind {
        self.pos += 2; // @"
        loop {
            match self.peek() {
                Some('"') if self.nth_char(1) == Some('"') => self.pos += 2,
                Some('"') => {
                    self.bump();
                    break;
                }
                Some(_) => self.bump(),
                None => {
                    self.error(start, "unterminated verbatim string literal");
                    break;
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    fn lex_char(&mut self, start: usize) -> SyntaxKind {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().map_or(false, |c| c != '\n') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    self.error(start, "unterminated character literal");
                    break;
                }
                Some(_) => self.bump(),
            }
        }
        SyntaxKind::CharLiteral
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn nth_char(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&mut self, start: usize, message: impl Into<String>) {
        self.errors.push(LexError {
            message: message.into(),
            range: TextRange::new(offset(start), offset(self.pos)),
        });
    }
}

fn offset(pos: usize) -> TextSize {
    TextSize::from(pos as u32)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Longest-match punctuation lookup.
///
/// `>>` and `<<` are deliberately never produced: nested generic argument lists
/// (`List<List<int>>`) close with two `>` tokens.
fn punctuation(rest: &str) -> Option<(SyntaxKind, usize)> {
    const TWO: &[(&str, SyntaxKind)] = &[
        ("=>", SyntaxKind::FatArrow),
        ("==", SyntaxKind::EqEq),
        ("!=", SyntaxKind::BangEq),
        ("<=", SyntaxKind::LessEq),
        (">=", SyntaxKind::GreaterEq),
        ("&&", SyntaxKind::AmpAmp),
        ("||", SyntaxKind::PipePipe),
        ("++", SyntaxKind::PlusPlus),
        ("--", SyntaxKind::MinusMinus),
        ("+=", SyntaxKind::PlusEq),
        ("-=", SyntaxKind::MinusEq),
        ("*=", SyntaxKind::StarEq),
        ("/=", SyntaxKind::SlashEq),
    ];
    for (text, kind) in TWO {
        if rest.starts_with(text) {
            return Some((*kind, 2));
        }
    }

    let kind = match rest.chars().next()? {
        '(' => SyntaxKind::LParen,
        ')' => SyntaxKind::RParen,
        '{' => SyntaxKind::LBrace,
        '}' => SyntaxKind::RBrace,
        '[' => SyntaxKind::LBracket,
        ']' => SyntaxKind::RBracket,
        ';' => SyntaxKind::Semicolon,
        ',' => SyntaxKind::Comma,
        '.' => SyntaxKind::Dot,
        ':' => SyntaxKind::Colon,
        '?' => SyntaxKind::Question,
        '+' => SyntaxKind::Plus,
        '-' => SyntaxKind::Minus,
        '*' => SyntaxKind::Star,
        '/' => SyntaxKind::Slash,
        '%' => SyntaxKind::Percent,
        '~' => SyntaxKind::Tilde,
        '!' => SyntaxKind::Bang,
        '&' => SyntaxKind::Amp,
        '|' => SyntaxKind::Pipe,
        '^' => SyntaxKind::Caret,
        '=' => SyntaxKind::Eq,
        '<' => SyntaxKind::Less,
        '>' => SyntaxKind::Greater,
        _ => return None,
    };
    Some((kind, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        lex(text)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_keywords_identifiers_and_punctuation() {
        assert_eq!(
            kinds("Action<int> a = Foo;"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Less,
                SyntaxKind::IntKw,
                SyntaxKind::Greater,
                SyntaxKind::Identifier,
                SyntaxKind::Eq,
                SyntaxKind::Identifier,
                SyntaxKind::Semicolon,
            ]
        );
    }

    #[test]
    fn nested_generics_close_with_single_greater_tokens() {
        assert_eq!(
            kinds("List<List<int>>"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Less,
                SyntaxKind::Identifier,
                SyntaxKind::Less,
                SyntaxKind::IntKw,
                SyntaxKind::Greater,
                SyntaxKind::Greater,
            ]
        );
    }

    #[test]
    fn literals_and_verbatim_identifiers() {
        assert_eq!(
            kinds(r#"@class 1.5f 42u "a\"b" @"c""d" 'x'"#),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::RealLiteral,
                SyntaxKind::IntLiteral,
                SyntaxKind::StringLiteral,
                SyntaxKind::StringLiteral,
                SyntaxKind::CharLiteral,
            ]
        );
    }

    #[test]
    fn reports_unterminated_literals_and_unknown_chars() {
        let (tokens, errors) = lex_with_errors("\"abc\n#");
        assert_eq!(errors.len(), 2);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::Error));
    }

    #[test]
    fn comments_are_trivia() {
        let tokens = lex("// line\n/* block */x");
        assert_eq!(tokens[0].kind, SyntaxKind::LineComment);
        assert_eq!(tokens[2].kind, SyntaxKind::BlockComment);
        assert_eq!(tokens[3].kind, SyntaxKind::Identifier);
    }
}
