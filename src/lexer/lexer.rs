use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Receives the text a pattern matched at the head of the remaining input.
pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

macro_rules! pattern {
    ($regex:expr, $handler:expr) => {
        RegexPattern {
            regex: Regex::new($regex).unwrap(),
            handler: $handler,
        }
    };
}

lazy_static! {
    // First match wins, so longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern!(r"^[ \t\r\n]+", whitespace_handler),
        pattern!(r"^//[^\n]*", skip_handler),
        pattern!(r"^/\*(?s:.*?)\*/", block_comment_handler),
        pattern!(r"^[\p{L}_][\p{L}\p{Nd}_]*", symbol_handler),
        pattern!(
            r"^(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][+-]?[0-9_]+)?|\.[0-9][0-9_]*(?:[eE][+-]?[0-9_]+)?)",
            number_handler
        ),
        pattern!(
            r#"^'(?:\\(?:x[0-9a-fA-F]{2}|u[0-9a-fA-F]{4}|U[0-9a-fA-F]{8}|[0-7]{3}|[abfnrtv\\'"])|[^'\\\n])'"#,
            rune_handler
        ),
        pattern!(r#"^"(?:\\.|[^"\\\n])*""#, string_handler),
        pattern!(r"^`[^`]*`", raw_string_handler),
        pattern!(r"^\.\.\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern!(r"^<<=", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeftEquals, "<<=")),
        pattern!(r"^>>=", MK_DEFAULT_HANDLER!(TokenKind::ShiftRightEquals, ">>=")),
        pattern!(r"^&\^=", MK_DEFAULT_HANDLER!(TokenKind::AmpCaretEquals, "&^=")),
        pattern!(r"^&\^", MK_DEFAULT_HANDLER!(TokenKind::AmpCaret, "&^")),
        pattern!(r"^:=", MK_DEFAULT_HANDLER!(TokenKind::Define, ":=")),
        pattern!(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern!(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern!(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern!(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern!(r"^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern!(r"^\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern!(r"^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern!(r"^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern!(r"^\+\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern!(r"^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern!(r"^\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern!(r"^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern!(r"^\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern!(r"^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern!(r"^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern!(r"^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
        pattern!(r"^\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
        pattern!(r"^\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern!(r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern!(r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern!(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern!(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern!(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern!(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern!(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern!(r"^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern!(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern!(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern!(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern!(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern!(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern!(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern!(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern!(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern!(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern!(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern!(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern!(r"^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern!(r"^\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern!(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("<stdin>"))
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            file: file_name,
        }
    }

    /// Moves past `n` bytes, counting the newlines crossed.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        self.line += self.source[self.pos..end].matches('\n').count() as u32;
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, Rc::clone(&self.file))
    }

    /// Span of the next `len` bytes of input.
    pub fn span_of(&self, len: usize) -> Span {
        let end = (self.pos + len).min(self.source.len());
        let lines = self.source[self.pos..end].matches('\n').count() as u32;

        Span {
            start: self.position(),
            end: Position::new(end as u32, self.line + lines, Rc::clone(&self.file)),
        }
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Terminates the current statement at the line break `at` bytes ahead,
    /// when the last token allows a statement to end there.
    fn insert_semicolon(&mut self, at: usize) {
        if !self
            .tokens
            .last()
            .is_some_and(|token| token.kind.ends_statement())
        {
            return;
        }

        let position = Position::new((self.pos + at) as u32, self.line, Rc::clone(&self.file));
        self.push(MK_TOKEN!(
            TokenKind::Semicolon,
            String::from("\n"),
            Span {
                start: position.clone(),
                end: position
            }
        ));
    }
}

fn whitespace_handler(lexer: &mut Lexer, text: &str) {
    if let Some(newline) = text.find('\n') {
        lexer.insert_semicolon(newline);
    }
    lexer.advance_n(text.len());
}

fn skip_handler(lexer: &mut Lexer, text: &str) {
    lexer.advance_n(text.len());
}

fn block_comment_handler(lexer: &mut Lexer, text: &str) {
    // a comment spanning lines acts like a newline
    if let Some(newline) = text.find('\n') {
        lexer.insert_semicolon(newline);
    }
    lexer.advance_n(text.len());
}

fn number_handler(lexer: &mut Lexer, text: &str) {
    let is_hex = text.starts_with("0x") || text.starts_with("0X");
    let kind = if text.contains('.') || (!is_hex && text.contains(['e', 'E'])) {
        TokenKind::Float
    } else {
        TokenKind::Int
    };

    let span = lexer.span_of(text.len());
    lexer.push(MK_TOKEN!(kind, String::from(text), span));
    lexer.advance_n(text.len());
}

fn symbol_handler(lexer: &mut Lexer, text: &str) {
    let span = lexer.span_of(text.len());

    if let Some(kind) = RESERVED_LOOKUP.get(text) {
        lexer.push(MK_TOKEN!(*kind, String::from(text), span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, String::from(text), span));
    }

    lexer.advance_n(text.len());
}

fn rune_handler(lexer: &mut Lexer, text: &str) {
    let value = decode_escapes(&text[1..text.len() - 1]);

    let span = lexer.span_of(text.len());
    lexer.push(MK_TOKEN!(TokenKind::Rune, value, span));
    lexer.advance_n(text.len());
}

fn string_handler(lexer: &mut Lexer, text: &str) {
    let value = decode_escapes(&text[1..text.len() - 1]);

    let span = lexer.span_of(text.len());
    lexer.push(MK_TOKEN!(TokenKind::String, value, span));
    lexer.advance_n(text.len());
}

fn raw_string_handler(lexer: &mut Lexer, text: &str) {
    let value = text[1..text.len() - 1].replace('\r', "");

    let span = lexer.span_of(text.len());
    lexer.push(MK_TOKEN!(TokenKind::String, value, span));
    lexer.advance_n(text.len());
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars>, count: usize, radix: u32) -> String {
    let mut digits = String::new();

    for _ in 0..count {
        match chars.peek() {
            Some(ch) if ch.is_digit(radix) => {
                digits.push(*ch);
                chars.next();
            }
            _ => break,
        }
    }

    digits
}

/// Decodes the escape sequences of a string or rune literal body.
/// Unknown escapes keep their backslash.
fn decode_escapes(body: &str) -> String {
    let mut result = String::new();
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(next_ch) = chars.peek().copied() else {
            result.push(ch);
            break;
        };

        let simple = match next_ch {
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'f' => Some('\x0c'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\x0b'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            _ => None,
        };

        if let Some(decoded) = simple {
            result.push(decoded);
            chars.next();
            continue;
        }

        let (digits, radix) = match next_ch {
            'x' => {
                chars.next();
                (take_digits(&mut chars, 2, 16), 16)
            }
            'u' => {
                chars.next();
                (take_digits(&mut chars, 4, 16), 16)
            }
            'U' => {
                chars.next();
                (take_digits(&mut chars, 8, 16), 16)
            }
            '0'..='7' => (take_digits(&mut chars, 3, 8), 8),
            _ => {
                result.push(ch);
                continue;
            }
        };

        match u32::from_str_radix(&digits, radix)
            .ok()
            .and_then(char::from_u32)
        {
            Some(decoded) => result.push(decoded),
            None => {
                result.push(ch);
                result.push_str(&digits);
            }
        }
    }

    result
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let matched = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|found| (pattern.handler, found.as_str().to_string()))
        });

        match matched {
            Some((handler, text)) if !text.is_empty() => handler(&mut lex, &text),
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    lex.position(),
                ))
            }
        }
    }

    lex.insert_semicolon(0);
    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
