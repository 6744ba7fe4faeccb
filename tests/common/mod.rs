//! A small arithmetic / toy-language lexer shared by the integration tests.
//!
//! Produces position-tracked tokens over the tag set used by the example
//! grammars and terminates every stream with the end-of-text sentinel.

use lalr_parser::{Fragment, Position, Symbol, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Number,
    Varname,
    Plus,
    Minus,
    Mul,
    Div,
    Lp,
    Rp,
    Set,
    Semicolon,
    Comma,
    Print,
    Read,
    Str,
}

/// Semantic values flowing through the example grammars.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    List(Vec<f64>),
    Unit,
}

impl Value {
    pub fn num(&self) -> f64 {
        match self {
            Value::Num(n) => *n,
            other => panic!("expected a number, got {:?}", other),
        }
    }

    pub fn into_str(self) -> String {
        match self {
            Value::Str(s) => s,
            other => panic!("expected a string, got {:?}", other),
        }
    }

    pub fn into_list(self) -> Vec<f64> {
        match self {
            Value::List(items) => items,
            other => panic!("expected a list, got {:?}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tok {
    tag: Symbol<Tag>,
    value: Option<Value>,
    fragment: Fragment,
}

impl Token for Tok {
    type Tag = Tag;
    type Value = Value;

    fn tag(&self) -> Symbol<Tag> {
        self.tag
    }

    fn value(&self) -> Option<Value> {
        self.value.clone()
    }

    fn fragment(&self) -> Fragment {
        self.fragment
    }
}

struct Cursor {
    chars: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.index += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Scans `text` into a token stream ending with the end-of-text sentinel.
///
/// Panics on characters outside the toy language; test inputs are trusted.
pub fn scan(text: &str) -> Vec<Tok> {
    let mut cur = Cursor::new(text);
    let mut tokens = Vec::new();

    while let Some(c) = cur.peek() {
        if c.is_whitespace() {
            cur.bump();
            continue;
        }

        let start = cur.position();
        match c {
            '+' | '-' | '*' | '/' | '=' | ';' | ',' | '(' | ')' => {
                cur.bump();
                let tag = match c {
                    '+' => Tag::Plus,
                    '-' => Tag::Minus,
                    '*' => Tag::Mul,
                    '/' => Tag::Div,
                    '=' => Tag::Set,
                    ';' => Tag::Semicolon,
                    ',' => Tag::Comma,
                    '(' => Tag::Lp,
                    _ => Tag::Rp,
                };
                tokens.push(Tok {
                    tag: Symbol::Terminal(tag),
                    value: None,
                    fragment: Fragment::new(start, start),
                });
            }
            '"' => {
                cur.bump();
                let mut text = String::new();
                while let Some(c) = cur.peek() {
                    if c == '"' {
                        break;
                    }
                    text.push(c);
                    cur.bump();
                }
                let end = cur.position();
                cur.bump();
                tokens.push(Tok {
                    tag: Symbol::Terminal(Tag::Str),
                    value: Some(Value::Str(text)),
                    fragment: Fragment::new(start, end),
                });
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(c) = cur.peek() {
                    if !c.is_ascii_alphanumeric() {
                        break;
                    }
                    name.push(c);
                    cur.bump();
                }
                let end = cur.position();
                let (tag, value) = match name.as_str() {
                    "PRINT" => (Tag::Print, None),
                    "READ" => (Tag::Read, None),
                    _ => (Tag::Varname, Some(Value::Str(name))),
                };
                tokens.push(Tok {
                    tag: Symbol::Terminal(tag),
                    value,
                    fragment: Fragment::new(start, end),
                });
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(c) = cur.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    digits.push(c);
                    cur.bump();
                }
                let end = cur.position();
                tokens.push(Tok {
                    tag: Symbol::Terminal(Tag::Number),
                    value: Some(Value::Num(digits.parse().unwrap())),
                    fragment: Fragment::new(start, end),
                });
            }
            other => panic!("lex error: unexpected {:?} at {}", other, start),
        }
    }

    tokens.push(Tok {
        tag: Symbol::EndMarker,
        value: None,
        fragment: Fragment::new(cur.position(), cur.position()),
    });
    tokens
}
