//! Lexer for Prolog source text.
//!
//! Tokenizes goal, clause, and term text into a stream for the parser.
//! Quoted atoms and double-quoted text use doubled-quote escaping: `''`
//! inside `'...'` is a literal quote, likewise `""` inside `"..."`.

use chumsky::prelude::*;
use std::fmt;
use std::ops::Range;

/// Token types for Prolog source
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Unquoted atom: lowercase identifier
    Atom(String),
    /// Variable: identifier starting with an uppercase letter or `_`
    Var(String),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Single-quoted atom, unescaped
    Quoted(String),
    /// Double-quoted text, unescaped
    Str(String),

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Pipe,      // |
    Dot,       // .
    ColonDash, // :-
    Eq,        // =
    NotEq,     // \=
}

// The lexer never produces NaN, so float tokens compare reflexively and
// bit-level hashing is consistent with equality.
impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Token::Atom(s) | Token::Var(s) | Token::Quoted(s) | Token::Str(s) => s.hash(state),
            Token::Int(i) => i.hash(state),
            Token::Float(x) => x.to_bits().hash(state),
            _ => {}
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(s) => write!(f, "{}", s),
            Token::Var(s) => write!(f, "{}", s),
            Token::Int(i) => write!(f, "{}", i),
            Token::Float(x) => write!(f, "{:?}", x),
            Token::Quoted(s) => write!(f, "'{}'", s),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Pipe => write!(f, "|"),
            Token::Dot => write!(f, "."),
            Token::ColonDash => write!(f, ":-"),
            Token::Eq => write!(f, "="),
            Token::NotEq => write!(f, "\\="),
        }
    }
}

/// Type alias for spans
pub type Span = Range<usize>;

/// Create a lexer for Prolog source
pub fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let ident = text::ident().map(|s: String| {
        let first = s.chars().next().unwrap_or('_');
        if first == '_' || first.is_ascii_uppercase() {
            Token::Var(s)
        } else {
            Token::Atom(s)
        }
    });

    // Integers and floats, with an optional leading minus. The fractional
    // part requires at least one digit, so a clause-terminating `.` after a
    // number stays a separate Dot token. A fraction or an exponent makes
    // the literal a float.
    let number = just('-')
        .or_not()
        .then(text::int(10))
        .then(just('.').ignore_then(text::digits(10)).or_not())
        .then(
            one_of("eE")
                .ignore_then(one_of("+-").or_not().then(text::digits(10)))
                .or_not(),
        )
        .try_map(|(((neg, whole), frac), exp), span| {
            let mut literal = String::new();
            if neg.is_some() {
                literal.push('-');
            }
            literal.push_str(&whole);
            let is_float = frac.is_some() || exp.is_some();
            if let Some(frac) = frac {
                literal.push('.');
                literal.push_str(&frac);
            }
            if let Some((sign, digits)) = exp {
                literal.push('e');
                if let Some(sign) = sign {
                    literal.push(sign);
                }
                literal.push_str(&digits);
            }
            if is_float {
                literal
                    .parse::<f64>()
                    .map(Token::Float)
                    .map_err(|_| Simple::custom(span, "float literal out of range"))
            } else {
                literal
                    .parse::<i64>()
                    .map(Token::Int)
                    .map_err(|_| Simple::custom(span, "integer literal out of range"))
            }
        });

    let quoted_atom = just('\'')
        .ignore_then(
            just("''")
                .to('\'')
                .or(filter(|c: &char| *c != '\''))
                .repeated(),
        )
        .then_ignore(just('\''))
        .collect::<String>()
        .map(Token::Quoted);

    let double_quoted = just('"')
        .ignore_then(
            just("\"\"")
                .to('"')
                .or(filter(|c: &char| *c != '"'))
                .repeated(),
        )
        .then_ignore(just('"'))
        .collect::<String>()
        .map(Token::Str);

    let punctuation = choice((
        just(":-").to(Token::ColonDash),
        just("\\=").to(Token::NotEq),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just(',').to(Token::Comma),
        just('|').to(Token::Pipe),
        just('.').to(Token::Dot),
        just('=').to(Token::Eq),
    ));

    // Comments: % to end of line (mid-file or end-of-file)
    let line_comment = just('%')
        .then(none_of('\n').repeated())
        .then(just('\n').or_not())
        .ignored();

    // Token OR comment - comments produce None, tokens produce Some
    let token_or_skip = line_comment.to(None).or(choice((
        number,
        quoted_atom,
        double_quoted,
        ident,
        punctuation,
    ))
    .map(Some));

    token_or_skip
        .map_with_span(|opt_tok, span| opt_tok.map(|tok| (tok, span)))
        .padded()
        .repeated()
        .then_ignore(end())
        .map(|items| items.into_iter().flatten().collect())
}
