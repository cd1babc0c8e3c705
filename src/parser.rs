//! Parser for Prolog terms, goals, and clause programs.
//!
//! Parses token streams into `Term` and `Clause` values. The grammar is the
//! subset the query layer needs: atoms, variables, numbers, compounds,
//! lists with optional tails, `=`/`\=` as the lowest-priority infix
//! operators, `,`-conjunctions, and `Head :- Body.` clauses.

use chumsky::prelude::*;
use chumsky::Stream;

use crate::error::{self, PrologError, Result};
use crate::lexer::{lexer, Span, Token};
use crate::term::{Clause, Term};

fn atom_name() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! {
        Token::Atom(s) => s,
        Token::Quoted(s) => s,
    }
}

/// Parse a single term, with `=`/`\=` allowed at the top level.
fn term() -> impl Parser<Token, Term, Error = Simple<Token>> + Clone {
    recursive(|eq_term| {
        let int_ = select! { Token::Int(i) => Term::Int(i) };
        let float_ = select! { Token::Float(x) => Term::Float(x) };
        let var_ = select! { Token::Var(s) => Term::Var(s) };
        // Double-quoted text reads as an atom with the same characters
        let str_ = select! { Token::Str(s) => Term::Atom(s) };

        // Atom, or compound when an argument list follows
        let atomic = atom_name()
            .then(
                eq_term
                    .clone()
                    .separated_by(just(Token::Comma))
                    .at_least(1)
                    .delimited_by(just(Token::LParen), just(Token::RParen))
                    .or_not(),
            )
            .map(|(name, args)| match args {
                Some(args) => Term::Compound { functor: name, args },
                None => Term::Atom(name),
            });

        // [] | [a, b, c] | [a, b | Tail]
        let list = just(Token::LBracket)
            .ignore_then(
                eq_term
                    .clone()
                    .separated_by(just(Token::Comma))
                    .at_least(1)
                    .then(just(Token::Pipe).ignore_then(eq_term.clone()).or_not())
                    .or_not(),
            )
            .then_ignore(just(Token::RBracket))
            .map(|contents| match contents {
                None => Term::nil(),
                Some((items, None)) => Term::list(items),
                Some((items, Some(tail))) => Term::list_with_tail(items, tail),
            });

        let paren = eq_term
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let primary = choice((atomic, list, int_, float_, var_, str_, paren));

        // Infix = and \= at the lowest priority
        primary
            .clone()
            .then(
                choice((
                    just(Token::Eq).to("="),
                    just(Token::NotEq).to("\\="),
                ))
                .then(primary)
                .or_not(),
            )
            .map(|(lhs, rest)| match rest {
                Some((op, rhs)) => Term::compound(op, vec![lhs, rhs]),
                None => lhs,
            })
    })
}

/// `,`-separated conjunction of goals.
fn conjunction() -> impl Parser<Token, Vec<Term>, Error = Simple<Token>> + Clone {
    term().separated_by(just(Token::Comma)).at_least(1)
}

/// A clause: `Head.` or `Head :- Body.` with a callable head.
fn clause() -> impl Parser<Token, Clause, Error = Simple<Token>> + Clone {
    term()
        .then(
            just(Token::ColonDash)
                .ignore_then(conjunction())
                .or_not(),
        )
        .then_ignore(just(Token::Dot))
        .try_map(|(head, body), span| {
            if !matches!(head, Term::Atom(_) | Term::Compound { .. }) {
                return Err(Simple::custom(
                    span,
                    format!("clause head must be an atom or compound, got {}", head),
                ));
            }
            Ok(match body {
                Some(body) => Clause::rule(head, body),
                None => Clause::fact(head),
            })
        })
}

fn lex(text: &str) -> Result<Vec<(Token, Span)>> {
    lexer().parse(text).map_err(|errs| PrologError::InvalidQuery {
        message: error::format_lexer_errors(text, errs),
    })
}

fn run<T>(
    text: &str,
    parser: impl Parser<Token, T, Error = Simple<Token>>,
) -> Result<T> {
    let tokens = lex(text)?;
    let len = text.chars().count();
    parser
        .parse(Stream::from_iter(len..len + 1, tokens.into_iter()))
        .map_err(|errs| PrologError::InvalidQuery {
            message: error::format_parser_errors(text, errs),
        })
}

/// Parse a single term. A trailing `.` is permitted but not required.
pub fn parse_term(text: &str) -> Result<Term> {
    run(
        text,
        term().then_ignore(just(Token::Dot).or_not()).then_ignore(end()),
    )
}

/// Parse a goal: a conjunction terminated by `.`.
pub fn parse_goal(text: &str) -> Result<Vec<Term>> {
    run(
        text,
        conjunction().then_ignore(just(Token::Dot)).then_ignore(end()),
    )
}

/// Parse a program: zero or more clauses.
pub fn parse_program(text: &str) -> Result<Vec<Clause>> {
    run(text, clause().repeated().then_ignore(end()))
}
