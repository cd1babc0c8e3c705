//! Unit tests for the canonical term writer

use prologue::parser::parse_term;
use prologue::pretty::{atom_needs_quotes, term_to_string};
use prologue::term::Term;

#[test]
fn test_plain_atom_unquoted() {
    assert_eq!(term_to_string(&Term::atom("socrates")), "socrates");
    assert_eq!(term_to_string(&Term::atom("a_b2")), "a_b2");
}

#[test]
fn test_atom_quoting() {
    assert_eq!(term_to_string(&Term::atom("Socrates")), "'Socrates'");
    assert_eq!(term_to_string(&Term::atom("two words")), "'two words'");
    assert_eq!(term_to_string(&Term::atom("2")), "'2'");
    assert_eq!(term_to_string(&Term::atom("")), "''");
    assert_eq!(term_to_string(&Term::atom("??")), "'??'");
}

#[test]
fn test_quote_doubling() {
    assert_eq!(term_to_string(&Term::atom("it's")), "'it''s'");
    assert_eq!(term_to_string(&Term::atom("'quoted'")), "'''quoted'''");
}

#[test]
fn test_numbers() {
    assert_eq!(term_to_string(&Term::Int(42)), "42");
    assert_eq!(term_to_string(&Term::Int(-7)), "-7");
    // Floats keep a fractional part so they re-read as floats
    assert_eq!(term_to_string(&Term::Float(1.0)), "1.0");
    assert_eq!(term_to_string(&Term::Float(2.5)), "2.5");
}

#[test]
fn test_compound_and_list() {
    let term = parse_term("f(a, [1, 2|T], 'B c')").unwrap();
    assert_eq!(term_to_string(&term), "f(a, [1, 2|T], 'B c')");
}

#[test]
fn test_atom_needs_quotes() {
    assert!(!atom_needs_quotes("abc"));
    assert!(!atom_needs_quotes("a1_b"));
    assert!(atom_needs_quotes("Abc"));
    assert!(atom_needs_quotes("_x"));
    assert!(atom_needs_quotes("a b"));
    assert!(atom_needs_quotes(""));
}

#[test]
fn test_roundtrip_through_parser() {
    for source in [
        "f(a, b)",
        "[1, 2, 3]",
        "[H|T]",
        "'odd atom'(X, [a|B])",
        "g(1.5, -2, h(x))",
    ] {
        let term = parse_term(source).expect("parse failed");
        let printed = term_to_string(&term);
        let reparsed = parse_term(&printed).expect("reparse failed");
        assert_eq!(term, reparsed, "roundtrip changed {}", source);
    }
}
