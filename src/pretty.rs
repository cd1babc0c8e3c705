//! Canonical term writer.
//!
//! Renders a `Term` back to source syntax the reader accepts. Placeholder
//! substitution splices this output into goal text, so the rules here must
//! round-trip through the lexer: atoms that are not plain lowercase
//! identifiers are single-quoted with internal quotes doubled, and floats
//! always carry a fractional part so they re-read as floats.

use crate::term::Term;

/// Render a term to its canonical source form.
pub fn term_to_string(term: &Term) -> String {
    let mut out = String::new();
    write_term(&mut out, term);
    out
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::Atom(name) => write_atom(out, name),
        Term::Int(i) => out.push_str(&i.to_string()),
        Term::Float(x) => write_float(out, *x),
        Term::Var(name) => out.push_str(name),
        Term::Compound { functor, args } => {
            write_atom(out, functor);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_term(out, arg);
            }
            out.push(')');
        }
        Term::List { items, tail } => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_term(out, item);
            }
            if let Some(tail) = tail {
                out.push('|');
                write_term(out, tail);
            }
            out.push(']');
        }
    }
}

/// Write an atom, quoting unless it is a plain lowercase identifier.
fn write_atom(out: &mut String, name: &str) {
    if atom_needs_quotes(name) {
        out.push('\'');
        for ch in name.chars() {
            if ch == '\'' {
                // Doubled quote is the escape for a literal quote
                out.push('\'');
            }
            out.push(ch);
        }
        out.push('\'');
    } else {
        out.push_str(name);
    }
}

/// An atom can go unquoted only when it is a lowercase letter followed by
/// letters, digits, and underscores. Everything else (symbols, spaces,
/// leading capitals, empty) is quoted.
pub fn atom_needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => !chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => true,
    }
}

/// Floats must re-read as floats: `{:?}` keeps a fractional part or an
/// exponent in the output (`1.0`, not `1`).
fn write_float(out: &mut String, x: f64) {
    out.push_str(&format!("{:?}", x));
}
