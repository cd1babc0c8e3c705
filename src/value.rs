//! Host-side values and typed projection.
//!
//! `Value` is the generic host representation that conversion produces and
//! consumes: primitives, strings, sequences, `Compound`, raw terms, and
//! user types behind `Rc<dyn Any>`. `FromTerm` is the requested-type seam
//! used by `Solution::get`/`on`: the raw-`Term` impl bypasses conversion
//! entirely, `Vec<T>` projects list elements, and user types route through
//! the registered term converters and downcast.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::convert::ConversionPolicy;
use crate::error::{PrologError, Result};
use crate::term::Term;

/// A host value convertible to and from terms.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Compound(Compound),
    /// A raw term passed through unconverted (e.g. an unbound variable).
    Term(Term),
    /// A user-typed value produced by a registered term converter.
    Other(Rc<dyn Any>),
}

impl Value {
    /// Wrap a user-typed value.
    pub fn other<T: Any>(value: T) -> Self {
        Value::Other(Rc::new(value))
    }

    /// The payload as `&dyn Any`: the primitive itself, or the wrapped
    /// user value for `Other`. Object-converter lookup keys on this
    /// payload's `TypeId`.
    pub fn payload(&self) -> &dyn Any {
        match self {
            Value::Int(i) => i,
            Value::Float(x) => x,
            Value::Bool(b) => b,
            Value::Str(s) => s,
            Value::List(items) => items,
            Value::Compound(c) => c,
            Value::Term(t) => t,
            Value::Other(rc) => rc.as_ref(),
        }
    }

    /// Downcast an `Other` payload to a concrete user type.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Value::Other(rc) => rc.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({:?})", x),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Compound(c) => f.debug_tuple("Compound").field(c).finish(),
            Value::Term(t) => write!(f, "Term({})", t),
            Value::Other(_) => write!(f, "Other(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Compound(a), Value::Compound(b)) => a == b,
            (Value::Term(a), Value::Term(b)) => a == b,
            // User values have no universal equality; identity only
            (Value::Other(a), Value::Other(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Host-side compound value: functor name plus ordered host arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Compound {
    pub functor: String,
    pub args: Vec<Value>,
}

impl Compound {
    pub fn new(functor: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            functor: functor.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Compound> for Value {
    fn from(v: Compound) -> Self {
        Value::Compound(v)
    }
}

impl From<Term> for Value {
    fn from(v: Term) -> Self {
        Value::Term(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Build a positional argument vector for `solve_with`/`Query::solve`:
/// `values![1, "a", vec![0, 1, 2]]`.
#[macro_export]
macro_rules! values {
    () => { Vec::<$crate::value::Value>::new() };
    ($($v:expr),+ $(,)?) => {
        vec![$($crate::value::Value::from($v)),+]
    };
}

/// Conversion from a bound term to a requested host type.
pub trait FromTerm: Sized {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self>;
}

impl FromTerm for Term {
    /// The raw-term request: no conversion at all.
    fn from_term(term: &Term, _policy: &ConversionPolicy) -> Result<Self> {
        Ok(term.clone())
    }
}

impl FromTerm for Value {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        policy.convert_term(term)
    }
}

impl FromTerm for i64 {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match policy.convert_term(term)? {
            Value::Int(i) => Ok(i),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromTerm for f64 {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match policy.convert_term(term)? {
            Value::Float(x) => Ok(x),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromTerm for bool {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match policy.convert_term(term)? {
            Value::Bool(b) => Ok(b),
            Value::Str(s) if s == "true" => Ok(true),
            Value::Str(s) if s == "false" => Ok(false),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromTerm for String {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match policy.convert_term(term)? {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromTerm for Compound {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match policy.convert_term(term)? {
            Value::Compound(c) => Ok(c),
            other => Err(mismatch("compound", &other)),
        }
    }
}

impl<T: FromTerm> FromTerm for Vec<T> {
    /// The sequence/array rule: the term must be a proper list; each
    /// element is projected to `T` independently.
    fn from_term(term: &Term, policy: &ConversionPolicy) -> Result<Self> {
        match term {
            Term::List { items, tail: None } => items
                .iter()
                .map(|item| T::from_term(item, policy))
                .collect(),
            other => Err(PrologError::Conversion(format!(
                "expected a proper list, got {}",
                other
            ))),
        }
    }
}

/// Project a term through the registered term converters and downcast the
/// resulting user value. The usual body of a `FromTerm` impl for a type
/// registered with `add_term_converter`.
pub fn from_registered<T: Any + Clone>(term: &Term, policy: &ConversionPolicy) -> Result<T> {
    let value = policy.convert_term(term)?;
    value.downcast::<T>().ok_or_else(|| {
        PrologError::Conversion(format!(
            "term {} did not convert to the requested user type",
            term
        ))
    })
}

fn mismatch(wanted: &str, got: &Value) -> PrologError {
    PrologError::Conversion(format!("expected {}, got {:?}", wanted, got))
}
