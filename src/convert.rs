//! Bidirectional value/term conversion registry.
//!
//! A `ConversionPolicy` owns two converter tables: object converters keyed
//! by the `TypeId` of a host value's payload, and term converters keyed by
//! functor name with an exact-arity or any-arity slot. Resolution is an
//! explicit ordered walk: user converters first (a converter returning
//! `Ok(None)` means "does not apply" and falls through), then the built-in
//! rules. Registration is additive; there is no removal API. Registering
//! converters must happen before resolution is in flight for the owning
//! prover (single writer before many readers). Candidate lists are cloned
//! out of the registry before converters run, so a registration during a
//! conversion is never observed by it.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{PrologError, Result};
use crate::parser;
use crate::query::GoalTemplate;
use crate::term::Term;
use crate::value::{Compound, Value};

/// Converts a host value into a term. `Ok(None)` means the converter does
/// not apply to this particular value.
pub type ObjectConverter = Rc<dyn Fn(&Value, &ConversionPolicy) -> Result<Option<Term>>>;

/// Converts a term into a host value. `Ok(None)` means the converter does
/// not apply to this particular term.
pub type TermConverter = Rc<dyn Fn(&Term, &ConversionPolicy) -> Result<Option<Value>>>;

#[derive(Default)]
struct TermConverterEntry {
    by_arity: HashMap<usize, Vec<TermConverter>>,
    any_arity: Vec<TermConverter>,
}

/// Registry of object and term converters, scoped to one prover.
#[derive(Default)]
pub struct ConversionPolicy {
    object_converters: RefCell<HashMap<TypeId, Vec<ObjectConverter>>>,
    term_converters: RefCell<HashMap<String, TermConverterEntry>>,
}

impl ConversionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter from host type `T` to a term. A converter for
    /// the exact type overrides the built-in rule; the latest registration
    /// for a type is consulted first, earlier ones remain as fall-through
    /// candidates.
    pub fn add_object_converter<T, F>(&self, convert: F)
    where
        T: Any,
        F: Fn(&T, &ConversionPolicy) -> Result<Option<Term>> + 'static,
    {
        let converter: ObjectConverter = Rc::new(move |value, policy| {
            match value.payload().downcast_ref::<T>() {
                Some(v) => convert(v, policy),
                None => Ok(None),
            }
        });
        self.object_converters
            .borrow_mut()
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(0, converter);
    }

    /// Register a term converter for `functor` at any arity.
    pub fn add_term_converter<F>(&self, functor: &str, convert: F)
    where
        F: Fn(&Term, &ConversionPolicy) -> Result<Option<Value>> + 'static,
    {
        self.term_converters
            .borrow_mut()
            .entry(functor.to_string())
            .or_default()
            .any_arity
            .insert(0, Rc::new(convert));
    }

    /// Register a term converter for `functor` at exactly `arity`.
    /// Exact-arity converters are consulted before any-arity ones.
    pub fn add_term_converter_with_arity<F>(&self, functor: &str, arity: usize, convert: F)
    where
        F: Fn(&Term, &ConversionPolicy) -> Result<Option<Value>> + 'static,
    {
        self.term_converters
            .borrow_mut()
            .entry(functor.to_string())
            .or_default()
            .by_arity
            .entry(arity)
            .or_default()
            .insert(0, Rc::new(convert));
    }

    /// Convert a host value to a term.
    ///
    /// Resolution order: user converter registered for the payload's exact
    /// type, then the built-in rules, else `NoConverterFound`. Sequence
    /// conversion is total over elements: one failing element fails the
    /// whole conversion.
    pub fn convert_object(&self, value: &Value) -> Result<Term> {
        let key = value.payload().type_id();
        let candidates: Vec<ObjectConverter> = self
            .object_converters
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_default();
        for converter in candidates {
            if let Some(term) = converter(value, self)? {
                return Ok(term);
            }
        }

        match value {
            Value::Int(i) => Ok(Term::Int(*i)),
            Value::Float(x) => Ok(Term::Float(*x)),
            Value::Bool(b) => Ok(Term::Atom(if *b { "true" } else { "false" }.to_string())),
            Value::Str(s) => Ok(Term::Atom(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|v| self.convert_object(v))
                .collect::<Result<Vec<_>>>()
                .map(Term::list),
            Value::Compound(c) => Ok(Term::Compound {
                functor: c.functor.clone(),
                args: c
                    .args
                    .iter()
                    .map(|v| self.convert_object(v))
                    .collect::<Result<Vec<_>>>()?,
            }),
            Value::Term(t) => Ok(t.clone()),
            Value::Other(_) => Err(PrologError::NoConverterFound(
                "user value with no registered object converter".to_string(),
            )),
        }
    }

    /// Convert a term to a host value.
    ///
    /// Resolution order: user converter for (functor, exact arity), then
    /// (functor, any arity), then the built-in rules by type tag. Unbound
    /// variables and partial lists stay raw terms.
    pub fn convert_term(&self, term: &Term) -> Result<Value> {
        if let Some(functor) = term.functor() {
            let arity = term.arity();
            let (exact, any): (Vec<TermConverter>, Vec<TermConverter>) = {
                let registry = self.term_converters.borrow();
                match registry.get(functor) {
                    Some(entry) => (
                        entry.by_arity.get(&arity).cloned().unwrap_or_default(),
                        entry.any_arity.clone(),
                    ),
                    None => (Vec::new(), Vec::new()),
                }
            };
            for converter in exact.into_iter().chain(any) {
                if let Some(value) = converter(term, self)? {
                    return Ok(value);
                }
            }
        }

        match term {
            Term::Atom(s) => Ok(Value::Str(s.clone())),
            Term::Int(i) => Ok(Value::Int(*i)),
            Term::Float(x) => Ok(Value::Float(*x)),
            Term::Var(_) => Ok(Value::Term(term.clone())),
            Term::List { items, tail: None } => items
                .iter()
                .map(|t| self.convert_term(t))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Term::List { .. } => Ok(Value::Term(term.clone())),
            Term::Compound { functor, args } => Ok(Value::Compound(Compound {
                functor: functor.clone(),
                args: args
                    .iter()
                    .map(|t| self.convert_term(t))
                    .collect::<Result<Vec<_>>>()?,
            })),
        }
    }

    /// Parse literal term text into a term. Placeholder rules are the same
    /// as for goal templates, so `??` collapses to a literal `?`.
    pub fn term(&self, text: &str) -> Result<Term> {
        self.term_with(text, Vec::new())
    }

    /// Parse literal term text, substituting `args` for its placeholders:
    /// `policy.term_with("cpd(?)", values!["a"])`.
    pub fn term_with(&self, text: &str, args: Vec<Value>) -> Result<Term> {
        let template = GoalTemplate::parse(text);
        let rendered = template.render(&args, self)?;
        parser::parse_term(&rendered)
    }
}
