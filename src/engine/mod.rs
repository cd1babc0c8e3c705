//! Engine contract: the seam between the query layer and an executor.
//!
//! An `Engine` parses goal text it is handed (after placeholder
//! substitution), runs compiled goals as a lazy sequence of binding sets,
//! and maintains the knowledge base. `CompiledGoal` is engine-opaque: the
//! payload is whatever the compiling engine wants to see again at solve
//! time. The bundled SLD engine lives in [`sld`]; external engines
//! implement the same trait.

pub mod sld;

use std::any::Any;

use indexmap::IndexMap;

use crate::error::Result;
use crate::term::Term;

/// An engine-opaque compiled goal: the substituted text plus a payload
/// only the compiling engine understands.
pub struct CompiledGoal {
    text: String,
    payload: Box<dyn Any>,
}

impl CompiledGoal {
    pub fn new(text: impl Into<String>, payload: impl Any) -> Self {
        Self {
            text: text.into(),
            payload: Box::new(payload),
        }
    }

    /// The substituted goal text this was compiled from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Downcast the payload. Returns `None` when the goal was compiled by
    /// a different engine.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

/// One solution: a mapping from variable name to the term bound to it, in
/// first-occurrence order of the goal's variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingSet {
    bindings: IndexMap<String, Term>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding. Engines build sets in variable order; insertion
    /// order is preserved.
    pub fn bind(&mut self, name: impl Into<String>, term: Term) {
        self.bindings.insert(name.into(), term);
    }

    /// The term bound to `name`, if the goal bound that variable at all.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Variable names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// The distinguished default variable: the last one in binding order.
    pub fn default_variable(&self) -> Option<&str> {
        self.bindings.keys().next_back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Lazy sequence of binding sets. Each `next()` is one synchronous pull
/// from the engine; dropping the stream releases the engine-side cursor.
pub type BindingStream<'e> = Box<dyn Iterator<Item = Result<BindingSet>> + 'e>;

/// The executor behind a `Prover`.
pub trait Engine {
    /// Parse goal text into an executable form. Malformed syntax fails
    /// here with `InvalidQuery`.
    fn compile(&self, goal_text: &str) -> Result<CompiledGoal>;

    /// Begin execution, returning the lazy solution sequence.
    fn solve<'e>(&'e self, goal: &CompiledGoal) -> Result<BindingStream<'e>>;

    /// Assert clause text permanently into the knowledge base.
    fn consult(&self, theory_text: &str) -> Result<()>;

    /// Assert a dynamic clause at the end of its predicate.
    fn assertz(&self, clause_text: &str) -> Result<()>;

    /// Remove the clauses structurally matching `clause_text`. Returns
    /// whether anything was removed; same-functor clauses that do not
    /// match stay untouched.
    fn retract(&self, clause_text: &str) -> Result<bool>;
}
