//! Solution cursor over an engine's binding-set stream.
//!
//! A `Solution` is a single-pass cursor: `is_success` forces at most one
//! pull and caches the first binding set without discarding it, `get` and
//! `get_var` read the current set, and `on`/`iter` hand out lazy
//! projections that continue over the *remaining* engine output; they
//! never restart the goal. Dropping the cursor drops the underlying
//! stream, releasing the engine-side resources.

use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::convert::ConversionPolicy;
use crate::engine::{BindingSet, BindingStream};
use crate::error::{PrologError, Result};
use crate::value::{FromTerm, Value};

/// Cursor over the solutions of one executed goal.
pub struct Solution<'e> {
    stream: BindingStream<'e>,
    policy: Rc<ConversionPolicy>,
    current: Option<BindingSet>,
    started: bool,
    succeeded: bool,
}

impl<'e> std::fmt::Debug for Solution<'e> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solution")
            .field("started", &self.started)
            .field("succeeded", &self.succeeded)
            .field("has_current", &self.current.is_some())
            .finish_non_exhaustive()
    }
}

impl<'e> Solution<'e> {
    pub(crate) fn new(stream: BindingStream<'e>, policy: Rc<ConversionPolicy>) -> Self {
        Self {
            stream,
            policy,
            current: None,
            started: false,
            succeeded: false,
        }
    }

    fn ensure_started(&mut self) -> Result<()> {
        if !self.started {
            self.started = true;
            match self.stream.next() {
                Some(Ok(set)) => {
                    self.current = Some(set);
                    self.succeeded = true;
                }
                Some(Err(e)) => return Err(e),
                None => {}
            }
        }
        Ok(())
    }

    /// Whether the goal has at least one solution. Pulls the first binding
    /// set from the engine if it hasn't been pulled yet; the first
    /// solution stays current for `get`/`on`.
    pub fn is_success(&mut self) -> Result<bool> {
        self.ensure_started()?;
        Ok(self.succeeded)
    }

    /// Convert the default variable of the current solution. Fails with
    /// `NoSolution` when the goal had none.
    pub fn get<T: FromTerm>(&mut self) -> Result<T> {
        self.ensure_started()?;
        let set = self.current.as_ref().ok_or(PrologError::NoSolution)?;
        let var = set
            .default_variable()
            .ok_or_else(|| PrologError::UnknownVariable("(goal binds no variables)".to_string()))?
            .to_string();
        self.get_var(&var)
    }

    /// Convert the named variable of the current solution. Fails with
    /// `UnknownVariable` when the binding set never bound `name`, decided
    /// by the set's contents rather than the query text.
    pub fn get_var<T: FromTerm>(&mut self, name: &str) -> Result<T> {
        self.ensure_started()?;
        let set = self.current.as_ref().ok_or(PrologError::NoSolution)?;
        let term = set
            .get(name)
            .ok_or_else(|| PrologError::UnknownVariable(name.to_string()))?;
        T::from_term(term, &self.policy)
    }

    /// Take the next binding set: the cached current one first, then the
    /// live stream.
    fn next_set(&mut self) -> Option<Result<BindingSet>> {
        if !self.started {
            if let Err(e) = self.ensure_started() {
                return Some(Err(e));
            }
        }
        if let Some(set) = self.current.take() {
            return Some(Ok(set));
        }
        self.stream.next()
    }

    /// Take the next raw binding set, advancing the cursor. The shell and
    /// engine-facing callers use this to see every binding at once.
    pub fn next_solution(&mut self) -> Option<Result<BindingSet>> {
        self.next_set()
    }

    /// Lazy projection of `var` over the remaining solutions.
    pub fn on<T: FromTerm>(&mut self, var: &str) -> Projection<'_, 'e, T> {
        Projection {
            solution: self,
            var: Some(var.to_string()),
            _marker: PhantomData,
        }
    }

    /// Lazy projection of the default variable over the remaining
    /// solutions.
    pub fn iter<T: FromTerm>(&mut self) -> Projection<'_, 'e, T> {
        Projection {
            solution: self,
            var: None,
            _marker: PhantomData,
        }
    }

    /// Drain the remaining solutions into a list of converted values.
    /// The first conversion failure fails the whole drain.
    pub fn to_list<T: FromTerm>(&mut self) -> Result<Vec<T>> {
        self.iter::<T>().collect()
    }

    /// Drain the remaining solutions into a set, de-duplicating by
    /// converted-value equality.
    pub fn to_set<T: FromTerm + Eq + Hash>(&mut self) -> Result<HashSet<T>> {
        self.iter::<T>().collect()
    }
}

impl<'e> Iterator for Solution<'e> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter::<Value>().next()
    }
}

/// Lazy typed projection over the remaining solutions of a cursor.
pub struct Projection<'s, 'e, T> {
    solution: &'s mut Solution<'e>,
    /// `None` projects each set's default variable.
    var: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<'s, 'e, T: FromTerm> Iterator for Projection<'s, 'e, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let set = match self.solution.next_set()? {
            Ok(set) => set,
            Err(e) => return Some(Err(e)),
        };
        let name = match &self.var {
            Some(name) => name.clone(),
            None => match set.default_variable() {
                Some(name) => name.to_string(),
                None => {
                    return Some(Err(PrologError::UnknownVariable(
                        "(goal binds no variables)".to_string(),
                    )))
                }
            },
        };
        match set.get(&name) {
            Some(term) => Some(T::from_term(term, &self.solution.policy)),
            None => Some(Err(PrologError::UnknownVariable(name))),
        }
    }
}
