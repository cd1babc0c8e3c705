//! Engine-agnostic prover facade.
//!
//! A `Prover` pairs an engine with a conversion policy. `solve` compiles
//! the substituted goal and immediately begins execution, handing back a
//! lazy cursor; `query` prepares a template for repeated execution;
//! `add_theory`/`assertz`/`retract` manage the knowledge base.

use std::rc::Rc;

use crate::convert::ConversionPolicy;
use crate::engine::sld::SldEngine;
use crate::engine::Engine;
use crate::error::Result;
use crate::query::{GoalTemplate, Query};
use crate::solution::Solution;
use crate::value::Value;

pub struct Prover {
    engine: Box<dyn Engine>,
    policy: Rc<ConversionPolicy>,
}

impl Prover {
    /// Wrap an engine with a fresh conversion policy.
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            policy: Rc::new(ConversionPolicy::new()),
        }
    }

    /// A prover over the bundled SLD engine.
    pub fn sld() -> Self {
        Self::new(Box::new(SldEngine::new()))
    }

    /// The conversion policy shared by this prover's queries. Register
    /// converters here before issuing the queries that need them.
    pub fn conversion_policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Solve a goal with no placeholder arguments.
    pub fn solve(&self, goal: &str) -> Result<Solution<'_>> {
        self.solve_with(goal, Vec::new())
    }

    /// Solve a goal template, substituting `args` for its placeholders.
    pub fn solve_with(&self, goal: &str, args: Vec<Value>) -> Result<Solution<'_>> {
        let template = GoalTemplate::parse(goal);
        self.solve_template(&template, args)
    }

    pub(crate) fn solve_template(
        &self,
        template: &GoalTemplate,
        args: Vec<Value>,
    ) -> Result<Solution<'_>> {
        let rendered = template.render(&args, &self.policy)?;
        let compiled = self.engine.compile(&rendered)?;
        let stream = self.engine.solve(&compiled)?;
        Ok(Solution::new(stream, Rc::clone(&self.policy)))
    }

    /// Prepare a goal template once for repeated execution.
    pub fn query(&self, goal: &str) -> Query<'_> {
        Query::new(self, GoalTemplate::parse(goal))
    }

    /// Assert clause text permanently into the knowledge base.
    pub fn add_theory(&self, theory: &str) -> Result<()> {
        self.engine.consult(theory)
    }

    /// Assert a dynamic, individually revocable fact.
    pub fn assertz(&self, clause: &str) -> Result<()> {
        self.engine.assertz(clause)
    }

    /// Remove exactly the clauses structurally matching `clause`, leaving
    /// other clauses of the same predicate untouched.
    pub fn retract(&self, clause: &str) -> Result<bool> {
        self.engine.retract(clause)
    }
}
