//! Prologue: an engine-agnostic Prolog query and conversion layer.
//!
//! Callers issue goals as template strings with `?` placeholders, host
//! values are substituted safely into term positions, the goal runs
//! against whichever engine is configured, and typed results come back
//! out of the engine's variable bindings, without the caller touching
//! engine-specific term representations.
//!
//! ```no_run
//! use prologue::{Prover, values};
//!
//! fn main() -> prologue::Result<()> {
//!     let p = Prover::sld();
//!     p.add_theory("mortal(X) :- human(X). human(socrates).")?;
//!     let mut solution = p.solve_with("mortal(?).", values!["socrates"])?;
//!     assert!(solution.is_success()?);
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod prover;
pub mod query;
pub mod repl;
pub mod solution;
pub mod term;
pub mod value;

pub use convert::ConversionPolicy;
pub use engine::sld::SldEngine;
pub use engine::{BindingSet, BindingStream, CompiledGoal, Engine};
pub use error::{PrologError, Result};
pub use prover::Prover;
pub use query::{GoalTemplate, Query};
pub use solution::{Projection, Solution};
pub use term::{Clause, Term, TermKind};
pub use value::{from_registered, Compound, FromTerm, Value};
