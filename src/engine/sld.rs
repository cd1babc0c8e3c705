//! Bundled SLD-resolution engine.
//!
//! A small depth-first resolution engine over an assertion-ordered clause
//! database. The search is an explicit frame stack rather than recursion:
//! each frame is a remaining-goal list plus a substitution, alternatives
//! are pushed as frames, and each `next()` on the solution iterator runs
//! the machine until a frame's goal list empties (one solution) or the
//! stack drains. Clause lookup happens per call, so assertions made by a
//! running query are visible to later calls, and any number of cursors
//! may read the database concurrently.
//!
//! Builtins: `=`/2, `\=`/2, `true`/0, `fail`/0, `false`/0, `assertz`/1,
//! `retract`/1. `member/2` and `append/3` are seeded as library clauses.
//! Unknown predicates fail silently. No occurs check.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{PrologError, Result};
use crate::parser;
use crate::term::{Clause, Term};

use super::{BindingSet, BindingStream, CompiledGoal, Engine};

/// Library clauses seeded into every fresh engine.
const LIBRARY: &str = "\
member(X, [X|_]).
member(X, [_|T]) :- member(X, T).

append([], L, L).
append([H|T], L, [H|R]) :- append(T, L, R).
";

/// Compiled form of a goal: the conjunction plus the named variables to
/// project into binding sets, in first-occurrence order.
struct GoalPlan {
    goals: Vec<Term>,
    vars: Vec<String>,
}

#[derive(Default)]
struct Database {
    clauses: IndexMap<(String, usize), Vec<Rc<Clause>>>,
}

impl Database {
    fn add(&mut self, clause: Clause) -> Result<()> {
        let key = clause.predicate_key().ok_or_else(|| {
            PrologError::Engine(format!("clause head is not callable: {}", clause.head))
        })?;
        self.clauses.entry(key).or_default().push(Rc::new(clause));
        Ok(())
    }

    /// Remove the first clause structurally equal to `clause`.
    fn retract(&mut self, clause: &Clause) -> bool {
        let Some(key) = clause.predicate_key() else {
            return false;
        };
        if let Some(list) = self.clauses.get_mut(&key) {
            if let Some(pos) = list.iter().position(|c| c.as_ref() == clause) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    fn clauses_for(&self, key: &(String, usize)) -> Vec<Rc<Clause>> {
        self.clauses.get(key).cloned().unwrap_or_default()
    }
}

/// The bundled engine.
pub struct SldEngine {
    db: RefCell<Database>,
}

impl SldEngine {
    pub fn new() -> Self {
        let engine = SldEngine {
            db: RefCell::new(Database::default()),
        };
        let library = parser::parse_program(LIBRARY).expect("library clauses parse");
        for clause in library {
            engine
                .db
                .borrow_mut()
                .add(clause)
                .expect("library clauses are callable");
        }
        engine
    }
}

impl Default for SldEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for SldEngine {
    fn compile(&self, goal_text: &str) -> Result<CompiledGoal> {
        let goals = parser::parse_goal(goal_text)?;
        let mut vars = Vec::new();
        for goal in &goals {
            collect_vars(goal, &mut vars);
        }
        Ok(CompiledGoal::new(goal_text, GoalPlan { goals, vars }))
    }

    fn solve<'e>(&'e self, goal: &CompiledGoal) -> Result<BindingStream<'e>> {
        let plan = goal.payload::<GoalPlan>().ok_or_else(|| {
            PrologError::Engine("goal was compiled by a different engine".to_string())
        })?;
        // Goal lists are stored reversed: the next goal is the last element
        let goals: Vec<Term> = plan.goals.iter().rev().cloned().collect();
        Ok(Box::new(SolveIter {
            db: &self.db,
            stack: vec![Frame {
                goals,
                subst: Subst::new(),
            }],
            vars: plan.vars.clone(),
            counter: 0,
        }))
    }

    fn consult(&self, theory_text: &str) -> Result<()> {
        let clauses = parser::parse_program(theory_text)?;
        let mut db = self.db.borrow_mut();
        for clause in clauses {
            db.add(clause)?;
        }
        Ok(())
    }

    fn assertz(&self, clause_text: &str) -> Result<()> {
        self.consult(clause_text)
    }

    fn retract(&self, clause_text: &str) -> Result<bool> {
        let clauses = parser::parse_program(clause_text)?;
        let mut db = self.db.borrow_mut();
        let mut removed = false;
        for clause in &clauses {
            removed |= db.retract(clause);
        }
        Ok(removed)
    }
}

/// Collect named variables in first-occurrence order. `_` and
/// underscore-prefixed names are hidden from projection.
fn collect_vars(term: &Term, out: &mut Vec<String>) {
    match term {
        Term::Var(name) => {
            if !name.starts_with('_') && !out.iter().any(|v| v == name) {
                out.push(name.clone());
            }
        }
        Term::Compound { args, .. } => {
            for arg in args {
                collect_vars(arg, out);
            }
        }
        Term::List { items, tail } => {
            for item in items {
                collect_vars(item, out);
            }
            if let Some(tail) = tail {
                collect_vars(tail, out);
            }
        }
        _ => {}
    }
}

type Subst = HashMap<String, Term>;

/// Follow variable bindings one level at a time until an unbound variable
/// or a non-variable term.
fn resolve_shallow<'a>(mut term: &'a Term, subst: &'a Subst) -> &'a Term {
    while let Term::Var(name) = term {
        match subst.get(name) {
            Some(next) => term = next,
            None => break,
        }
    }
    term
}

/// Fully apply a substitution, splicing bound list tails so proper lists
/// come out flat.
fn deep_resolve(term: &Term, subst: &Subst) -> Term {
    let term = resolve_shallow(term, subst);
    match term {
        Term::Atom(_) | Term::Int(_) | Term::Float(_) | Term::Var(_) => term.clone(),
        Term::Compound { functor, args } => Term::Compound {
            functor: functor.clone(),
            args: args.iter().map(|a| deep_resolve(a, subst)).collect(),
        },
        Term::List { items, tail } => {
            let mut out_items: Vec<Term> =
                items.iter().map(|i| deep_resolve(i, subst)).collect();
            let mut out_tail = tail.as_ref().map(|t| deep_resolve(t, subst));
            while let Some(Term::List { items, tail }) = out_tail {
                out_items.extend(items);
                out_tail = tail.map(|t| *t);
            }
            Term::List {
                items: out_items,
                tail: out_tail.map(Box::new),
            }
        }
    }
}

/// Unify two terms, extending `subst` on success. The anonymous variable
/// `_` matches anything without binding. No occurs check.
fn unify(a: &Term, b: &Term, subst: &mut Subst) -> bool {
    let a = resolve_shallow(a, subst).clone();
    let b = resolve_shallow(b, subst).clone();
    match (a, b) {
        (Term::Var(x), Term::Var(y)) if x == y => true,
        (Term::Var(x), t) | (t, Term::Var(x)) => {
            if x != "_" {
                subst.insert(x, t);
            }
            true
        }
        (Term::Atom(x), Term::Atom(y)) => x == y,
        (Term::Int(x), Term::Int(y)) => x == y,
        (Term::Float(x), Term::Float(y)) => x == y,
        (
            Term::Compound { functor: f, args: xs },
            Term::Compound { functor: g, args: ys },
        ) => f == g && xs.len() == ys.len() && {
            xs.iter().zip(&ys).all(|(x, y)| unify(x, y, subst))
        },
        (
            Term::List { items: xs, tail: xt },
            Term::List { items: ys, tail: yt },
        ) => unify_lists(&xs, xt.as_deref(), &ys, yt.as_deref(), subst),
        _ => false,
    }
}

/// Unify two lists element-wise, then reconcile the remainders.
fn unify_lists(
    xs: &[Term],
    xt: Option<&Term>,
    ys: &[Term],
    yt: Option<&Term>,
    subst: &mut Subst,
) -> bool {
    let n = xs.len().min(ys.len());
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        if !unify(x, y, subst) {
            return false;
        }
    }
    let x_left = &xs[n..];
    let y_left = &ys[n..];

    if !x_left.is_empty() {
        // y's elements ran out; its tail must cover the rest of x
        match yt {
            Some(tail) => unify(&partial(x_left, xt), tail, subst),
            None => false,
        }
    } else if !y_left.is_empty() {
        match xt {
            Some(tail) => unify(tail, &partial(y_left, yt), subst),
            None => false,
        }
    } else {
        match (xt, yt) {
            (None, None) => true,
            (Some(t), None) | (None, Some(t)) => unify(t, &Term::nil(), subst),
            (Some(x), Some(y)) => unify(x, y, subst),
        }
    }
}

fn partial(items: &[Term], tail: Option<&Term>) -> Term {
    Term::List {
        items: items.to_vec(),
        tail: tail.map(|t| Box::new(t.clone())),
    }
}

/// One branch of the search: remaining goals (reversed) plus the
/// substitution built so far.
struct Frame {
    goals: Vec<Term>,
    subst: Subst,
}

/// Lazy depth-first solution iterator. Suspends between solutions; each
/// `next()` resumes the machine where it left off.
struct SolveIter<'e> {
    db: &'e RefCell<Database>,
    stack: Vec<Frame>,
    vars: Vec<String>,
    counter: u64,
}

impl<'e> Iterator for SolveIter<'e> {
    type Item = Result<BindingSet>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let Frame { mut goals, subst } = frame;
            let Some(goal) = goals.pop() else {
                return Some(Ok(self.project(&subst)));
            };
            if let Err(e) = self.step(goal, goals, subst) {
                return Some(Err(e));
            }
        }
        None
    }
}

impl<'e> SolveIter<'e> {
    fn project(&self, subst: &Subst) -> BindingSet {
        let mut bindings = BindingSet::new();
        for name in &self.vars {
            bindings.bind(name.clone(), deep_resolve(&Term::Var(name.clone()), subst));
        }
        bindings
    }

    /// Resolve one goal, pushing successor frames for each alternative.
    fn step(&mut self, goal: Term, rest: Vec<Term>, subst: Subst) -> Result<()> {
        let goal = resolve_shallow(&goal, &subst).clone();
        match &goal {
            Term::Atom(name) => match name.as_str() {
                "true" => {
                    self.stack.push(Frame { goals: rest, subst });
                    Ok(())
                }
                "fail" | "false" => Ok(()),
                _ => {
                    self.call(name.clone(), Vec::new(), rest, subst);
                    Ok(())
                }
            },
            Term::Compound { functor, args } => match (functor.as_str(), args.len()) {
                ("=", 2) => {
                    let mut subst = subst;
                    if unify(&args[0], &args[1], &mut subst) {
                        self.stack.push(Frame { goals: rest, subst });
                    }
                    Ok(())
                }
                ("\\=", 2) => {
                    let mut probe = subst.clone();
                    if !unify(&args[0], &args[1], &mut probe) {
                        self.stack.push(Frame { goals: rest, subst });
                    }
                    Ok(())
                }
                ("assertz", 1) | ("assert", 1) => {
                    let clause = dynamic_clause(&args[0], &subst)?;
                    self.db.borrow_mut().add(clause)?;
                    self.stack.push(Frame { goals: rest, subst });
                    Ok(())
                }
                ("retract", 1) => {
                    let clause = dynamic_clause(&args[0], &subst)?;
                    if self.db.borrow_mut().retract(&clause) {
                        self.stack.push(Frame { goals: rest, subst });
                    }
                    Ok(())
                }
                _ => {
                    self.call(functor.clone(), args.clone(), rest, subst);
                    Ok(())
                }
            },
            Term::Var(_) => Err(PrologError::Engine(
                "goal is an unbound variable".to_string(),
            )),
            other => Err(PrologError::Engine(format!(
                "goal is not callable: {}",
                other
            ))),
        }
    }

    /// Try each clause of a user predicate, first clause on top of the
    /// stack. Unknown predicates have no clauses and fail silently.
    fn call(&mut self, functor: String, args: Vec<Term>, rest: Vec<Term>, subst: Subst) {
        let key = (functor.clone(), args.len());
        let clauses = self.db.borrow().clauses_for(&key);
        let goal_term = if args.is_empty() {
            Term::Atom(functor)
        } else {
            Term::Compound { functor, args }
        };
        for clause in clauses.iter().rev() {
            let renamed = self.rename_clause(clause);
            let mut branch = subst.clone();
            if unify(&goal_term, &renamed.head, &mut branch) {
                let mut goals = rest.clone();
                for body_goal in renamed.body.iter().rev() {
                    goals.push(body_goal.clone());
                }
                self.stack.push(Frame {
                    goals,
                    subst: branch,
                });
            }
        }
    }

    /// Rename clause variables apart from the query's.
    fn rename_clause(&mut self, clause: &Clause) -> Clause {
        let mut map = HashMap::new();
        let head = self.rename_term(&clause.head, &mut map);
        let body = clause
            .body
            .iter()
            .map(|g| self.rename_term(g, &mut map))
            .collect();
        Clause { head, body }
    }

    fn rename_term(&mut self, term: &Term, map: &mut HashMap<String, String>) -> Term {
        match term {
            Term::Var(name) if name != "_" => {
                let fresh = match map.get(name) {
                    Some(fresh) => fresh.clone(),
                    None => {
                        self.counter += 1;
                        let fresh = format!("_G{}", self.counter);
                        map.insert(name.clone(), fresh.clone());
                        fresh
                    }
                };
                Term::Var(fresh)
            }
            Term::Compound { functor, args } => Term::Compound {
                functor: functor.clone(),
                args: args.iter().map(|a| self.rename_term(a, map)).collect(),
            },
            Term::List { items, tail } => Term::List {
                items: items.iter().map(|i| self.rename_term(i, map)).collect(),
                tail: tail
                    .as_ref()
                    .map(|t| Box::new(self.rename_term(t, map))),
            },
            _ => term.clone(),
        }
    }
}

/// Build the clause a running `assertz`/`retract` goal refers to. Only
/// facts are supported dynamically; rules go through `Engine::consult`.
fn dynamic_clause(arg: &Term, subst: &Subst) -> Result<Clause> {
    let head = deep_resolve(arg, subst);
    match head {
        Term::Atom(_) | Term::Compound { .. } => Ok(Clause::fact(head)),
        other => Err(PrologError::Engine(format!(
            "cannot assert or retract {}",
            other
        ))),
    }
}
