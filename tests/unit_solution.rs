//! Unit tests for the solution cursor

use prologue::{PrologError, Prover, Term, Value};

fn prover() -> Prover {
    let p = Prover::sld();
    p.add_theory("human(socrates). human(plato). human(demokritos).")
        .unwrap();
    p
}

// ============================================================================
// is_success and get
// ============================================================================

#[test]
fn test_is_success_keeps_first_solution_current() {
    let p = prover();
    let mut solution = p.solve("human(X).").unwrap();
    assert!(solution.is_success().unwrap());
    // The first solution is still current for get()
    assert_eq!(solution.get::<String>().unwrap(), "socrates");
    // ...and still the first element of iteration
    let rest: Vec<String> = solution.to_list().unwrap();
    assert_eq!(rest, vec!["socrates", "plato", "demokritos"]);
}

#[test]
fn test_get_without_success_check() {
    let p = prover();
    let mut solution = p.solve("human(X).").unwrap();
    assert_eq!(solution.get::<String>().unwrap(), "socrates");
}

#[test]
fn test_get_var_selects_by_name() {
    let p = prover();
    let mut solution = p
        .solve("member(X, [2, 3, 4]), member(Y, [5, 6, 7]).")
        .unwrap();
    assert_eq!(solution.get_var::<i64>("X").unwrap(), 2);
    assert_eq!(solution.get_var::<i64>("Y").unwrap(), 5);
}

#[test]
fn test_get_unknown_variable() {
    let p = prover();
    let mut solution = p.solve("human(socrates).").unwrap();
    let err = solution.get_var::<String>("X").unwrap_err();
    assert!(matches!(err, PrologError::UnknownVariable(name) if name == "X"));
}

#[test]
fn test_get_on_zero_solutions_is_no_solution() {
    let p = prover();
    let mut solution = p.solve("human(zeus).").unwrap();
    let err = solution.get::<String>().unwrap_err();
    assert!(matches!(err, PrologError::NoSolution));
}

// ============================================================================
// Zero-solution goals
// ============================================================================

#[test]
fn test_zero_solutions() {
    let p = prover();
    let mut solution = p.solve("human(zeus).").unwrap();
    assert!(!solution.is_success().unwrap());

    let mut solution = p.solve("human(zeus).").unwrap();
    assert_eq!(solution.to_list::<Value>().unwrap(), Vec::<Value>::new());

    let mut solution = p.solve("human(zeus).").unwrap();
    assert!(solution.to_set::<String>().unwrap().is_empty());
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn test_on_projects_named_variable() {
    let p = prover();
    let mut solution = p.solve("human(H).").unwrap();
    let names: Vec<String> = solution.on("H").collect::<Result<_, _>>().unwrap();
    assert_eq!(names, vec!["socrates", "plato", "demokritos"]);
}

#[test]
fn test_on_continues_rather_than_restarting() {
    let p = prover();
    let mut solution = p.solve("append(X, Y, [a, b]).").unwrap();

    // Drain one of the three splits...
    let first: Vec<Term> = solution.on::<Term>("X").take(1).collect::<Result<_, _>>().unwrap();
    assert_eq!(first, vec![Term::nil()]);

    // ...a later projection yields the remaining two, not all three again
    let rest: Vec<Term> = solution.on("X").collect::<Result<_, _>>().unwrap();
    assert_eq!(
        rest,
        vec![
            Term::list(vec![Term::atom("a")]),
            Term::list(vec![Term::atom("a"), Term::atom("b")]),
        ]
    );
}

#[test]
fn test_default_iteration_projects_last_variable() {
    let p = prover();
    let mut solution = p.solve("member(X, [1, 2, 3]).").unwrap();
    let mut count = 0;
    for value in &mut solution {
        let value = value.unwrap();
        assert!(matches!(value, Value::Int(_)));
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_typed_iteration() {
    let p = prover();
    let mut solution = p.solve("member(X, [0, 1, 2]).").unwrap();
    let xs: Vec<i64> = solution.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(xs, vec![0, 1, 2]);
}

#[test]
fn test_raw_term_projection_bypasses_conversion() {
    let p = prover();
    let mut solution = p.solve("X = f(a).").unwrap();
    let term: Term = solution.get().unwrap();
    assert_eq!(term, Term::compound("f", vec![Term::atom("a")]));
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_to_set_deduplicates_by_converted_equality() {
    let p = prover();
    p.add_theory("color(red). color(green). color(red).").unwrap();
    let set = p.solve("color(C).").unwrap().to_set::<String>().unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("red"));
    assert!(set.contains("green"));
}

#[test]
fn test_bulk_drain_fails_on_first_conversion_error() {
    let p = prover();
    // The second solution is an atom, which does not convert to i64
    let mut solution = p.solve("member(X, [1, oops, 3]).").unwrap();
    let result = solution.to_list::<i64>();
    assert!(matches!(result, Err(PrologError::Conversion(_))));
}

#[test]
fn test_single_step_conversion_error_does_not_kill_cursor() {
    let p = prover();
    let mut solution = p.solve("member(X, [1, oops, 3]).").unwrap();
    let mut projection = solution.iter::<i64>();
    assert_eq!(projection.next().unwrap().unwrap(), 1);
    assert!(projection.next().unwrap().is_err());
    // The cursor is still usable past the failing binding
    assert_eq!(projection.next().unwrap().unwrap(), 3);
    assert!(projection.next().is_none());
}
