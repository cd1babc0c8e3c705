//! Unit tests for the prover facade: the full query/conversion surface
//! exercised end to end against the bundled engine.

use std::collections::HashSet;

use prologue::{
    from_registered, values, Compound, ConversionPolicy, FromTerm, PrologError, Prover, Term,
    Value,
};

fn prover() -> Prover {
    let p = Prover::sld();
    p.add_theory("mortal(X) :- human(X). human(socrates). human(plato).")
        .unwrap();
    p
}

fn assert_success(p: &Prover, goal: &str, args: Vec<Value>) {
    let mut solution = p.solve_with(goal, args).expect("solve failed");
    assert!(solution.is_success().unwrap(), "expected success: {}", goal);
}

fn assert_failure(p: &Prover, goal: &str, args: Vec<Value>) {
    let mut solution = p.solve_with(goal, args).expect("solve failed");
    assert!(!solution.is_success().unwrap(), "expected failure: {}", goal);
}

// ============================================================================
// Queries and placeholders
// ============================================================================

#[test]
fn test_invalid_query() {
    let p = prover();
    assert!(matches!(
        p.solve("mortal(socrates"),
        Err(PrologError::InvalidQuery { .. })
    ));
    assert!(matches!(
        p.solve("mortal(socrates)"),
        Err(PrologError::InvalidQuery { .. })
    ));
}

#[test]
fn test_is_success() {
    let p = prover();
    assert_success(&p, "mortal(socrates).", values![]);
    assert_failure(&p, "mortal(zeus).", values![]);
}

#[test]
fn test_placeholders() {
    let p = prover();
    assert_success(&p, "mortal(?).", values!["socrates"]);
    assert_failure(&p, "mortal(?).", values!["zeus"]);
    assert_success(&p, "mortal(?X).", values!["socrates"]);
    assert_failure(&p, "mortal(?X).", values!["zeus"]);
    assert_success(&p, "mortal(?LongVariable).", values!["socrates"]);
    assert_failure(&p, "mortal(?LongVariable).", values!["zeus"]);
    assert_success(&p, "_ = 'Question ??Mark'.", values![]);
    assert_success(&p, "? = '??Mark'.", values!["?Mark"]);
    assert_success(&p, "'Is it OK??' = ?.", values!["Is it OK?"]);
    assert_success(&p, "'????' = ?.", values!["??"]);
    assert_success(&p, "member(X, ?).", values![vec![0i64, 1, 2]]);

    let mut solution = p
        .solve_with("member(X, ?).", values![vec![0i64, 1, 2]])
        .unwrap();
    let list: Vec<i64> = solution.to_list().unwrap();
    assert_eq!(list, vec![0, 1, 2]);
}

#[test]
fn test_anonymous_and_named_share_one_argument_stream() {
    // mortal(?) and mortal(?X) behave identically for the same argument
    let p = prover();
    for goal in ["mortal(?).", "mortal(?X)."] {
        assert_success(&p, goal, values!["socrates"]);
        assert_failure(&p, goal, values!["zeus"]);
    }
}

#[test]
fn test_unknown_variable() {
    let p = prover();
    let err = p
        .solve("mortal(socrates).")
        .unwrap()
        .get_var::<String>("X")
        .unwrap_err();
    assert!(matches!(err, PrologError::UnknownVariable(name) if name == "X"));
}

#[test]
fn test_iterable() {
    let p = prover();
    let mortals: Vec<String> = p.solve("mortal(X).").unwrap().to_list().unwrap();
    assert_eq!(mortals, vec!["socrates", "plato"]);

    let mut count = 0;
    for value in &mut p.solve("member(X, [0, 1, 2]).").unwrap() {
        value.unwrap();
        count += 1;
    }
    assert_eq!(count, 3);

    for _ in &mut p.solve("member(X, 1).").unwrap() {
        panic!("member(X, 1) must have no solutions");
    }
    let mut solution = p.solve("member(X, 1).").unwrap();
    for _ in solution.on::<Value>("X") {
        panic!("member(X, 1) must have no solutions");
    }
}

#[test]
fn test_prepared_query() {
    let p = prover();
    let q = p.query("member(?, [1, 2, 3]).");
    assert_eq!(q.template().source(), "member(?, [1, 2, 3]).");
    assert_eq!(q.template().placeholder_count(), 1);
    assert!(!q.solve(values![4]).unwrap().is_success().unwrap());
    assert!(q.solve(values![1]).unwrap().is_success().unwrap());
}

#[test]
fn test_is_member_with_named_placeholder() {
    let p = prover();
    let philosophers = vec!["socrates", "plato"];
    assert_success(&p, "member(X, ?List).", values![philosophers]);
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_get_by_name() {
    let p = prover();
    let mut solve = p
        .solve("member(X, [2, 3, 4]), member(Y, [5, 6, 7]).")
        .unwrap();
    assert_eq!(solve.get_var::<i64>("X").unwrap(), 2);
    let mut solve2 = p
        .solve("member(X, [2, 3, 4]), member(Y, [5, 6, 7]).")
        .unwrap();
    assert_eq!(solve2.get_var::<i64>("Y").unwrap(), 5);
}

#[test]
fn test_on() {
    let p = prover();
    let philosophers = vec!["socrates", "plato"];
    let mut solution = p
        .solve_with("member(X, ?List).", values![philosophers.clone()])
        .unwrap();
    let list: Vec<String> = solution.on("X").collect::<Result<_, _>>().unwrap();
    assert_eq!(list, vec!["socrates", "plato"]);

    let mut solution2 = p
        .solve_with("member(X, ?List).", values![philosophers])
        .unwrap();
    let list: Vec<String> = solution2.on("X").collect::<Result<_, _>>().unwrap();
    assert_eq!(list, vec!["socrates", "plato"]);
}

#[test]
fn test_list_result() {
    let p = prover();
    let h1 = vec!["socrates"];
    let h2 = vec!["thales", "plato"];

    let mut solution = p
        .solve_with("append(?L1, ?L2, L12).", values![h1, h2])
        .unwrap();
    let mut it = solution.on::<Vec<String>>("L12");
    let first = it.next().expect("one solution").unwrap();
    assert_eq!(first, vec!["socrates", "thales", "plato"]);
    assert!(it.next().is_none());
}

#[test]
fn test_array_result() {
    let p = prover();
    let h1 = vec!["socrates"];
    let h3 = vec!["socrates", "homeros", "demokritos"];
    let mut solution = p
        .solve_with("append(?L1, L2, ?L12).", values![h1, h3])
        .unwrap();
    let humans: Vec<Vec<String>> = solution.on("L2").collect::<Result<_, _>>().unwrap();
    assert_eq!(humans, vec![vec!["homeros", "demokritos"]]);
}

// ============================================================================
// Term construction and conversion
// ============================================================================

#[test]
fn test_term_pattern() {
    let p = prover();
    let cp = p.conversion_policy();
    assert_success(&p, "? = a.", values![cp.term("a").unwrap()]);
    assert_success(&p, "? = 1.", values![cp.term("1").unwrap()]);
    assert_success(&p, "? = cpd(a).", values![cp.term("cpd(a)").unwrap()]);
    assert_success(
        &p,
        "? = cpd(a).",
        values![cp.term_with("cpd(?)", values!["a"]).unwrap()],
    );
    assert_success(&p, "? = [a, b, c].", values![cp.term("[a, b, c]").unwrap()]);
    assert_success(
        &p,
        "? = [a, b, c].",
        values![cp.term_with("[?, b, c]", values!["a"]).unwrap()],
    );
    assert_success(
        &p,
        "? = [a, b, c].",
        values![cp.term_with("[?, ?, c]", values!["a", "b"]).unwrap()],
    );
}

#[test]
fn test_term_converters() {
    let p = prover();
    let i_val: i64 = p.solve("X = 1.").unwrap().get().unwrap();
    assert_eq!(i_val, 1);
    let d_val: f64 = p.solve("X = 1.0.").unwrap().get().unwrap();
    assert_eq!(d_val, 1.0);
    let s_val: String = p.solve("X = prologue.").unwrap().get().unwrap();
    assert_eq!(s_val, "prologue");

    let li_val: Vec<i64> = p.solve("X = [0, 1, 2].").unwrap().get().unwrap();
    assert_eq!(li_val, vec![0, 1, 2]);
    let ls_val: Vec<String> = p.solve("X = [a, b, c].").unwrap().get().unwrap();
    assert_eq!(ls_val, vec!["a", "b", "c"]);

    let c_val: Compound = p.solve("X = functor(arg1, arg2).").unwrap().get().unwrap();
    assert_eq!(c_val, Compound::new("functor", values!["arg1", "arg2"]));
}

#[test]
fn test_object_converters() {
    let p = prover();
    assert_success(&p, "? = 1.", values![1]);
    assert_failure(&p, "? = 1.", values![1.0]);
    assert_failure(&p, "? = 1.", values![2]);
    assert_success(&p, "? = 1.0.", values![1.0]);
    assert_failure(&p, "? = 1.0.", values![1]);
    assert_failure(&p, "? = 1.0.", values![2.0]);
    assert_success(&p, "? = prologue.", values!["prologue"]);
    assert_success(&p, "? = 'Prologue'.", values!["Prologue"]);
    assert_failure(&p, "? = prologue.", values!["Prologue"]);
    assert_failure(&p, "? = prologue.", values!["'prologue'"]);
    assert_success(&p, "? = '2'.", values!["2"]);
    assert_failure(&p, "? = 2.", values!["2"]);
    assert_failure(&p, "? = '2'.", values![2]);

    assert_success(&p, "? = [0, 1, 2].", values![vec![0i64, 1, 2]]);
    assert_success(&p, "? = [a, b, c].", values![vec!["a", "b", "c"]]);

    assert_success(&p, "? = f(1, 2).", values![Compound::new("f", values![1, 2])]);
}

// ============================================================================
// User-defined converters
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct Human {
    name: String,
}

impl FromTerm for Human {
    fn from_term(term: &Term, policy: &ConversionPolicy) -> prologue::Result<Self> {
        from_registered(term, policy)
    }
}

#[test]
fn test_custom_object_converter() {
    let p = prover();
    p.conversion_policy().add_object_converter::<Human, _>(|human, cp| {
        cp.term_with("human(?)", values![human.name.clone()]).map(Some)
    });

    let socrates = || Value::other(Human {
        name: "socrates".to_string(),
    });
    assert_success(&p, "? = human(socrates).", vec![socrates()]);
    assert_success(&p, "? = human(_).", vec![socrates()]);
    assert_failure(&p, "? = human(socrates, plato).", vec![socrates()]);
    assert_failure(&p, "? = socrates.", vec![socrates()]);
}

#[test]
fn test_unregistered_user_value_has_no_converter() {
    let p = prover();
    let err = p
        .solve_with("? = x.", vec![Value::other(Human {
            name: "socrates".to_string(),
        })])
        .unwrap_err();
    assert!(matches!(err, PrologError::NoConverterFound(_)));
}

#[test]
fn test_custom_term_converter() {
    let p = prover();
    p.conversion_policy().add_term_converter("human", |term, cp| {
        if term.arity() == 1 {
            let name: String = String::from_term(term.arg(0)?, cp)?;
            Ok(Some(Value::other(Human { name })))
        } else {
            // Does not apply; fall through to the built-in rules
            Ok(None)
        }
    });

    let socrates: Human = p.solve("H = human(socrates).").unwrap().get().unwrap();
    assert_eq!(
        socrates,
        Human {
            name: "socrates".to_string()
        }
    );

    // Arity 2 falls through to the generic compound rule
    let other: Compound = p.solve("H = human(a, b).").unwrap().get().unwrap();
    assert_eq!(other.functor, "human");
}

#[test]
fn test_exact_arity_converter_takes_precedence() {
    let p = prover();
    let cp = p.conversion_policy();
    cp.add_term_converter("tag", |_, _| Ok(Some(Value::Str("any".to_string()))));
    cp.add_term_converter_with_arity("tag", 1, |_, _| Ok(Some(Value::Str("one".to_string()))));

    let v: String = p.solve("X = tag(a).").unwrap().get().unwrap();
    assert_eq!(v, "one");
    let v: String = p.solve("X = tag(a, b).").unwrap().get().unwrap();
    assert_eq!(v, "any");
}

// ============================================================================
// Theories and dynamic facts
// ============================================================================

#[test]
fn test_add_theory() {
    let p = prover();
    p.add_theory("greek(socrates).").unwrap();
    p.add_theory("greek(demokritos).").unwrap();
    p.add_theory("greek(plato).").unwrap();
    let greeks: HashSet<String> = p.solve("greek(H).").unwrap().to_set().unwrap();
    let expected: HashSet<String> = ["socrates", "plato", "demokritos"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(greeks, expected);
}

#[test]
fn test_assert_via_goal() {
    let p = prover();
    p.solve("assertz(roman(michelangelo)).").unwrap().is_success().unwrap();
    p.solve("assertz(roman(davinci)).").unwrap().is_success().unwrap();
    p.solve("assertz(roman(iulius)).").unwrap().is_success().unwrap();
    let romans: HashSet<String> = p.solve("roman(H).").unwrap().to_set().unwrap();
    let expected: HashSet<String> = ["michelangelo", "davinci", "iulius"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(romans, expected);
}

#[test]
fn test_weak_facts() {
    let p = prover();
    p.assertz("roman2(michelangelo).").unwrap();
    p.assertz("roman2(davinci).").unwrap();
    p.assertz("roman2(iulius).").unwrap();
    let mut expected: HashSet<String> = ["michelangelo", "davinci", "iulius"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let romans: HashSet<String> = p.solve("roman2(H).").unwrap().to_set().unwrap();
    assert_eq!(romans, expected);

    p.retract("roman2(iulius).").unwrap();
    expected.remove("iulius");
    let romans: HashSet<String> = p.solve("roman2(H).").unwrap().to_set().unwrap();
    assert_eq!(romans, expected);
}

#[test]
fn test_format_elements() {
    let p = prover();
    assert_success(&p, "member(?, [1, 2, 3]).", values![1]);
}
