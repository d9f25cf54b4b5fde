use exact_calc::{CalcError, ErrorKind, Outcome, Solver, Value, ABORTED};

fn solve_all(lines: &[&str]) -> Vec<String> {
    let mut solver = Solver::new();
    lines.iter().map(|line| solver.solve(line)).collect()
}

#[test]
fn standard_precedence() {
    let solver = Solver::new();
    assert_eq!(solver.evaluate("3+4*2"), Value::integer(11));
    assert_eq!(solver.evaluate("3 + 4 * 2 - 6 / 3 ^ 1"), Value::integer(9));
    assert_eq!(solver.evaluate("2^3^2"), Value::integer(64));
}

#[test]
fn brackets_and_functions() {
    let solver = Solver::new();
    assert_eq!(solver.evaluate("(1+2)^2"), Value::integer(9));
    assert_eq!(solver.evaluate("sqrt(16)"), Value::integer(4));
    assert_eq!(solver.evaluate("exp(0)*(2+ln(1))"), Value::integer(2));
}

#[test]
fn fractions_stay_exact() {
    let solver = Solver::new();
    let value = solver.evaluate("1/3+1/3");
    assert!(value.is_exact());
    assert_eq!(value.to_string(), "2/3");
}

#[test]
fn declarations_round_trip() {
    assert_eq!(
        solve_all(&["x=5", "x*2", "x=7", "x+1"]),
        vec!["x = 5", "Ans = 10", "x = 7", "Ans = 8"]
    );
}

#[test]
fn ans_tracks_the_last_calculation() {
    assert_eq!(solve_all(&["ans"]), vec![ABORTED]);
    assert_eq!(
        solve_all(&["3/4", "ans+1", "y = 100", "ans*2"]),
        vec!["Ans = 3/4", "Ans = 7/4", "y = 100", "Ans = 7/2"]
    );
}

#[test]
fn malformed_input_is_rejected() {
    assert_eq!(solve_all(&["(1+2", "1+*2", "", "2+", "sin", "1=2"]), vec![ABORTED; 6]);
}

#[test]
fn power_edge_cases() {
    let mut solver = Solver::new();
    assert_eq!(solver.solve("2^-2"), "Ans = 1/4");
    assert_eq!(solver.solve("(-4)^0.5"), ABORTED);
    assert_eq!(
        solver.solve_checked("(-4)^0.5").map_err(|e| e.kind()),
        Err(ErrorKind::arithmetic)
    );
}

#[test]
fn literal_exactness_boundary() {
    let mut solver = Solver::new();
    assert_eq!(solver.solve("0.12345"), "Ans = 2469/20000");
    assert!(solver.environment().ans().is_some_and(Value::is_exact));

    assert_eq!(solver.solve("0.123456"), "Ans = 0.123456");
    assert!(solver.environment().ans().is_some_and(|value| !value.is_exact()));

    assert_eq!(solver.solve("0.123456*0+1"), "Ans = 1.000000");
}

#[test]
fn approximations_print_six_decimals() {
    assert_eq!(solve_all(&["pi", "e^2"]), vec!["Ans = 3.141593", "Ans = 7.389056"]);
}

#[test]
fn constant_names_cannot_be_declared() {
    let mut solver = Solver::new();
    assert_eq!(
        solver.solve_checked("e = 3"),
        Err(CalcError::constant_redeclared("e".into()))
    );
    assert_eq!(solver.solve("e = 3"), ABORTED);
    assert_eq!(solver.environment().variables().count(), 0);
}

#[test]
fn outcome_carries_the_value() {
    let mut solver = Solver::new();
    let outcome = solver.solve_checked("half = 0.5").unwrap();
    assert_eq!(outcome.value(), &Value::fraction(1, 2));
    assert!(matches!(outcome, Outcome::declaration { ref name, .. } if name == "half"));
    assert_eq!(solver.solve("half * half"), "Ans = 1/4");
}

#[test]
fn leading_minus_before_a_bracket_negates_the_rest() {
    assert_eq!(
        solve_all(&["-(2)-3", "-(1)+5", "-(2)^2", "-3^2"]),
        vec!["Ans = 1", "Ans = -6", "Ans = -4", "Ans = 9"]
    );
}
