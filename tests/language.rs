use tamarin::{new_interpreter, Engine};

fn run(input: &str) -> anyhow::Result<String> {
    new_interpreter().run(input)
}

#[test]
fn programs_produce_expected_values() {
    let cases = vec![
        ("5 + 5 * 2", "15"),
        ("(1 + 2) * 3 == 9", "true"),
        (
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            "10",
        ),
        (
            "let add = fn(a, b) { a + b; }; add(add(1,2), add(3,4));",
            "10",
        ),
        (
            "let counter = fn(x) { fn() { x } }; let c = counter(42); c();",
            "42",
        ),
        (r#"len("hello world")"#, "11"),
        (
            "let twice = fn(f, x) { f(f(x)) }; twice(fn(n) { n + 3 }, 4);",
            "10",
        ),
        (
            "let make_adder = fn(x) { fn(y) { x + y } }; let add5 = make_adder(5); add5(10);",
            "15",
        ),
        (r#""tam" + "arin""#, "tamarin"),
        (
            r#"let x = if (5 * 2 == 10) { "yes" } else { "no" }; x"#,
            "yes",
        ),
        ("if (false) { 10 }", "null"),
        ("fn() {}()", "null"),
        ("[1, 2, 3][0] + [4][0]", "5"),
        (r#"[1, "two", true]"#, r#"[1, two, true]"#),
    ];

    for (input, expected) in cases {
        let output = run(input).unwrap_or_else(|err| panic!("{} failed: {}", input, err));
        assert_eq!(output, expected, "input: {}", input);
    }
}

#[test]
fn runtime_errors_render_with_the_error_prefix() {
    let cases = vec![
        ("5 + true;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
        ("foobar", "ERROR: identifier not found: foobar"),
        ("-true", "ERROR: unknown operator: -BOOLEAN"),
        (
            r#""Hello" - "World""#,
            "ERROR: unknown operator: STRING - STRING",
        ),
    ];

    for (input, expected) in cases {
        let err = run(input).expect_err(input);
        assert_eq!(format!("ERROR: {}", err), expected, "input: {}", input);
    }
}

#[test]
fn bindings_survive_across_runs() {
    let mut engine = new_interpreter();

    engine.run("let x = 5;").unwrap();
    engine.run("let double = fn(n) { n * 2 };").unwrap();

    assert_eq!(engine.run("double(x)").unwrap(), "10");
}

#[test]
fn state_survives_a_failed_run() {
    let mut engine = new_interpreter();

    engine.run("let x = 5;").unwrap();
    engine.run("x + true").unwrap_err();

    assert_eq!(engine.run("x").unwrap(), "5");
}

#[test]
fn parse_errors_refuse_evaluation() {
    let mut engine = new_interpreter();

    let err = engine.run("let x 5;").unwrap_err();
    assert!(err
        .to_string()
        .contains("expected next token to be =, found 5"));

    // the failed program must not have bound anything
    let err = engine.run("x").unwrap_err();
    assert_eq!(err.to_string(), "identifier not found: x");
}
