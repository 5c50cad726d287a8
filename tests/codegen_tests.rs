use mtlang::ast::{Block, Expr, FunctionExpr, Program};
use mtlang::codegen::runtime::CURRY_HELPER;
use mtlang::codegen::Generator;

fn compile_str(input: &str) -> String {
    match mtlang::compile(input) {
        Ok(code) => code,
        Err(error) => panic!("compilation of {input:?} failed: {error}"),
    }
}

fn with_helper(code: &str) -> String {
    format!("{CURRY_HELPER}\n{code}")
}

#[test]
fn reference_examples() {
    let cases = [
        ("(add 1 -2 3)", "add(1, -2, 3);"),
        (r#"(concat "1" "2")"#, r#"concat("1", "2");"#),
        ("(eq !true false)", "eq(!true, false);"),
        ("(def mean (plus 40 2))", "const mean = plus(40, 2);"),
        ("(def value nil)", "const value = null;"),
        ("[1 2 3]/0", "[1, 2, 3][0];"),
        ("Date/now", "Date.now;"),
        ("(Date/now)", "Date.now();"),
        ("(+ 2 2)", "(2 + 2);"),
        ("(and true false)", "(true && false);"),
    ];
    for (source, expected) in cases {
        assert_eq!(compile_str(source), expected, "{source}");
    }
}

#[test]
fn operators_map_to_javascript_spellings() {
    let cases = [
        ("(= a b)", "(a === b);"),
        ("(!= a b)", "(a !== b);"),
        ("(or a b)", "(a || b);"),
        ("(% a b)", "(a % b);"),
        ("(>>> a 2)", "(a >>> 2);"),
        ("(<= a b)", "(a <= b);"),
        ("(^ a b)", "(a ^ b);"),
        ("~a", "~a;"),
        ("!(f x)", "!f(x);"),
        ("-(+ 1 2)", "-(1 + 2);"),
    ];
    for (source, expected) in cases {
        assert_eq!(compile_str(source), expected, "{source}");
    }
}

#[test]
fn double_negation_is_parenthesized() {
    assert_eq!(compile_str("--x"), "-(-x);");
    assert_eq!(compile_str("-!x"), "-!x;");
}

#[test]
fn closures_are_parenthesized_as_operands() {
    assert_eq!(compile_str("!|x| x"), "!((x) => {\n  return x;\n});");
    assert_eq!(
        compile_str("(+ |x| x 1)"),
        "(((x) => {\n  return x;\n}) + 1);"
    );
    assert_eq!(
        compile_str("(+ 1 |x| x)"),
        "(1 + ((x) => {\n  return x;\n}));"
    );
}

#[test]
fn literals_render_canonically() {
    assert_eq!(compile_str("1_000.50"), "1000.5;");
    assert_eq!(compile_str("0.25"), "0.25;");
    assert_eq!(compile_str(r#""tab\there""#), r#""tab\there";"#);
    assert_eq!(compile_str("[]"), "[];");
    assert_eq!(compile_str("nil"), "null;");
}

#[test]
fn member_access_forms() {
    assert_eq!(compile_str("a/b/c"), "a.b.c;");
    assert_eq!(compile_str(r#"obj/"key""#), r#"obj["key"];"#);
    assert_eq!(compile_str("xs/(+ i 1)"), "xs[(i + 1)];");
    assert_eq!(compile_str("(1/toFixed 2)"), "(1).toFixed(2);");
}

#[test]
fn print_converts_to_string() {
    assert_eq!(compile_str("(print \"hi\")"), "console.log(String(\"hi\"));");
    assert_eq!(compile_str("(print (+ 1 2))"), "console.log(String((1 + 2)));");
}

#[test]
fn method_chains() {
    assert_eq!(
        compile_str("(~> xs ~> (map f) ~> length)"),
        "xs.map(f).length();"
    );
    assert_eq!(compile_str("(~> xs ~> (a/b 1))"), "xs[a.b](1);");
    assert_eq!(compile_str("(~> 5 ~> toString)"), "(5).toString();");
}

#[test]
fn single_parameter_closures_are_plain_arrows() {
    assert_eq!(compile_str("|x| (* x 2)"), "(x) => {\n  return (x * 2);\n};");
    assert_eq!(compile_str("|| 1"), "() => {\n  return 1;\n};");
}

#[test]
fn multi_parameter_closures_are_curried() {
    assert_eq!(
        compile_str("(def add |a b| (+ a b))"),
        with_helper("const add = __curry((a, b) => {\n  return (a + b);\n});")
    );
}

#[test]
fn curry_helper_is_emitted_once() {
    let code = compile_str("(def add |a b| (+ a b))\n(def mul |a b c| (* a (* b c)))");
    assert_eq!(code.matches("const __curry").count(), 1);
    assert!(code.starts_with(CURRY_HELPER));
    assert_eq!(code.matches("__curry((").count(), 2);
}

#[test]
fn curry_helper_is_omitted_when_unused() {
    let code = compile_str("(def inc |x| (+ x 1))\n(def (add a b) (+ a b))");
    assert!(!code.contains("__curry"));
}

#[test]
fn nested_closures_indent_by_depth() {
    assert_eq!(
        compile_str("|x| |y| (+ x y)"),
        "(x) => {\n  return (y) => {\n    return (x + y);\n  };\n};"
    );
}

#[test]
fn closures_are_parenthesized_when_called() {
    assert_eq!(
        compile_str("(|x| x 1)"),
        "((x) => {\n  return x;\n})(1);"
    );
}

#[test]
fn function_declarations() {
    assert_eq!(
        compile_str("(def (square x) (* x x))"),
        "function square(x) {\n  return (x * x);\n};"
    );
    assert_eq!(
        compile_str("(def (greet name)\n  (print name)\n  (concat \"hi \" name))"),
        "function greet(name) {\n  console.log(String(name));\n  return concat(\"hi \", name);\n};"
    );
}

#[test]
fn trailing_declaration_returns_its_name() {
    assert_eq!(
        compile_str("(def (f) (def y 1))"),
        "function f() {\n  const y = 1;\n  return y;\n};"
    );
}

#[test]
fn blocks_are_immediately_invoked() {
    assert_eq!(
        compile_str("{ (def x 1) (+ x 1) }"),
        "(() => {\n  const x = 1;\n  return (x + 1);\n})();"
    );
    assert_eq!(compile_str("{}"), "(() => {})();");
}

#[test]
fn cond_with_else() {
    assert_eq!(
        compile_str("(cond (> x 1) \"big\" else \"small\")"),
        "(() => {\n  if ((x > 1)) {\n    return \"big\";\n  } else {\n    return \"small\";\n  }\n})();"
    );
}

#[test]
fn cond_keeps_branch_order_without_else() {
    assert_eq!(
        compile_str("(cond a 1 b 2)"),
        "(() => {\n  if (a) {\n    return 1;\n  } else if (b) {\n    return 2;\n  }\n})();"
    );
}

#[test]
fn statements_are_joined_by_newlines() {
    assert_eq!(
        compile_str("(def x 1)\n(print x)"),
        "const x = 1;\nconsole.log(String(x));"
    );
}

#[test]
fn parse_errors_generate_nothing() {
    let (program, state) = mtlang::parse("(def x)\n(print 1)\n(+ 1)");
    assert_eq!(state.errors().len(), 2);
    let program = program.expect("partial program");
    assert_eq!(mtlang::generate(&program), "console.log(String(1));");
}

#[test]
fn parse_errors_inside_blocks_are_skipped() {
    let error = mtlang::error::ParseError::new("broken", 1, 0, 1);
    let program = Program::new(vec![Expr::Function(FunctionExpr {
        params: vec!["x".to_string()],
        body: Block::new(vec![Expr::identifier("x"), Expr::ParseError(error)]),
    })]);
    assert_eq!(mtlang::generate(&program), "(x) => {\n  return x;\n};");
}

#[test]
fn generation_is_idempotent() {
    let source = "(def add |a b| (+ a b))\n(print (~> [1 2 3] ~> (map (add 1))))";
    let (program, _) = mtlang::parse(source);
    let program = program.expect("program");
    let first = mtlang::generate(&program);
    let second = mtlang::generate(&program);
    assert_eq!(first, second);
    assert_eq!(compile_str(source), first);
}

#[test]
fn generator_tracks_curry_usage() {
    let mut generator = Generator::new();
    assert!(!generator.needs_curry());
    generator.expression(&Expr::Function(FunctionExpr {
        params: vec!["a".to_string()],
        body: Block::default(),
    }));
    assert!(!generator.needs_curry());
    let rendered = generator.expression(&Expr::Function(FunctionExpr {
        params: vec!["a".to_string(), "b".to_string()],
        body: Block::default(),
    }));
    assert_eq!(rendered, "__curry((a, b) => {})");
    assert!(generator.needs_curry());
}
