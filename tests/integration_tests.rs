use mtlang::fmt::StateReport;

fn render_ast(input: &str) -> String {
    let (program, _) = mtlang::parse(input);
    program.expect("program").to_string()
}

#[test]
fn compile_small_program() {
    let source = r#"
; greet everyone in a list
(def greeting "hello")
(def (greet name) (concat greeting " " name))
(def join_all |sep xs| (~> xs ~> (map greet) ~> (join sep)))
(print (join_all ", " ["ada" "grace"]))
"#;
    let expected = [
        mtlang::codegen::runtime::CURRY_HELPER,
        "const greeting = \"hello\";",
        "function greet(name) {\n  return concat(greeting, \" \", name);\n};",
        "const join_all = __curry((sep, xs) => {\n  return xs.map(greet).join(sep);\n});",
        "console.log(String(join_all(\", \", [\"ada\", \"grace\"])));",
    ]
    .join("\n");

    assert_eq!(mtlang::compile(source).expect("compiles"), expected);
}

#[test]
fn print_call_tree() {
    assert_eq!(
        render_ast("(add 1 x)"),
        "Program\n  Call\n    callee:\n      Identifier add\n    args:\n      Number 1\n      Identifier x\n"
    );
}

#[test]
fn print_nested_tree() {
    let expected = "\
Program
  VariableDecl f
    Function |a|
      body:
        BinaryOp +
          left:
            Identifier a
          right:
            Number 1
  Member
    target:
      Array
        items: []
    key:
      String \"length\"
";
    assert_eq!(render_ast("(def f |a| (+ a 1))\n[]/\"length\""), expected);
}

#[test]
fn print_parse_error_nodes() {
    let rendered = render_ast("(f 1");
    assert_eq!(
        rendered,
        "Program\n  ParseError Expected ')' closing a call at line 1 (0..4)\n"
    );
}

#[test]
fn state_report_lists_errors() {
    let (_, state) = mtlang::parse("(f 1");
    assert_eq!(
        StateReport(&state).to_string(),
        "State at offset 4 (line 1, column 4) of 4\n  Expected ')' closing a call at line 1 (0..4)\n"
    );

    let (_, state) = mtlang::parse("x\ny");
    assert_eq!(
        StateReport(&state).to_string(),
        "State at offset 3 (line 2, column 1) of 3\n  no errors\n"
    );
}

#[test]
fn program_serializes_to_json() {
    let (program, _) = mtlang::parse("(f 1 nil)");
    let json = serde_json::to_value(program.expect("program")).expect("serializes");

    let call = &json["body"][0];
    assert_eq!(call["kind"], "Call");
    assert_eq!(call["callee"]["kind"], "Identifier");
    assert_eq!(call["callee"]["name"], "f");
    assert_eq!(call["args"][0]["value"], 1.0);
    assert_eq!(call["args"][1]["kind"], "Nil");
}

#[test]
fn parse_errors_serialize_with_their_span() {
    let (program, _) = mtlang::parse("[1");
    let json = serde_json::to_value(program.expect("program")).expect("serializes");

    let error = &json["body"][0];
    assert_eq!(error["kind"], "ParseError");
    assert_eq!(error["message"], "Expected ']' closing an array");
    assert_eq!(error["start"], 0);
    assert_eq!(error["end"], 2);
}
