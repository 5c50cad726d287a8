fn compile_str(input: &str) -> String {
    match mtlang::compile(input) {
        Ok(code) => code,
        Err(error) => panic!("compilation of {input:?} failed: {error}"),
    }
}

#[test]
fn comment_only_lines_are_ignored() {
    let source = "; leading comment\n(f 1)\n; trailing comment";
    assert_eq!(compile_str(source), "f(1);");
}

#[test]
fn comments_after_code() {
    let source = "(def x 1) ; the answer, roughly\n(print x) ;; shout it";
    assert_eq!(compile_str(source), "const x = 1;\nconsole.log(String(x));");
}

#[test]
fn comments_between_arguments() {
    let source = "(add 1 ; first\n     2 ; second\n)";
    assert_eq!(compile_str(source), "add(1, 2);");
}

#[test]
fn comments_inside_blocks() {
    let source = "{\n  ; setup\n  (def x 1)\n  x ; result\n}";
    assert_eq!(
        compile_str(source),
        "(() => {\n  const x = 1;\n  return x;\n})();"
    );
}

#[test]
fn semicolon_inside_string_is_not_a_comment() {
    assert_eq!(compile_str("(f \"a; b\")"), "f(\"a; b\");");
}

#[test]
fn comments_advance_the_line_count() {
    let (_, state) = mtlang::parse("; one\n; two\n(f 1");
    let error = &state.errors()[0];
    assert_eq!(error.line, 3);
}
