use super::*;

#[test]
fn test_python_parser_creation() {
    let parser = PythonParser::new();
    assert!(parser.is_ok(), "Should create Python parser successfully");
}

#[test]
fn test_parse_simple_function() {
    let mut parser = PythonParser::new().unwrap();
    let source = r#"
def hello_world():
    return "Hello, World!"
"#;
    let module = parser.parse(source).unwrap();
    assert_eq!(module.kind(), "module");

    let body = module.body().unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), "function_definition");
    assert_eq!(body[0].field_text("name"), Some("hello_world"));
    assert_eq!(body[0].span().start_line, 2);
}

#[test]
fn test_comments_are_dropped() {
    let module = parse_source("# leading\nx = 1  # trailing\n# closing\n").unwrap();
    let body = module.body().unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), "expression_statement");
    assert!(!module.dump().contains("comment"));
}

#[test]
fn test_semicolons_split_statements() {
    let module = parse_source("a = 1; b = 2").unwrap();
    let body = module.body().unwrap();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|stmt| stmt.kind() == "expression_statement"));
}

#[test]
fn test_assignment_fields() {
    let module = parse_source("total = 42").unwrap();
    let assignment = &module.body().unwrap()[0].children()[0];
    assert_eq!(assignment.kind(), "assignment");
    assert_eq!(assignment.field_text("left"), Some("total"));

    let right = assignment.child_by_field("right").unwrap();
    assert_eq!(right.kind(), "integer");
    assert_eq!(right.text(), Some("42"));
}

#[test]
fn test_string_keeps_source_text() {
    let module = parse_source("greeting = \"hi\\n\"").unwrap();
    let assignment = &module.body().unwrap()[0].children()[0];
    let right = assignment.child_by_field("right").unwrap();
    assert_eq!(right.kind(), "string");
    assert_eq!(right.text(), Some("\"hi\\n\""));
}

#[test]
fn test_keyword_tokens_are_anonymous() {
    let module = parse_source("async def fetch():\n    pass\n").unwrap();
    let function = &module.body().unwrap()[0];
    assert!(function.has_token("async"));
    assert!(function.has_token("def"));
    assert!(function.children().iter().any(|c| !c.is_named()));
}

#[test]
fn test_syntax_error_reports_position() {
    let err = parse_source("x = 1\ndef broken(:\n    pass\n").unwrap_err();
    match err {
        PyshapeError::Parse {
            language, line, ..
        } => {
            assert_eq!(language, "python");
            assert_eq!(line, Some(2));
        }
        other => panic!("Expected Parse error, got {other:?}"),
    }
}

#[test]
fn test_incomplete_expression_is_rejected() {
    assert!(parse_source("x = ").unwrap_err().is_parse());
    assert!(parse_source("if x > 1\n    y = 2\n").unwrap_err().is_parse());
}

#[test]
fn test_python2_statements_are_rejected() {
    let cases = [
        ("x = 1\nprint 'hi'\n", 2, "print"),
        ("exec 'x = 1'\n", 1, "exec"),
        ("import sys\n\nprint >> sys.stderr, 'oops'\n", 3, "print"),
    ];
    for (source, expected_line, keyword) in cases {
        match parse_source(source).unwrap_err() {
            PyshapeError::Parse {
                line,
                column,
                message,
                ..
            } => {
                assert_eq!(line, Some(expected_line), "{source:?}");
                assert_eq!(column, Some(1), "{source:?}");
                assert!(message.contains(keyword), "{message}");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }
}

#[test]
fn test_python3_print_and_exec_calls_parse() {
    let module = parse_source("print('hi')\nexec('x = 1')\nprint(*items, sep=', ')\n").unwrap();
    let body = module.body().unwrap();
    assert_eq!(body.len(), 3);
    assert!(body
        .iter()
        .all(|statement| statement.named_children().next().map(SyntaxNode::kind) == Some("call")));
}

#[test]
fn test_empty_source_is_empty_module() {
    let module = parse_source("").unwrap();
    assert_eq!(module.kind(), "module");
    assert_eq!(module.body().map(<[SyntaxNode]>::len), Some(0));
}

#[test]
fn test_same_source_parses_identically() {
    let first = parse_source("if a:\n    b = 1\n").unwrap();
    let second = parse_source("if a:\n    b = 1\n").unwrap();
    assert_eq!(first, second);

    let shifted = parse_source("\nif a:\n    b = 1\n").unwrap();
    assert_ne!(first, shifted);
}
