//! End-to-end checks of the bundled catalogue against small documents.

use hstyle_core::catalogue::load_model_from_toml;
use hstyle_core::{lint_source, scan, Catalogue, Severity, SpanKind, Violation};
use hstyle_rules::{default_catalogue, rule_for};

fn lint_default(text: &str) -> Vec<Violation> {
    let catalogue = default_catalogue().unwrap();
    lint_source(text, &catalogue)
}

fn lint_with(text: &str, catalogue_toml: &str) -> Vec<Violation> {
    let catalogue = Catalogue::new(load_model_from_toml(catalogue_toml).unwrap(), rule_for);
    lint_source(text, &catalogue)
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn trailing_whitespace_scenario() {
    let violations = lint_default("foo = 1 \n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule_id, "trailing-whitespace");
    assert_eq!((violations[0].line, violations[0].column), (1, 8));
}

#[test]
fn import_order_scenario() {
    let violations = lint_default("import Data.Set\nimport Data.Map\nimport Prelude\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule_id, "import-order");
    assert_eq!(violations[0].line, 2);
    assert!(violations[0].message.contains("Data.Map"));
}

#[test]
fn nested_comment_scenario() {
    let text = "x = 1\n\n{- outer {- inner -} still outer -}\n";
    let scanned = scan(text);
    assert!(scanned.errors.is_empty());
    let comments: Vec<_> = scanned
        .spans
        .iter()
        .filter(|s| s.kind == SpanKind::BlockComment)
        .collect();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "{- outer {- inner -} still outer -}");

    assert!(lint_default(text).is_empty());
}

#[test]
fn indent_step_scenario() {
    assert!(lint_default("main = do\n    putStrLn \"hi\"\n").is_empty());

    let violations = lint_default("data P = P\n    { px :: Int\n    }\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule_id, "indent");
    assert_eq!(
        violations[0].message,
        "record block is indented 4 columns past its parent, expected 2"
    );
}

#[test]
fn where_bindings_may_use_the_exception_step() {
    assert!(lint_default("main :: IO ()\nmain = go\n  where\n    go = pure ()\n").is_empty());

    let violations = lint_default("main :: IO ()\nmain = go\n  where\n     go = pure ()\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule_id, "indent");
}

#[test]
fn line_rule_sees_only_declared_kinds() {
    let strings_only = r#"
[[rules]]
id = "long-strings"
check = "max-line-length"
n = 10
applies-to = ["string-literal"]
"#;
    let text = "x = \"a very long string\"\ny = aVeryLongIdentifierName\n";
    let lines: Vec<usize> = lint_with(text, strings_only).iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![1]);

    let mixed = r#"
[[rules]]
id = "long"
check = "max-line-length"
n = 10
applies-to = ["code", "string-literal"]
"#;
    let lines: Vec<usize> = lint_with(text, mixed).iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn suppression_comment_silences_the_next_line() {
    let text = "-- hstyle: allow(naming) reason=\"C binding\"\nc_sin = 1\n";
    assert!(lint_default(text).is_empty());
    assert_eq!(lint_default("c_sin = 1\n").len(), 1);
}

#[test]
fn default_catalogue_on_a_small_module() {
    let text = concat!(
        "module Sample where\n",
        "\n",
        "import Data.Set\n",
        "import Data.Map\n",
        "\n",
        "parse_line :: String -> String\n",
        "parse_line s = s \n",
        "render = id -- tight\n",
    );
    let violations = lint_default(text);
    insta::assert_snapshot!(render(&violations), @r"
    4:8: error [import-order] `Data.Map` should be imported before `Data.Set`
    6:1: error [naming] `parse_line` should be lowerCamelCase
    7:1: error [naming] `parse_line` should be lowerCamelCase
    7:17: error [trailing-whitespace] trailing whitespace
    8:1: warning [top-level-spacing] expected 1 blank line(s) before this declaration, found 0
    8:13: warning [comment-placement] end-of-line comment needs at least 2 spaces before it, found 1
    ");

    let warnings = violations
        .iter()
        .filter(|v| v.severity == Severity::Warning)
        .count();
    assert_eq!(warnings, 2);
}
