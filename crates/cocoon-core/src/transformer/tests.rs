use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::parser::ParseError;
use crate::test_support::{assert_same_code, snippet, ScriptedOracle};
use crate::CocoonError;

/// Records one ReverseIf occurrence, then fails
struct Exploding;

impl Pass for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn description(&self) -> &'static str {
        "Fails after touching the tree"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        callable.name = "mangled".to_string();
        snippet.add_transformation(Transformation::ReverseIf);
        Err(UnsupportedConstruct::LabeledContinue {
            label: "outer".to_string(),
        }
        .into())
    }
}

#[test]
fn test_empty_pipeline_leaves_code_untouched() {
    let source = "void   f( ) {  g();  // keep\n}";
    let mut target = snippet(source);
    transform(&Pipeline::new(), &mut target).unwrap();
    assert_eq!(target.code, source);
    assert!(target.transformations.is_empty());
}

#[test]
fn test_passes_run_in_order_on_the_previous_output() {
    let pipeline = Pipeline::new()
        .with_pass(NestElseIf::new())
        .with_pass(ReverseIf::new());
    let mut target = snippet("int f(int a) { if (a < 0) { return -1; } else if (a > 0) { return 1; } else { return 0; } }");

    pipeline.transform(&mut target).unwrap();

    assert_same_code(
        &target.code,
        "int f(int a) { if (a >= 0) { if (a <= 0) { return 0; } else { return 1; } } else { return -1; } }",
    );
    assert_eq!(target.count(Transformation::NestElseIf), 1);
    assert_eq!(target.count(Transformation::ReverseIf), 2);
}

#[test]
fn test_failed_pass_commits_nothing() {
    let pipeline = Pipeline::new()
        .with_pass(SwapEqualsOperands::new())
        .with_pass(Exploding);
    let source = "boolean f(int a) { return a == 1; }";
    let mut target = snippet(source);
    let before = target.clone();

    let err = transform(&pipeline, &mut target).unwrap_err();

    assert!(matches!(err, CocoonError::Pass(PassError::Unsupported(_))));
    assert_eq!(target, before);
}

#[test]
fn test_parse_failure_commits_nothing() {
    let pipeline = Pipeline::new().with_pass(ReverseIf::new());
    let mut target = snippet("void f() {\n  int x = ;\n}");
    let before = target.clone();

    let err = pipeline.transform(&mut target).unwrap_err();

    assert!(matches!(err, CocoonError::Parse(ParseError::Syntax { line: 2, .. })));
    assert_eq!(target, before);
}

#[test]
fn test_empty_pipeline_still_rejects_invalid_code() {
    let mut target = snippet("int x = 1;");
    let before = target.clone();

    let err = Pipeline::new().transform(&mut target).unwrap_err();

    assert!(matches!(err, CocoonError::Parse(ParseError::NoCallable)));
    assert_eq!(target, before);
}

#[test]
fn test_comments_survive_a_rewrite() {
    let pipeline = Pipeline::new().with_pass(ExpandUnaryIncrement::new());
    let mut target = snippet("/** Counts. */\nvoid f(int i) {\n  // keep me\n  i++; /* and me */\n}");

    pipeline.transform(&mut target).unwrap();

    assert_eq!(
        target.code,
        "/** Counts. */\nvoid f(int i) {\n    // keep me\n    i += 1;\n    /* and me */\n}"
    );
    assert_eq!(target.count(Transformation::ExpandUnaryIncrement), 1);
}

#[test]
fn test_identifier_pass_reads_code_as_of_its_entry() {
    let oracle = Arc::new(ScriptedOracle::new(&[("i", "index")]));
    let pipeline = Pipeline::new()
        .with_pass(ForToWhile::new())
        .with_pass(VariableName::new(oracle.clone()));
    let mut target = snippet("void f() { for (int i = 0; i < 3; i++) { g(i); } }");

    pipeline.transform(&mut target).unwrap();

    assert_same_code(
        &target.code,
        "void f() { int index = 0; while (index < 3) { g(index); index++; } }",
    );
    let contexts = oracle.contexts();
    assert_eq!(contexts.len(), 1);
    assert!(contexts[0].contains("while (i < 3)"));
}

#[test]
fn test_mappings_are_overwritten_by_a_later_run() {
    let oracle: Arc<dyn crate::SynonymOracle> =
        Arc::new(ScriptedOracle::new(&[("a", "b"), ("b", "c")]));
    let pipeline = Pipeline::new().with_pass(VariableName::new(oracle));
    let mut target = snippet("void f() { int a = 1; g(a); }");

    pipeline.transform(&mut target).unwrap();
    pipeline.transform(&mut target).unwrap();

    assert_same_code(&target.code, "void f() { int c = 1; g(c); }");
    let mapping = target.variable_mapping.clone().unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get("b").map(String::as_str), Some("c"));
    assert_eq!(target.count(Transformation::RenameVariables), 2);
}

#[test]
fn test_pipeline_names() {
    let pipeline = Pipeline::new()
        .with_pass(ForToWhile::new())
        .with_pass(SwapRelationOperands::new());
    assert_eq!(pipeline.len(), 2);
    assert_eq!(
        pipeline.names(),
        vec!["forToWhileTransformer", "swapRelationOperandsTransformer"]
    );
    assert_eq!(
        format!("{pipeline:?}"),
        r#"Pipeline { passes: ["forToWhileTransformer", "swapRelationOperandsTransformer"] }"#
    );
}

#[test]
fn test_summary_merges_counts_and_failures() {
    let mut first = TransformationSummary::new();
    let mut changed = snippet("void f() {}");
    changed.add_transformations(Transformation::ForToWhile, 2);
    first.record(&changed);
    first.record(&snippet("void g() {}"));

    let mut second = TransformationSummary::new();
    let mut other = snippet("void h() {}");
    other.add_transformation(Transformation::ForToWhile);
    other.add_transformation(Transformation::ReverseIf);
    second.record(&other);
    second.record_failure("7", &CocoonError::Parse(ParseError::NoCallable));

    first.merge(second);

    assert_eq!(first.snippets, 4);
    assert_eq!(first.snippets_changed, 2);
    assert_eq!(first.transformations.get(&Transformation::ForToWhile), Some(&3));
    assert_eq!(first.total(), 4);
    assert!(!first.success());
    assert_eq!(first.failures.len(), 1);
    assert!(first.failures[0].starts_with("7: "));
    assert_eq!(
        first.to_string(),
        "4 snippets, 2 changed, 1 failed\n  ForToWhile: 3\n  ReverseIf: 1\n"
    );
}
