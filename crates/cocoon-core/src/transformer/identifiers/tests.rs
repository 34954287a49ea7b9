use pretty_assertions::assert_eq;

use super::*;
use crate::parser::parse;
use crate::test_support::ScriptedOracle;

#[test]
fn test_legal_identifiers() {
    for name in ["x", "_tmp", "$value", "camelCase", "größe", "a1"] {
        assert!(is_legal_identifier(name), "{name} should be legal");
    }
    for name in ["", "1a", "two words", "a-b", "class", "null", "true", "_", "x.y"] {
        assert!(!is_legal_identifier(name), "{name} should be illegal");
    }
}

#[test]
fn test_guard_rejections_in_order() {
    let callable = parse("int f(int n) { int total = n; log(total, size); return total; }").unwrap();
    let guard = SynonymGuard::new(&callable);
    let mut accepted = NameMapping::new();

    assert_eq!(guard.check("total", "total", &accepted), Err(Rejection::Unchanged));
    assert_eq!(guard.check("total", "int", &accepted), Err(Rejection::Illegal));
    assert_eq!(guard.check("total", "n", &accepted), Err(Rejection::Declared));
    assert_eq!(guard.check("total", "size", &accepted), Err(Rejection::Referenced));
    assert_eq!(guard.check("total", "log", &accepted), Ok(()));

    accepted.insert("n".to_string(), "count".to_string());
    assert_eq!(guard.check("total", "count", &accepted), Err(Rejection::Taken));
    assert_eq!(guard.check("total", "sum", &accepted), Ok(()));
}

#[test]
fn test_method_guard_only_rejects_called_names() {
    let callable = parse("int f(int n) { int total = n; log(total, size); return total; }").unwrap();
    let guard = SynonymGuard::for_method(&callable);
    let accepted = NameMapping::new();

    assert_eq!(guard.check("f", "f", &accepted), Err(Rejection::Unchanged));
    assert_eq!(guard.check("f", "int", &accepted), Err(Rejection::Illegal));
    assert_eq!(guard.check("f", "log", &accepted), Err(Rejection::Called));
    assert_eq!(guard.check("f", "total", &accepted), Ok(()));
    assert_eq!(guard.check("f", "size", &accepted), Ok(()));
    assert_eq!(guard.check("f", "n", &accepted), Ok(()));
}

#[test]
fn test_collect_renames_asks_each_name_once() {
    let callable = parse("void f() { int a = 1; int b = 2; }").unwrap();
    let guard = SynonymGuard::new(&callable);
    let oracle = ScriptedOracle::new(&[("a", "first"), ("b", "first")]);

    let mapping = collect_renames(
        &oracle,
        &guard,
        ["a", "a", "b"],
        "void f() { int a = 1; int b = 2; }",
        IdentifierKind::Variable,
    );

    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get("a").map(String::as_str), Some("first"));
    assert_eq!(oracle.queries(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_rejection_messages() {
    assert_eq!(Rejection::Taken.to_string(), "already used by another rename");
    assert_eq!(Rejection::Illegal.to_string(), "not a legal identifier");
}
