//! Unit and behaviour tests for pattern parsing.


use rstest::rstest;

use crate::{Datatype, Element, Pattern, PatternError, QueryRule};

#[test]
fn parses_literal_only_pattern() {
    let pattern = Pattern::parse("/root/e/f").expect("parse");
    assert_eq!(
        pattern.elements(),
        &[
            Element::segment("root"),
            Element::segment("e"),
            Element::segment("f"),
        ]
    );
    assert!(pattern.query().is_none());
    assert_eq!(pattern.identifiers().count(), 0);
}

#[test]
fn parses_typed_identifiers() {
    let pattern = Pattern::parse("/root/a/id:int/property:string").expect("parse");
    assert_eq!(
        pattern.elements(),
        &[
            Element::segment("root"),
            Element::segment("a"),
            Element::identifier("id", Datatype::Int),
            Element::identifier("property", Datatype::String),
        ]
    );
    let names: Vec<_> = pattern.identifiers().collect();
    assert_eq!(names, vec!["id", "property"]);
}

#[test]
fn parses_query_schema_with_alternatives() {
    let pattern =
        Pattern::parse("/recipients/contact:int/messages?orderBy=id&direction=asc|desc&page")
            .expect("parse");
    let schema = pattern.query().expect("schema");
    assert_eq!(schema.len(), 3);
    assert_eq!(
        schema.rule("direction"),
        Some(&QueryRule::OneOf(vec!["asc".into(), "desc".into()]))
    );
    assert_eq!(schema.rule("page"), Some(&QueryRule::Any));
    assert!(!schema.contains_key("limit"));
}

#[test]
fn tolerates_trailing_separator() {
    let pattern = Pattern::parse("/root/b/").expect("parse");
    assert_eq!(pattern.elements().len(), 2);
}

#[test]
fn empty_query_text_declares_no_schema() {
    let pattern = Pattern::parse("/root/c?").expect("parse");
    assert!(pattern.query().is_none());
}

#[test]
fn display_round_trips_source() {
    let source = "/root/a/id:int?orderBy=id";
    let pattern: Pattern = source.parse().expect("parse");
    assert_eq!(pattern.to_string(), source);
    assert_eq!(
        Element::identifier("id", Datatype::Number).to_string(),
        "id:number"
    );
}

#[rstest]
#[case::empty("", "must start with '/'")]
#[case::root_only("/", "no path elements")]
#[case::relative("root/a", "must start with '/'")]
#[case::double_separator("/root//a", "empty segment")]
#[case::unknown_type("/root/id:uuid", "unknown datatype")]
#[case::bad_identifier("/root/1id:int", "invalid identifier")]
#[case::empty_identifier("/root/:int", "invalid identifier")]
#[case::empty_entry("/root?a=1&&b=2", "empty query entry")]
#[case::empty_key("/root?=1", "has no key")]
#[case::empty_alternative("/root?a=x|", "empty allowed value")]
#[case::duplicate_key("/root?a=1&a=2", "more than once")]
fn rejects_malformed_patterns(#[case] source: &str, #[case] fragment: &str) {
    let error = Pattern::parse(source).expect_err("pattern should be rejected");
    assert!(
        error.to_string().contains(fragment),
        "expected '{fragment}' in '{error}'"
    );
}

#[test]
fn unknown_datatype_reports_tag() {
    let error = Pattern::parse("/root/id:uuid").expect_err("reject");
    assert_eq!(
        error,
        PatternError::unknown_datatype("/root/id:uuid", "uuid")
    );
}

#[rstest]
#[case::integer("42", Datatype::Int)]
#[case::negative("-7", Datatype::Int)]
#[case::fraction("4.5", Datatype::Number)]
#[case::exponent("1e3", Datatype::Number)]
#[case::unit_suffix("12px", Datatype::String)]
#[case::word("value", Datatype::String)]
#[case::file_name("emojighost.png", Datatype::String)]
#[case::infinity("inf", Datatype::String)]
#[case::not_a_number("NaN", Datatype::String)]
fn classifies_tokens(#[case] token: &str, #[case] expected: Datatype) {
    assert_eq!(Datatype::classify(token), expected);
}

#[test]
fn query_rules_accept_expected_values() {
    assert!(QueryRule::Exact("id".into()).accepts("id"));
    assert!(!QueryRule::Exact("id".into()).accepts("name"));
    assert!(QueryRule::Any.accepts("anything"));
}
