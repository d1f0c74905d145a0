// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn resolver(values: &[(&str, &str)]) -> impl Fn(&str) -> String + '_ {
    move |name| values.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string()).unwrap_or_default()
}

#[test]
fn missing_parameter_without_default_is_elided() {
    let t = Template::parse("thing {%missing} thing2").unwrap();
    assert_eq!(t.render(resolver(&[])), "thing  thing2");
}

#[test]
fn missing_parameter_with_default_uses_default() {
    let t = Template::parse("thing {%missing:default value} thing2").unwrap();
    assert_eq!(t.render(resolver(&[])), "thing default value thing2");
}

#[test]
fn present_parameter_overrides_default() {
    let t = Template::parse("thing {%present:default value} thing2").unwrap();
    assert_eq!(t.render(resolver(&[("present", "123")])), "thing 123 thing2");
}

#[test]
fn prefix_text_is_emitted_with_resolved_value() {
    let t = Template::parse("thing {A prologue %present} thing2").unwrap();
    assert_eq!(t.render(resolver(&[("present", "123")])), "thing A prologue 123 thing2");
}

#[test]
fn block_without_percent_is_a_parse_error() {
    let err = Template::parse("thing {nothing to substitute} thing2").unwrap_err();
    assert!(matches!(err, TemplateError::MissingPercent(_)));
}

#[test]
fn dollar_brace_is_left_untouched() {
    let t = Template::parse("cd ${PWD} && {%cmd}").unwrap();
    assert_eq!(t.render(resolver(&[("cmd", "run")])), "cd ${PWD} && run");
}

#[test]
fn doc_suffix_is_excluded_from_default_rendering() {
    let t = Template::parse("{-n %n!MPI size}").unwrap();
    assert_eq!(t.render(resolver(&[("n", "4")])), "-n 4");
    let params = t.parameters(true);
    assert_eq!(params.get("n"), Some(&"MPI size".to_string()));
    let defaults = t.parameters(false);
    assert_eq!(defaults.get("n"), Some(&"".to_string()));
}

#[test]
fn unterminated_block_is_an_error() {
    let err = Template::parse("thing {%missing").unwrap_err();
    assert!(matches!(err, TemplateError::Unterminated(_)));
}

#[test]
fn parameters_collects_every_name() {
    let t = Template::parse("molpro {-n %n!MPI size} {-M %M!Total memory}").unwrap();
    let params = t.parameters(true);
    assert_eq!(params.len(), 2);
    assert!(params.contains_key("n"));
    assert!(params.contains_key("M"));
}
