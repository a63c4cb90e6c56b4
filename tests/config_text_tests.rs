//! Tests for the configuration text printer and parser, independent of sheets.

use cueform::de::parse_file;
use cueform::document::{from_config, to_config};
use cueform::ser::file_to_string;
use cueform::{
    ChoiceList, ConfigValue, Error, FormOptions, Group, Indent, Question, SurveyDocument,
};

fn document() -> SurveyDocument {
    let mut document = SurveyDocument::new();
    document.elements.push(
        Question::new("likes_pizza", "select_one")
            .with_choices("yes_no")
            .with_label("English (en)", "Do you like pizza?")
            .with_translation("hint", "English (en)", "Be \"honest\"")
            .into(),
    );
    document.elements.push(
        Group::new("household")
            .with_type("begin_repeat")
            .with_label("English (en)", "Household member")
            .with_attribute("repeat_count", "${members}")
            .with_child(Question::new("member_name", "text").with_label("English (en)", "Name"))
            .into(),
    );
    document.add_choice_list(
        ChoiceList::new("yes_no")
            .with_entry("yes", [("English (en)", "Yes"), ("French (fr)", "Oui")])
            .with_entry("no", [("English (en)", "No"), ("French (fr)", "Non")]),
    );
    document
}

#[test]
fn test_canonical_layout() {
    let mut document = SurveyDocument::new();
    document.elements.push(
        Question::new("likes_pizza", "select_one")
            .with_choices("yes_no")
            .with_label("English (en)", "Do you like pizza?")
            .into(),
    );
    document.add_choice_list(ChoiceList::new("yes_no").with_entry("yes", [("English (en)", "Yes")]));

    let options = FormOptions::default();
    let text = file_to_string(&to_config(&document, &options), &options);
    let expected = r#"package main

import "schema"

_choices: {
	yes_no: schema.#Choices & {
		list_name: "yes_no"
		choices: [
			{
				name: "yes"
				label: {
					"English (en)": "Yes"
				}
			},
		]
	}
}
likes_pizza: schema.#Question & {
	type: "select_one"
	name: "likes_pizza"
	choices: _choices.yes_no
	label: {
		"English (en)": "Do you like pizza?"
	}
}
"#;
    assert_eq!(text, expected);
}

#[test]
fn test_print_parse_unwrap() {
    let document = document();
    for indent in [Indent::Tab, Indent::Spaces(4)] {
        let options = FormOptions::new().with_indent(indent);
        let text = file_to_string(&to_config(&document, &options), &options);
        let file = parse_file(&text).unwrap();
        assert_eq!(from_config(&file).unwrap(), document);
    }
}

#[test]
fn test_printing_is_stable() {
    let options = FormOptions::default();
    let first = file_to_string(&to_config(&document(), &options), &options);
    let file = parse_file(&first).unwrap();
    let second = file_to_string(&to_config(&from_config(&file).unwrap(), &options), &options);
    assert_eq!(first, second);
}

#[test]
fn test_hand_written_text() {
    // Comments, commas and compact structs are all accepted
    let text = r#"
// Generated by hand
package main

import "schema"

_choices: {
    yes_no: schema.#Choices & {list_name: "yes_no", choices: [{name: "yes", label: {en: "Yes"}}, {name: "no", label: {en: "No"}}]}
}

consent: schema.#Question & {
    type: "select_one", name: "consent" // inline comment
    choices: _choices.yes_no
    label: {en: "Do you consent?"}
}
"#;
    let document = from_config(&parse_file(text).unwrap()).unwrap();
    assert_eq!(document.elements[0].name(), "consent");
    assert_eq!(document.choice_list("yes_no").unwrap().entries.len(), 2);
}

#[test]
fn test_syntax_error_has_context() {
    let err = parse_file("package main\n\nfamily_name schema.#Question & {}").unwrap_err();
    match err {
        Error::Syntax { line, context, .. } => {
            assert_eq!(line, 3);
            assert!(context.starts_with("family_name schema.#Question"));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_unknown_definition() {
    let file = parse_file("package main\nimport \"schema\"\nq: schema.#Widget & { type: \"x\", name: \"q\" }").unwrap();
    assert_eq!(
        from_config(&file).unwrap_err(),
        Error::shape("q", "unexpected definition '#Widget'")
    );
}

#[test]
fn test_settings_require_discriminator() {
    let file = parse_file("package main\nimport \"schema\"\nform_settings: schema.#Settings & { form_title: \"T\" }").unwrap();
    assert_eq!(
        from_config(&file).unwrap_err(),
        Error::shape("form_settings", "missing string field 'type'")
    );
}

#[test]
fn test_empty_translation_map_is_rejected() {
    let file = parse_file("package main\nimport \"schema\"\nq: schema.#Question & { type: \"text\", name: \"q\", hint: {} }").unwrap();
    assert_eq!(
        from_config(&file).unwrap_err(),
        Error::shape("q.hint", "translatable field has no language")
    );
}

#[test]
fn test_list_name_must_match_member() {
    let file = parse_file(
        "package main\nimport \"schema\"\n_choices: { a: schema.#Choices & { list_name: \"b\", choices: [] } }",
    )
    .unwrap();
    assert!(matches!(from_config(&file), Err(Error::Shape { .. })));
}

#[test]
fn test_reference_value_accessor() {
    let file = parse_file("package main\nx: _choices.yes_no").unwrap();
    assert_eq!(
        file.fields.get("x").and_then(ConfigValue::as_reference).map(<[String]>::len),
        Some(2)
    );
}
