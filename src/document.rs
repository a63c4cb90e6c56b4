//! Document assembler.
//!
//! Wraps a [`SurveyDocument`] into a [`ConfigFile`] and unwraps a parsed file
//! back into a document.
//!
//! ## Layout
//!
//! ```text
//! package main
//!
//! import "schema"
//!
//! _choices: {
//!     yes_no: schema.#Choices & { list_name: "yes_no", choices: [...] }
//! }
//! likes_pizza: schema.#Question & { type: "select_one", name: "likes_pizza", choices: _choices.yes_no, ... }
//! father: schema.#Group & { type: "begin_group", name: "father", children: [...] }
//! form_settings: schema.#Settings & { type: "settings", ... }
//! ```
//!
//! Top-level members are keyed by element name. Choice lists live in the
//! hidden `_choices` member and questions point at them by reference.

use crate::lang::is_translatable;
use crate::model::{
    Attribute, Attributes, ChoiceEntry, ChoiceList, Element, Group, Question, SurveyDocument,
};
use crate::options::import_alias;
use crate::settings;
use crate::survey::{is_begin, is_end};
use crate::value::{ConfigFile, ConfigStruct, ConfigValue, Merge};
use crate::{Error, FormOptions, LabelMap, Result};
use indexmap::IndexMap;
use log::debug;

/// Hidden member holding every choice list.
pub const CHOICES_MEMBER: &str = "_choices";

/// Member holding the form settings.
pub const SETTINGS_MEMBER: &str = "form_settings";

pub const QUESTION_DEF: &str = "Question";
pub const GROUP_DEF: &str = "Group";
pub const CHOICES_DEF: &str = "Choices";
pub const SETTINGS_DEF: &str = "Settings";

const TYPE: &str = "type";
const NAME: &str = "name";
const CHOICES: &str = "choices";
const CHILDREN: &str = "children";
const LIST_NAME: &str = "list_name";
const LABEL: &str = "label";

/// Wraps `document` into a configuration file.
///
/// # Examples
///
/// ```rust
/// use cueform::document::to_config;
/// use cueform::{FormOptions, Question, SurveyDocument};
///
/// let mut document = SurveyDocument::new();
/// document
///     .elements
///     .push(Question::new("family_name", "text").with_label("English (en)", "Family name").into());
///
/// let file = to_config(&document, &FormOptions::default());
/// assert_eq!(file.imports, vec!["schema".to_string()]);
/// assert!(file.fields.get("family_name").and_then(|v| v.as_merge()).is_some());
/// ```
pub fn to_config(document: &SurveyDocument, options: &FormOptions) -> ConfigFile {
    let alias = options.schema_alias();
    let mut file = ConfigFile::new(&options.package);
    file.imports.push(options.schema_package.clone());

    if !document.choices.is_empty() {
        let mut lists = ConfigStruct::new();
        for list in document.choices.values() {
            lists.push(&list.name, Merge::new(alias, CHOICES_DEF, choice_list_body(list)));
        }
        file.fields.push(CHOICES_MEMBER, lists);
    }

    for element in &document.elements {
        file.fields.push(element.name(), element_value(element, alias));
    }

    if let Some(form_settings) = &document.settings {
        file.fields.push(
            SETTINGS_MEMBER,
            Merge::new(alias, SETTINGS_DEF, settings::to_config_struct(form_settings)),
        );
    }

    file
}

fn choice_list_body(list: &ChoiceList) -> ConfigStruct {
    let entries = list
        .entries
        .iter()
        .map(|entry| {
            let mut body = ConfigStruct::new();
            body.push(NAME, entry.code.as_str());
            if !entry.label.is_empty() {
                body.push(LABEL, labels_value(&entry.label));
            }
            for (key, value) in &entry.attributes {
                body.push(key, value.as_str());
            }
            ConfigValue::Struct(body)
        })
        .collect::<Vec<_>>();

    let mut body = ConfigStruct::new();
    body.push(LIST_NAME, list.name.as_str());
    body.push(CHOICES, entries);
    body
}

fn labels_value(labels: &LabelMap) -> ConfigValue {
    ConfigValue::Struct(labels.iter().map(|(lang, text)| (lang.as_str(), text.as_str())).collect())
}

fn element_value(element: &Element, alias: &str) -> ConfigValue {
    let mut body = ConfigStruct::new();
    body.push(TYPE, element.kind());
    body.push(NAME, element.name());

    match element {
        Element::Question(question) => {
            if let Some(list) = &question.choices {
                body.push(CHOICES, ConfigValue::reference([CHOICES_MEMBER, list.as_str()]));
            }
            push_attributes(&mut body, &question.attributes);
            ConfigValue::Merge(Merge::new(alias, QUESTION_DEF, body))
        }
        Element::Group(group) => {
            push_attributes(&mut body, &group.attributes);
            let children = group
                .children
                .iter()
                .map(|child| element_value(child, alias))
                .collect::<Vec<_>>();
            body.push(CHILDREN, children);
            ConfigValue::Merge(Merge::new(alias, GROUP_DEF, body))
        }
    }
}

fn push_attributes(body: &mut ConfigStruct, attributes: &Attributes) {
    for (key, value) in attributes {
        match value {
            Attribute::Text(text) => body.push(key, text.as_str()),
            Attribute::Labels(labels) => body.push(key, labels_value(labels)),
        }
    }
}

/// Unwraps a parsed configuration file into a document.
///
/// Every member is checked against the shape of its definition, and every
/// choice reference must name a list of the `_choices` member.
///
/// # Errors
///
/// [`Error::Shape`] for a member that does not match its definition,
/// [`Error::UnknownChoiceList`] for a dangling choice reference.
pub fn from_config(file: &ConfigFile) -> Result<SurveyDocument> {
    let unwrapper = Unwrapper {
        aliases: file.imports.iter().map(|path| import_alias(path)).collect(),
    };
    let mut document = SurveyDocument::new();

    for field in &file.fields {
        let path = field.label.as_str();
        // An element may itself be named `_choices`; only the plain struct is the list holder
        if path == CHOICES_MEMBER && field.value.is_struct() {
            let lists = field
                .value
                .as_struct()
                .ok_or_else(|| expected(path, "struct of choice lists", &field.value))?;
            for list_field in lists {
                let list_path = format!("{}.{}", CHOICES_MEMBER, list_field.label);
                let body = unwrapper.definition(&list_path, &list_field.value, &[CHOICES_DEF])?.1;
                let list = choice_list(&list_path, &list_field.label, body)?;
                document.add_choice_list(list);
            }
            continue;
        }

        let (definition, body) =
            unwrapper.definition(path, &field.value, &[QUESTION_DEF, GROUP_DEF, SETTINGS_DEF, CHOICES_DEF])?;
        match definition {
            SETTINGS_DEF => {
                if document.settings.is_some() {
                    return Err(Error::shape(path, "settings declared more than once"));
                }
                document.settings = Some(settings::from_config_struct(body, path)?);
            }
            CHOICES_DEF => {
                let list = choice_list(path, &field.label, body)?;
                document.add_choice_list(list);
            }
            _ => document
                .elements
                .push(unwrapper.element(path, definition, body)?),
        }
    }

    check_references(&document.elements, &document.choices)?;
    debug!(elements = document.elements.len(), lists = document.choices.len(); "Configuration unwrapped");
    Ok(document)
}

struct Unwrapper<'a> {
    aliases: Vec<&'a str>,
}

impl<'a> Unwrapper<'a> {
    /// Unpacks `alias.#Def & {...}`, checking the alias and the definition.
    fn definition<'v>(
        &self,
        path: &str,
        value: &'v ConfigValue,
        allowed: &[&'static str],
    ) -> Result<(&'static str, &'v ConfigStruct)> {
        let merge = value
            .as_merge()
            .ok_or_else(|| expected(path, "schema definition", value))?;
        if !self.aliases.contains(&merge.package.as_str()) {
            return Err(Error::shape(
                path,
                format!("package '{}' is not imported", merge.package),
            ));
        }
        let definition = allowed
            .iter()
            .find(|&&candidate| candidate == merge.definition)
            .copied()
            .ok_or_else(|| {
                Error::shape(
                    path,
                    format!("unexpected definition '#{}'", merge.definition),
                )
            })?;
        Ok((definition, &merge.body))
    }

    fn element(&self, path: &str, definition: &str, body: &ConfigStruct) -> Result<Element> {
        let element_type = required_string(path, body, TYPE)?;
        let name = required_string(path, body, NAME)?;
        check_element_type(path, definition, element_type)?;
        let mut attributes = Attributes::new();
        let mut choices = None;
        let mut children = None;

        for field in body {
            let field_path = format!("{}.{}", path, field.label);
            match field.label.as_str() {
                TYPE | NAME => {}
                CHOICES if definition == QUESTION_DEF => {
                    choices = Some(choice_reference(&field_path, &field.value)?);
                }
                CHILDREN if definition == GROUP_DEF => {
                    let items = field
                        .value
                        .as_list()
                        .ok_or_else(|| expected(&field_path, "list", &field.value))?;
                    let mut elements = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let child_path = format!("{}[{}]", field_path, i);
                        let (child_def, child_body) =
                            self.definition(&child_path, item, &[QUESTION_DEF, GROUP_DEF])?;
                        elements.push(self.element(&child_path, child_def, child_body)?);
                    }
                    children = Some(elements);
                }
                label => {
                    attributes.insert(label.to_string(), attribute(&field_path, label, &field.value)?);
                }
            }
        }

        if definition == GROUP_DEF {
            let children = children
                .ok_or_else(|| Error::shape(path, format!("missing list field '{}'", CHILDREN)))?;
            Ok(Element::Group(Group {
                name: name.to_string(),
                group_type: element_type.to_string(),
                attributes,
                children,
            }))
        } else {
            Ok(Element::Question(Question {
                name: name.to_string(),
                question_type: element_type.to_string(),
                choices,
                attributes,
            }))
        }
    }
}

fn choice_list(path: &str, label: &str, body: &ConfigStruct) -> Result<ChoiceList> {
    let name = required_string(path, body, LIST_NAME)?;
    if name != label {
        return Err(Error::shape(
            path,
            format!("list_name \"{}\" does not match member name \"{}\"", name, label),
        ));
    }
    let entries_path = format!("{}.{}", path, CHOICES);
    let items = body
        .get(CHOICES)
        .ok_or_else(|| Error::shape(path, format!("missing list field '{}'", CHOICES)))?;
    let items = items
        .as_list()
        .ok_or_else(|| expected(&entries_path, "list", items))?;

    let mut list = ChoiceList::new(name);
    for (i, item) in items.iter().enumerate() {
        let entry_path = format!("{}[{}]", entries_path, i);
        let entry = item
            .as_struct()
            .ok_or_else(|| expected(&entry_path, "struct", item))?;
        list.entries.push(choice_entry(&entry_path, entry)?);
    }
    Ok(list)
}

/// Group types open with `begin`; question types must not look like a marker.
fn check_element_type(path: &str, definition: &str, element_type: &str) -> Result<()> {
    let clashes = if definition == GROUP_DEF {
        !is_begin(element_type)
    } else {
        is_begin(element_type) || is_end(element_type)
    };
    if clashes {
        let rule = if definition == GROUP_DEF {
            "group types must start with 'begin'"
        } else {
            "question types must not start with 'begin' or 'end'"
        };
        return Err(Error::shape(
            &format!("{}.{}", path, TYPE),
            format!("type \"{}\": {}", element_type, rule),
        ));
    }
    Ok(())
}

fn choice_entry(path: &str, body: &ConfigStruct) -> Result<ChoiceEntry> {
    let code = required_string(path, body, NAME)?;
    if body.get(LABEL).is_none() {
        return Err(Error::shape(path, format!("missing translatable field '{}'", LABEL)));
    }
    let mut label = LabelMap::new();
    let mut attributes = IndexMap::new();

    for field in body {
        let field_path = format!("{}.{}", path, field.label);
        match field.label.as_str() {
            NAME => {}
            LABEL => label = labels(&field_path, &field.value)?,
            key => {
                let value = field
                    .value
                    .as_str()
                    .ok_or_else(|| expected(&field_path, "string", &field.value))?;
                attributes.insert(key.to_string(), value.to_string());
            }
        }
    }

    Ok(ChoiceEntry {
        code: code.to_string(),
        label,
        attributes,
    })
}

fn choice_reference(path: &str, value: &ConfigValue) -> Result<String> {
    match value.as_reference() {
        Some([member, list]) if member == CHOICES_MEMBER => Ok(list.clone()),
        _ => Err(expected(path, "reference to a _choices list", value)),
    }
}

fn attribute(path: &str, label: &str, value: &ConfigValue) -> Result<Attribute> {
    if is_translatable(label) {
        return labels(path, value).map(Attribute::Labels);
    }
    value
        .as_str()
        .map(|text| Attribute::Text(text.to_string()))
        .ok_or_else(|| expected(path, "string", value))
}

/// Reads a translatable field: a non-empty struct of strings.
fn labels(path: &str, value: &ConfigValue) -> Result<LabelMap> {
    let fields = value
        .as_struct()
        .ok_or_else(|| expected(path, "struct of translations", value))?;
    if fields.is_empty() {
        return Err(Error::shape(path, "translatable field has no language"));
    }
    let mut labels = LabelMap::new();
    for field in fields {
        let text = field
            .value
            .as_str()
            .ok_or_else(|| expected(&format!("{}.{}", path, field.label), "string", &field.value))?;
        labels.insert(field.label.clone(), text.to_string());
    }
    Ok(labels)
}

fn required_string<'v>(path: &str, body: &'v ConfigStruct, label: &str) -> Result<&'v str> {
    match body.get(label) {
        Some(value) => value
            .as_str()
            .ok_or_else(|| expected(&format!("{}.{}", path, label), "string", value)),
        None => Err(Error::shape(path, format!("missing string field '{}'", label))),
    }
}

fn expected(path: &str, what: &str, found: &ConfigValue) -> Error {
    Error::shape(path, format!("expected {}, found {}", what, found.kind_name()))
}

fn check_references(elements: &[Element], lists: &IndexMap<String, ChoiceList>) -> Result<()> {
    for element in elements {
        match element {
            Element::Question(Question {
                name,
                choices: Some(list),
                ..
            }) if !lists.contains_key(list) => {
                return Err(Error::unknown_choice_list(name, list));
            }
            Element::Group(group) => check_references(&group.children, lists)?,
            Element::Question(_) => {}
        }
    }
    Ok(())
}
