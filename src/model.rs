//! In-memory form model.
//!
//! A [`SurveyDocument`] is the meeting point of both directions: the survey
//! walker builds it from sheet rows, the document assembler builds it from
//! configuration text, and each side can flatten it back out.
//!
//! ## Core Types
//!
//! - [`Element`]: a [`Question`] or a [`Group`] of further elements
//! - [`Attribute`]: a scalar cell value or a [`LabelMap`] of translations
//! - [`ChoiceList`]: a named list of [`ChoiceEntry`] values shared by select questions
//! - [`Settings`]: the single row of form-level settings
//!
//! ## Building Documents
//!
//! ```rust
//! use cueform::{ChoiceList, Group, Question, SurveyDocument};
//!
//! let mut document = SurveyDocument::new();
//! document.elements.push(
//!     Group::new("father")
//!         .with_label("English (en)", "Father")
//!         .with_child(Question::new("age", "integer").with_label("English (en)", "Age"))
//!         .into(),
//! );
//! document.add_choice_list(
//!     ChoiceList::new("yes_no")
//!         .with_entry("yes", [("English (en)", "Yes")])
//!         .with_entry("no", [("English (en)", "No")]),
//! );
//!
//! assert_eq!(document.max_depth(), 2);
//! ```

use crate::lang::is_translatable;
use crate::LabelMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type cell of a plain group's opening row.
pub const BEGIN_GROUP: &str = "begin_group";

/// Value of an element attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Text(String),
    Labels(LabelMap),
}

impl Attribute {
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Attribute::Text(text) => Some(text),
            Attribute::Labels(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_labels(&self) -> Option<&LabelMap> {
        match self {
            Attribute::Labels(labels) => Some(labels),
            Attribute::Text(_) => None,
        }
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::Text(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::Text(value)
    }
}

impl From<LabelMap> for Attribute {
    fn from(value: LabelMap) -> Self {
        Attribute::Labels(value)
    }
}

/// Element attributes other than `type` and `name`, keyed by field name.
///
/// Equality ignores key order.
pub type Attributes = IndexMap<String, Attribute>;

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub name: String,
    /// Raw question type, e.g. `text`, `integer`, `select_one`.
    pub question_type: String,
    /// Name of the choice list this question selects from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Question {
    #[must_use]
    pub fn new(name: &str, question_type: &str) -> Self {
        Question {
            name: name.to_string(),
            question_type: question_type.to_string(),
            choices: None,
            attributes: Attributes::new(),
        }
    }

    /// Points the question at a choice list.
    #[must_use]
    pub fn with_choices(mut self, list: &str) -> Self {
        self.choices = Some(list.to_string());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Adds a translation of the `label` field.
    #[must_use]
    pub fn with_label(mut self, lang: &str, text: &str) -> Self {
        add_translation(&mut self.attributes, "label", lang, text);
        self
    }

    /// Adds a translation of any translatable field.
    #[must_use]
    pub fn with_translation(mut self, field: &str, lang: &str, text: &str) -> Self {
        add_translation(&mut self.attributes, field, lang, text);
        self
    }
}

/// A group (or repeat) of elements, flattened as a begin/end row pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Raw type of the opening row, e.g. `begin_group` or `begin_repeat`.
    pub group_type: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Group {
    /// Creates an empty `begin_group` group.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Group {
            name: name.to_string(),
            group_type: BEGIN_GROUP.to_string(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Overrides the opening row type, e.g. `begin_repeat`.
    #[must_use]
    pub fn with_type(mut self, group_type: &str) -> Self {
        self.group_type = group_type.to_string();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, lang: &str, text: &str) -> Self {
        add_translation(&mut self.attributes, "label", lang, text);
        self
    }

    /// Type cell of the row closing this group: the opening type with its
    /// `begin` prefix replaced by `end`.
    ///
    /// Group types without the `begin` prefix cannot be written to a sheet;
    /// [`encode_survey`](crate::survey::encode_survey) rejects them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cueform::Group;
    ///
    /// assert_eq!(Group::new("g").end_type(), "end_group");
    /// assert_eq!(Group::new("r").with_type("begin repeat").end_type(), "end repeat");
    /// ```
    #[must_use]
    pub fn end_type(&self) -> String {
        match self.group_type.strip_prefix("begin") {
            Some(suffix) => format!("end{}", suffix),
            None => format!("end_{}", self.group_type),
        }
    }
}

fn add_translation(attributes: &mut Attributes, field: &str, lang: &str, text: &str) {
    debug_assert!(is_translatable(field), "{} is not translatable", field);
    match attributes.get_mut(field) {
        Some(Attribute::Labels(labels)) => {
            labels.insert(lang.to_string(), text.to_string());
        }
        _ => {
            let labels: LabelMap = [(lang, text)].into_iter().collect();
            attributes.insert(field.to_string(), Attribute::Labels(labels));
        }
    }
}

/// A survey element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Question(Question),
    Group(Group),
}

impl Element {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Element::Question(question) => &question.name,
            Element::Group(group) => &group.name,
        }
    }

    /// Raw type discriminator of the element's row.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Element::Question(question) => &question.question_type,
            Element::Group(group) => &group.group_type,
        }
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        match self {
            Element::Question(question) => &question.attributes,
            Element::Group(group) => &group.attributes,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&LabelMap> {
        self.attributes().get("label").and_then(Attribute::as_labels)
    }

    #[inline]
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    /// Nesting depth: 1 for a question, 1 + deepest child for a group.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Element::Question(_) => 1,
            Element::Group(group) => 1 + group.children.iter().map(Element::depth).max().unwrap_or(0),
        }
    }
}

impl From<Question> for Element {
    fn from(question: Question) -> Self {
        Element::Question(question)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Element::Group(group)
    }
}

/// One selectable value of a choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEntry {
    pub code: String,
    pub label: LabelMap,
    /// Extra columns of the choice row, e.g. keys used by `choice_filter`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

/// A named list of choices shared by every question selecting from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceList {
    pub name: String,
    pub entries: Vec<ChoiceEntry>,
}

impl ChoiceList {
    #[must_use]
    pub fn new(name: &str) -> Self {
        ChoiceList {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry with its translations.
    #[must_use]
    pub fn with_entry<I, K, V>(mut self, code: &str, label: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.push(ChoiceEntry {
            code: code.to_string(),
            label: label.into_iter().collect(),
            attributes: IndexMap::new(),
        });
        self
    }
}

/// Form-level settings, one value per settings column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(IndexMap<String, String>);

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Settings(IndexMap::new())
    }

    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Settings(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A whole form: top-level elements, the choice lists they select from, and
/// optional settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub elements: Vec<Element>,
    /// Choice lists keyed by list name. Equality ignores key order.
    #[serde(default)]
    pub choices: IndexMap<String, ChoiceList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl SurveyDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a choice list, replacing any list of the same name.
    pub fn add_choice_list(&mut self, list: ChoiceList) -> Option<ChoiceList> {
        self.choices.insert(list.name.clone(), list)
    }

    #[must_use]
    pub fn choice_list(&self, name: &str) -> Option<&ChoiceList> {
        self.choices.get(name)
    }

    /// Deepest nesting among the top-level elements, 0 for an empty document.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.elements.iter().map(Element::depth).max().unwrap_or(0)
    }
}
