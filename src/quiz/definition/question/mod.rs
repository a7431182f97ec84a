use lazy_static::lazy_static;
use rand::RngCore;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use unidecode::unidecode;

use crate::error::ConfigurationError;
use crate::family::{is_field_name, ParentRole, Person, PersonStore};
use crate::quiz::definition::kind::Variant;

#[cfg(test)]
mod tests;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{([^{}]*)\}").unwrap();
    static ref REFERENCE_REGEX: Regex =
        Regex::new(r#"^(?:person|get_parent\(\s*['"]([a-z_]+)['"]\s*\))\.([a-z0-9_]+)$"#).unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Folds case, accents and whitespace so that answers typed by hand compare
/// equal to the stored values.
pub fn normalize(answer: &str) -> String {
    let answer = unidecode(answer).to_lowercase();
    WHITESPACE_REGEX.replace_all(answer.trim(), " ").into()
}

fn default_tag() -> String {
    "multiple_choice".to_owned()
}

/// One entry of the question file, as written by the user.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawQuestion {
    pub id: String,
    #[serde(rename = "type", default = "default_tag")]
    pub tag: String,
    pub field: String,
    pub question: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub distractors: Option<usize>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    Person,
    Parent(ParentRole),
}

/// A field of the person being asked about, or of one of their parents.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldPath {
    pub role: Role,
    pub field: String,
}

impl FieldPath {
    pub fn person(field: &str) -> Self {
        FieldPath {
            role: Role::Person,
            field: field.to_owned(),
        }
    }

    pub fn parent(role: ParentRole, field: &str) -> Self {
        FieldPath {
            role: Role::Parent(role),
            field: field.to_owned(),
        }
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim();
        let (owner, field) = match path.find('.') {
            Some(dot) => (&path[..dot], &path[dot + 1..]),
            None => ("person", path),
        };
        if !is_field_name(field) {
            return Err(format!("'{}' is not a field name", path));
        }
        match owner {
            "person" => Ok(FieldPath::person(field)),
            other => match ParentRole::from_field(other) {
                Some(role) => Ok(FieldPath::parent(role, field)),
                None => Err(format!("'{}' is not person, father or mother", other)),
            },
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Role::Person => write!(f, "{}", self.field),
            Role::Parent(role) => write!(f, "{}.{}", role, self.field),
        }
    }
}

fn parse_reference(placeholder: &str) -> Result<FieldPath, String> {
    let captures = REFERENCE_REGEX
        .captures(placeholder.trim())
        .ok_or_else(|| format!("'{{{}}}' is not a person or get_parent(..) field", placeholder))?;
    let field = &captures[2];
    match captures.get(1) {
        None => Ok(FieldPath::person(field)),
        Some(role) => ParentRole::from_field(role.as_str())
            .map(|role| FieldPath::parent(role, field))
            .ok_or_else(|| format!("get_parent('{}') is not father or mother", role.as_str())),
    }
}

/// Question text with `{person.<field>}` and `{get_parent('father').<field>}`
/// placeholders.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    source: String,
    references: Vec<FieldPath>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Template, String> {
        if source.trim().is_empty() {
            return Err("question text is empty".to_owned());
        }
        let mut references = Vec::new();
        for captures in PLACEHOLDER_REGEX.captures_iter(source) {
            let reference = parse_reference(&captures[1])?;
            if !references.contains(&reference) {
                references.push(reference);
            }
        }
        Ok(Template {
            source: source.to_owned(),
            references,
        })
    }

    pub fn references(&self) -> &[FieldPath] {
        &self.references
    }

    pub fn render(&self, subject: &Subject) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.source, |captures: &Captures| {
                match parse_reference(&captures[1]) {
                    Ok(path) => subject.render(&path),
                    Err(_) => captures[0].to_owned(),
                }
            })
            .into()
    }
}

/// The person a question is asked about, along with the family needed to
/// resolve their parents.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'a> {
    pub person: &'a Person,
    pub store: &'a PersonStore,
}

impl<'a> Subject<'a> {
    pub fn new(person: &'a Person, store: &'a PersonStore) -> Self {
        Subject { person, store }
    }

    pub fn get_parent(&self, role: ParentRole) -> Option<&'a Person> {
        self.store.get_parent(self.person, role)
    }

    /// The person owning the fields of `role`.
    pub fn target(&self, role: Role) -> Option<&'a Person> {
        match role {
            Role::Person => Some(self.person),
            Role::Parent(parent) => self.get_parent(parent),
        }
    }

    pub fn lookup(&self, path: &FieldPath) -> Option<String> {
        self.target(path.role).and_then(|p| p.field(&path.field))
    }

    /// Like `lookup` but never fails: an unknown parent renders as
    /// "Unknown Father" and missing fields as nothing.
    pub fn render(&self, path: &FieldPath) -> String {
        match (self.lookup(path), path.role) {
            (Some(value), _) => value,
            (None, Role::Parent(role)) if path.field == "name" && self.get_parent(role).is_none() => {
                match role {
                    ParentRole::Father => "Unknown Father".to_owned(),
                    ParentRole::Mother => "Unknown Mother".to_owned(),
                }
            }
            (None, _) => String::new(),
        }
    }

    /// Everyone in the family but the subject.
    pub fn others(&self) -> impl Iterator<Item = &'a Person> + 'a {
        let id = self.person.id();
        self.store.people().filter(move |p| p.id() != id)
    }
}

/// The parts every question type shares, checked and parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub template: Template,
    pub field: FieldPath,
    pub required_fields: Vec<FieldPath>,
}

/// Checks a raw definition before anything is built from it. The answer
/// field always counts as required.
pub fn validate(raw: &RawQuestion) -> Result<Definition, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::invalid(&raw.id, reason);
    if raw.id.trim().is_empty() {
        return Err(invalid("id is empty".to_owned()));
    }
    if raw.required_fields.is_empty() {
        return Err(invalid("at least one required field must be listed".to_owned()));
    }
    let template = Template::parse(&raw.question).map_err(invalid)?;
    let field: FieldPath = raw.field.parse().map_err(invalid)?;
    let mut required_fields = Vec::new();
    for path in &raw.required_fields {
        let path: FieldPath = path.parse().map_err(invalid)?;
        if !required_fields.contains(&path) {
            required_fields.push(path);
        }
    }
    if !required_fields.contains(&field) {
        required_fields.push(field.clone());
    }
    if raw.distractors == Some(0) {
        return Err(invalid("distractors must be at least 1".to_owned()));
    }
    Ok(Definition {
        template,
        field,
        required_fields,
    })
}

#[derive(Clone, Debug)]
pub struct Question {
    pub id: String,
    pub tag: String,
    pub definition: Definition,
    pub variant: Variant,
}

impl Question {
    pub fn new(raw: &RawQuestion, definition: Definition, variant: Variant) -> Self {
        Question {
            id: raw.id.clone(),
            tag: raw.tag.clone(),
            definition,
            variant,
        }
    }

    /// Every required field is filled in, every parent the text mentions is
    /// known, and the question type has what it needs.
    pub fn is_valid_for(&self, subject: &Subject) -> bool {
        let has_fields = self
            .definition
            .required_fields
            .iter()
            .chain(self.definition.template.references())
            .all(|path| subject.lookup(path).is_some());
        has_fields && self.variant.get_kind().is_valid_for(self, subject)
    }

    pub fn text(&self, subject: &Subject) -> String {
        self.variant.get_kind().text(self, subject)
    }

    pub fn correct_answer(&self, subject: &Subject) -> Option<String> {
        self.variant.get_kind().correct_answer(self, subject)
    }

    /// The answer as shown to the player once the question is over.
    pub fn reveal(&self, subject: &Subject) -> Option<String> {
        self.variant.get_kind().reveal(self, subject)
    }

    pub fn choices(&self, subject: &Subject, rng: &mut dyn RngCore) -> Option<Vec<String>> {
        self.variant.get_kind().choices(self, subject, rng)
    }

    pub fn is_correct(&self, subject: &Subject, answer: &str) -> bool {
        self.variant.get_kind().is_correct(self, subject, answer)
    }
}
