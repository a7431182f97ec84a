use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ConfigurationError;

pub mod kind;
pub mod question;

#[cfg(test)]
mod tests;

pub use self::kind::{Kind, Variant};
pub use self::question::{FieldPath, Question, RawQuestion, Role, Subject};

const BUNDLED_QUESTIONS: &str = include_str!("../../../assets/questions.yaml");

/// Every question the quiz can ask, in file order.
#[derive(Clone, Debug)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn open(source: &Path) -> Result<Catalog, ConfigurationError> {
        let yaml = fs::read_to_string(source).map_err(|e| ConfigurationError::Unreadable {
            path: source.to_path_buf(),
            source: e,
        })?;
        let catalog = Catalog::from_yaml(&yaml)?;
        info!("Loaded {} questions from {:?}", catalog.len(), source);
        Ok(catalog)
    }

    /// The questions shipped with the program.
    pub fn bundled() -> Result<Catalog, ConfigurationError> {
        Catalog::from_yaml(BUNDLED_QUESTIONS)
    }

    /// Stops at the first broken definition.
    pub fn from_yaml(yaml: &str) -> Result<Catalog, ConfigurationError> {
        let entries: Vec<serde_yaml::Value> =
            serde_yaml::from_str(yaml).map_err(ConfigurationError::Syntax)?;

        let mut questions: Vec<Question> = Vec::new();
        let mut ids = HashSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let id = entry_id(&entry).unwrap_or_else(|| format!("#{}", index + 1));

            let raw: RawQuestion = serde_yaml::from_value(entry).map_err(|e| {
                ConfigurationError::Malformed {
                    id: id.clone(),
                    reason: e.to_string(),
                }
            })?;

            let constructor =
                kind::constructor(&raw.tag).ok_or_else(|| ConfigurationError::UnknownType {
                    id: id.clone(),
                    tag: raw.tag.clone(),
                })?;
            let definition = question::validate(&raw)?;
            if !ids.insert(raw.id.clone()) {
                return Err(ConfigurationError::invalid(&raw.id, "id is used twice"));
            }
            let variant = constructor(&raw)?;

            if !raw.extra.is_empty() {
                debug!(
                    "Question '{}' has extra keys: {:?}",
                    raw.id,
                    raw.extra.keys().collect::<Vec<_>>()
                );
            }
            questions.push(Question::new(&raw, definition, variant));
        }

        Ok(Catalog { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn entry_id(entry: &serde_yaml::Value) -> Option<String> {
    match entry.get("id")? {
        serde_yaml::Value::String(id) => Some(id.clone()),
        serde_yaml::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
