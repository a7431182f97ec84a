use std::path::PathBuf;
use thiserror::Error;

/// A row of the people file that could not be turned into a person.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataFormatError {
    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: {source}")]
    InvalidValue { row: u64, source: ValidationError },
    #[error("row {row}: {message}")]
    Unreadable { row: u64, message: String },
}

/// A parent name that does not match exactly one person.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{child}'s {role} '{parent}' is not a known person")]
pub struct UnresolvedReferenceError {
    pub child: String,
    pub role: String,
    pub parent: String,
}

/// Anything recoverable that happened while loading the people file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadWarning {
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
    #[error(transparent)]
    UnresolvedReference(#[from] UnresolvedReferenceError),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("could not read question file {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question file is not a list of definitions: {0}")]
    Syntax(#[source] serde_yaml::Error),
    #[error("question '{id}' has unknown type '{tag}'")]
    UnknownType { id: String, tag: String },
    #[error("question '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("question '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid<S: Into<String>>(id: &str, reason: S) -> Self {
        ConfigurationError::Invalid {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }

    /// The definition this error is about, if it concerns a single one.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            ConfigurationError::UnknownType { id, .. }
            | ConfigurationError::Malformed { id, .. }
            | ConfigurationError::Invalid { id, .. } => Some(id),
            ConfigurationError::Unreadable { .. } | ConfigurationError::Syntax(_) => None,
        }
    }
}

/// User or file input that breaks a field rule.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),
    #[error("'{0}' is not a gender, enter Male or Female")]
    Gender(String),
    #[error("'{0}' is not a valid date, use the YYYY-MM-DD format (e.g. 1990-01-15)")]
    Date(String),
    #[error("'{0}' is not a field of a person")]
    UnknownField(String),
    #[error("there is already a person named '{0}'")]
    DuplicateName(String),
    #[error("no person with id {0}")]
    UnknownPerson(usize),
    #[error("nobody is named '{0}', add them first")]
    UnknownName(String),
    #[error("a person cannot be linked to themselves")]
    SelfReference,
    #[error("please enter a number between 1 and {0}")]
    Choice(usize),
    #[error("an answer is required")]
    EmptyAnswer,
}
