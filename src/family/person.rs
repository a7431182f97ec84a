use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns every people file has, in the order they are written.
pub const STANDARD_COLUMNS: [&str; 8] = [
    "name",
    "gender",
    "birth_date",
    "death_date",
    "birth_place",
    "death_place",
    "father",
    "mother",
];

lazy_static! {
    static ref DATE_REGEX: Regex =
        Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").unwrap();
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if !DATE_REGEX.is_match(value) {
        return Err(ValidationError::Date(value.to_owned()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::Date(value.to_owned()))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole years between two dates.
pub fn years_between(from: &NaiveDate, to: &NaiveDate) -> i32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PersonId(pub usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(ValidationError::Gender(value.trim().to_owned())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    pub fn field(&self) -> &'static str {
        match self {
            ParentRole::Father => "father",
            ParentRole::Mother => "mother",
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            ParentRole::Father => Gender::Male,
            ParentRole::Mother => Gender::Female,
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "father" => Some(ParentRole::Father),
            "mother" => Some(ParentRole::Mother),
            _ => None,
        }
    }
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Field names are lowercase identifiers, which is also what the header of
/// the people file is made of.
pub fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

/// Extra columns keep whatever header the file gives them, as long as it is
/// not blank. Only `is_field_name` columns can be referenced by questions.
pub fn is_column_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.chars().any(char::is_control)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub(crate) id: PersonId,
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub death_place: Option<String>,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl Person {
    pub fn new<S: Into<String>>(name: S, gender: Gender) -> Self {
        Person {
            id: PersonId(0),
            name: name.into(),
            gender,
            birth_date: None,
            death_date: None,
            birth_place: None,
            death_place: None,
            father: None,
            mother: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    /// Textual value of any column, `None` when absent or blank.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => Some(self.name.clone()),
            "gender" => Some(self.gender.to_string()),
            "birth_date" => self.birth_date.as_ref().map(format_date),
            "death_date" => self.death_date.as_ref().map(format_date),
            "birth_place" => self.birth_place.clone(),
            "death_place" => self.death_place.clone(),
            "father" => self.father.clone(),
            "mother" => self.mother.clone(),
            other => self.extra.get(other).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Validates `value` for the column `name` and stores it. A blank value
    /// clears optional columns.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        match name {
            "name" => {
                self.name = non_empty(value).ok_or_else(|| ValidationError::Required("name".into()))?
            }
            "gender" => self.gender = value.parse()?,
            "birth_date" => self.birth_date = non_empty(value).map(|v| parse_date(&v)).transpose()?,
            "death_date" => self.death_date = non_empty(value).map(|v| parse_date(&v)).transpose()?,
            "birth_place" => self.birth_place = non_empty(value),
            "death_place" => self.death_place = non_empty(value),
            "father" => self.father = non_empty(value),
            "mother" => self.mother = non_empty(value),
            other if is_column_name(other) => match non_empty(value) {
                Some(v) => {
                    self.extra.insert(other.to_owned(), v);
                }
                None => {
                    self.extra.remove(other);
                }
            },
            other => return Err(ValidationError::UnknownField(other.to_owned())),
        };
        Ok(())
    }

    pub fn parent_name(&self, role: ParentRole) -> Option<&str> {
        match role {
            ParentRole::Father => self.father.as_deref(),
            ParentRole::Mother => self.mother.as_deref(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// Age in whole years at `date`, or at death if that came first.
    pub fn age_at(&self, date: &NaiveDate) -> Option<i32> {
        let birth = self.birth_date?;
        let end = match self.death_date {
            Some(death) if death < *date => death,
            _ => *date,
        };
        if end < birth {
            return None;
        }
        Some(years_between(&birth, &end))
    }

    pub fn age(&self) -> Option<i32> {
        self.age_at(&Local::now().naive_local().date())
    }

    /// Age at death, when both ends of the life are known.
    pub fn lifespan(&self) -> Option<i32> {
        match (self.birth_date, self.death_date) {
            (Some(birth), Some(death)) if birth <= death => Some(years_between(&birth, &death)),
            _ => None,
        }
    }
}
