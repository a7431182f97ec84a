use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{DataFormatError, LoadWarning, UnresolvedReferenceError, ValidationError};
use crate::family::person::*;


pub const SPOUSE_COLUMN: &str = "spouse";

/// Every person of the family, keyed by id, backed by a CSV file.
#[derive(Debug)]
pub struct PersonStore {
    path: Option<PathBuf>,
    columns: Vec<String>,
    people: BTreeMap<PersonId, Person>,
    next_id: usize,
    warnings: Vec<LoadWarning>,
}

impl Default for PersonStore {
    fn default() -> Self {
        PersonStore {
            path: None,
            columns: STANDARD_COLUMNS.iter().map(|c| c.to_string()).collect(),
            people: BTreeMap::new(),
            next_id: 0,
            warnings: Vec::new(),
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl PersonStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads the people file at `path`. A missing file is an empty family.
    pub fn open(path: &Path) -> Result<PersonStore> {
        let mut store = if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Could not open people file {:?}", path))?;
            PersonStore::from_reader(file)
                .with_context(|| format!("Could not read people file {:?}", path))?
        } else {
            info!("No people file at {:?}, starting with an empty family", path);
            PersonStore::new()
        };
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PersonStore> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let header: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();
        for required in &["name", "gender"] {
            if !header.iter().any(|h| h == required) {
                return Err(anyhow!("People file has no '{}' column", required));
            }
        }

        let mut store = PersonStore::new();
        for column in &header {
            if !is_column_name(column) {
                warn!("Ignoring unnamed column in people file");
            } else if !store.columns.contains(column) {
                store.columns.push(column.clone());
            }
        }

        for (index, record) in csv_reader.records().enumerate() {
            let row = index as u64 + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let error = match e.kind() {
                        csv::ErrorKind::UnequalLengths {
                            expected_len, len, ..
                        } => DataFormatError::ColumnCount {
                            row,
                            expected: *expected_len as usize,
                            found: *len as usize,
                        },
                        _ => DataFormatError::Unreadable {
                            row,
                            message: e.to_string(),
                        },
                    };
                    store.warn(error.into());
                    continue;
                }
            };
            match parse_row(&header, &record) {
                Ok(person) => {
                    store.insert(person);
                }
                Err(source) => store.warn(DataFormatError::InvalidValue { row, source }.into()),
            }
        }

        store.check_references();
        info!(
            "Loaded {} people ({} warnings)",
            store.people.len(),
            store.warnings.len()
        );
        Ok(store)
    }

    fn warn(&mut self, warning: LoadWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn check_references(&mut self) {
        let mut unresolved = Vec::new();
        for person in self.people.values() {
            for role in &[ParentRole::Father, ParentRole::Mother] {
                if let Some(parent) = person.parent_name(*role) {
                    if self.get_parent(person, *role).is_none() {
                        unresolved.push(UnresolvedReferenceError {
                            child: person.name.clone(),
                            role: role.to_string(),
                            parent: parent.to_owned(),
                        });
                    }
                }
            }
        }
        for error in unresolved {
            self.warn(error.into());
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Header of the file, standard columns first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    /// The only person carrying `name`, compared case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        let mut matches = self.people.values().filter(|p| same_name(&p.name, name));
        match (matches.next(), matches.next()) {
            (Some(person), None) => Some(person),
            _ => None,
        }
    }

    pub fn get_parent(&self, person: &Person, role: ParentRole) -> Option<&Person> {
        person
            .parent_name(role)
            .and_then(|name| self.find_by_name(name))
            .filter(|parent| parent.id != person.id)
    }

    pub fn children(&self, id: PersonId) -> Vec<&Person> {
        self.people
            .values()
            .filter(|p| {
                [ParentRole::Father, ParentRole::Mother]
                    .iter()
                    .any(|role| self.get_parent(p, *role).map(|parent| parent.id) == Some(id))
            })
            .collect()
    }

    fn insert(&mut self, mut person: Person) -> PersonId {
        for column in person.extra.keys() {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        let id = PersonId(self.next_id);
        self.next_id += 1;
        person.id = id;
        self.people.insert(id, person);
        id
    }

    pub fn add(&mut self, person: Person) -> Result<PersonId, ValidationError> {
        if self.people.values().any(|p| same_name(&p.name, &person.name)) {
            return Err(ValidationError::DuplicateName(person.name));
        }
        let id = self.insert(person);
        info!("Added {} as {}", self.people[&id].name, id);
        Ok(id)
    }

    /// Applies every `(field, value)` change or none of them. Renaming a
    /// person carries the new name over to the records referring to them.
    pub fn update<I, K, V>(&mut self, id: PersonId, changes: I) -> Result<&Person, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut person = self
            .people
            .get(&id)
            .cloned()
            .ok_or(ValidationError::UnknownPerson(id.0))?;
        let old_name = person.name.clone();
        for (field, value) in changes {
            person.set_field(field.as_ref(), value.as_ref())?;
        }

        let renamed = person.name != old_name;
        if renamed
            && self
                .people
                .values()
                .any(|p| p.id != id && same_name(&p.name, &person.name))
        {
            return Err(ValidationError::DuplicateName(person.name));
        }

        for column in person.extra.keys() {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        let new_name = person.name.clone();
        self.people.insert(id, person);

        if renamed {
            for other in self.people.values_mut().filter(|p| p.id != id) {
                for reference in [&mut other.father, &mut other.mother].iter_mut() {
                    if reference.as_deref().map_or(false, |n| same_name(n, &old_name)) {
                        **reference = Some(new_name.clone());
                    }
                }
                if let Some(spouse) = other.extra.get_mut(SPOUSE_COLUMN) {
                    if same_name(spouse, &old_name) {
                        *spouse = new_name.clone();
                    }
                }
            }
        }

        Ok(&self.people[&id])
    }

    /// Returns the existing person named `name`, or records a new one whose
    /// gender follows from the parent role.
    pub fn ensure_parent(&mut self, name: &str, role: ParentRole) -> Result<PersonId, ValidationError> {
        if let Some(parent) = self.find_by_name(name) {
            return Ok(parent.id);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required(role.to_string()));
        }
        self.add(Person::new(name, role.gender()))
    }

    /// Marries two people, updating both records in one step. A previous
    /// partner pointing back at either of them is unlinked.
    pub fn link_spouses(&mut self, a: PersonId, b: PersonId) -> Result<(Person, Person), ValidationError> {
        if a == b {
            return Err(ValidationError::SelfReference);
        }
        let name_a = self.get(a).ok_or(ValidationError::UnknownPerson(a.0))?.name.clone();
        let name_b = self.get(b).ok_or(ValidationError::UnknownPerson(b.0))?.name.clone();

        for other in self.people.values_mut().filter(|p| p.id != a && p.id != b) {
            let points_back = other
                .extra
                .get(SPOUSE_COLUMN)
                .map_or(false, |s| same_name(s, &name_a) || same_name(s, &name_b));
            if points_back {
                other.extra.remove(SPOUSE_COLUMN);
            }
        }

        for (id, spouse) in &[(a, &name_b), (b, &name_a)] {
            if let Some(person) = self.people.get_mut(id) {
                person.extra.insert(SPOUSE_COLUMN.to_owned(), spouse.to_string());
            }
        }
        if !self.columns.iter().any(|c| c == SPOUSE_COLUMN) {
            self.columns.push(SPOUSE_COLUMN.to_owned());
        }

        Ok((self.people[&a].clone(), self.people[&b].clone()))
    }

    /// Clears the spouse of `id` and, when the former partner still points
    /// back, theirs too. Returns the former partner if they are known.
    pub fn unlink_spouse(&mut self, id: PersonId) -> Result<Option<Person>, ValidationError> {
        let person = self.people.get_mut(&id).ok_or(ValidationError::UnknownPerson(id.0))?;
        let name = person.name.clone();
        let former = match person.extra.remove(SPOUSE_COLUMN) {
            Some(former) => former,
            None => return Ok(None),
        };

        let mut partner = None;
        for other in self.people.values_mut() {
            if other.id == id || !same_name(&other.name, &former) {
                continue;
            }
            let points_back = other
                .extra
                .get(SPOUSE_COLUMN)
                .map_or(false, |s| same_name(s, &name));
            if points_back {
                other.extra.remove(SPOUSE_COLUMN);
            }
            partner = Some(other.clone());
        }
        info!("Unlinked {} from {}", name, former);
        Ok(partner)
    }

    pub fn spouse(&self, person: &Person) -> Option<&Person> {
        person
            .field(SPOUSE_COLUMN)
            .and_then(|name| self.find_by_name(&name))
            .filter(|spouse| spouse.id != person.id)
    }

    /// Rewrites the whole people file.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().context("People store is not backed by a file")?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("Could not create directory {:?}", dir))?;
        }
        let file = File::create(path).with_context(|| format!("Could not write people file {:?}", path))?;
        self.write_to(file)?;
        info!("Saved {} people to {:?}", self.people.len(), path);
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for person in self.people.values() {
            let row: Vec<String> = self
                .columns
                .iter()
                .map(|column| person.field(column).unwrap_or_default())
                .collect();
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn parse_row(header: &[String], record: &csv::StringRecord) -> Result<Person, ValidationError> {
    let value_of = |column: &str| {
        header
            .iter()
            .position(|h| h == column)
            .and_then(|i| record.get(i))
            .unwrap_or("")
    };
    let name = value_of("name").trim();
    if name.is_empty() {
        return Err(ValidationError::Required("name".into()));
    }
    let mut person = Person::new(name, value_of("gender").parse()?);
    for (column, value) in header.iter().zip(record.iter()) {
        if is_column_name(column) && column != "name" && column != "gender" {
            person.set_field(column, value)?;
        }
    }
    Ok(person)
}
