use anyhow::Result;
use itertools::Itertools;
use std::io::{BufRead, Write};

use super::prompt::Prompt;
use crate::error::ValidationError;
use crate::family::store::SPOUSE_COLUMN;
use crate::family::*;

const OPTIONAL_FIELDS: [&str; 6] = [
    "birth_date",
    "death_date",
    "birth_place",
    "death_place",
    "father",
    "mother",
];

fn hint(field: &str) -> &'static str {
    match field {
        "birth_date" => " (format: YYYY-MM-DD, e.g., 1980-05-15)",
        "death_date" => " (format: YYYY-MM-DD, e.g., 2020-10-22)",
        "gender" => " (enter Male or Female)",
        _ => "",
    }
}

/// "birth_place" -> "Birth Place"
fn title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .join(" ")
}

/// Records the parents a person names, creating the ones nobody knows yet.
fn add_missing_parents<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    store: &mut PersonStore,
    person: &Person,
) -> Result<()> {
    for role in &[ParentRole::Father, ParentRole::Mother] {
        if let Some(name) = person.parent_name(*role) {
            if store.find_by_name(name).is_some() || same_person(name, &person.name) {
                continue;
            }
            if let Ok(id) = store.ensure_parent(name, *role) {
                let parent = store.get(id).map(|p| (p.name.clone(), p.gender));
                if let Some((name, gender)) = parent {
                    prompt.say(format!("✅ Added {} ({}) as a new person.", name, gender))?;
                }
            }
        }
    }
    Ok(())
}

fn same_person(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

enum SpouseAnswer {
    Keep,
    Clear,
    Link(PersonId),
}

/// Enter keeps the current spouse, `-` clears it.
fn ask_spouse<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    store: &mut PersonStore,
    id: PersonId,
    label: &str,
) -> Result<()> {
    let answer = prompt.ask_valid(label, |value| match value {
        "" => Ok(SpouseAnswer::Keep),
        "-" => Ok(SpouseAnswer::Clear),
        name => match store.find_by_name(name) {
            Some(spouse) if spouse.id() == id => Err(ValidationError::SelfReference),
            Some(spouse) => Ok(SpouseAnswer::Link(spouse.id())),
            None => Err(ValidationError::UnknownName(name.to_owned())),
        },
    })?;
    match answer {
        Some(SpouseAnswer::Link(spouse)) => {
            let (a, b) = store.link_spouses(id, spouse)?;
            prompt.say(format!("💍 {} and {} are now married.", a.name, b.name))?;
        }
        Some(SpouseAnswer::Clear) => {
            let former = store.unlink_spouse(id)?;
            if let (Some(person), Some(former)) = (store.get(id), former) {
                prompt.say(format!("{} and {} are no longer married.", person.name, former.name))?;
            }
        }
        Some(SpouseAnswer::Keep) | None => (),
    }
    Ok(())
}

/// Walks the user through every field of a new person. Returns `None` if
/// the input ran out before the person was complete.
pub fn add_person<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    store: &mut PersonStore,
) -> Result<Option<PersonId>> {
    prompt.say("\n=== Add New Person ===")?;

    let name = prompt.ask_valid("Name: ", |value| {
        if value.is_empty() {
            Err(ValidationError::Required("name".into()))
        } else if store.people().any(|p| same_person(&p.name, value)) {
            Err(ValidationError::DuplicateName(value.to_owned()))
        } else {
            Ok(value.to_owned())
        }
    })?;
    let name = match name {
        Some(name) => name,
        None => return Ok(None),
    };

    let label = format!("Gender{}: ", hint("gender"));
    let gender = match prompt.ask_valid(&label, |value| value.parse::<Gender>())? {
        Some(gender) => gender,
        None => return Ok(None),
    };

    let mut person = Person::new(name, gender);
    for field in &OPTIONAL_FIELDS {
        let label = format!("{}{} (press Enter to skip): ", title(field), hint(field));
        let updated = prompt.ask_valid(&label, |value| {
            let mut updated = person.clone();
            updated.set_field(field, value).map(|_| updated)
        })?;
        match updated {
            Some(updated) => person = updated,
            None => return Ok(None),
        }
    }

    let id = store.add(person.clone())?;
    add_missing_parents(prompt, store, &person)?;
    let name = person.name;
    ask_spouse(prompt, store, id, "Spouse (press Enter to skip): ")?;

    prompt.say(format!("\n✅ Added {} to the family tree!", name))?;
    Ok(Some(id))
}

/// Lets the user pick a person and change any of their fields. Enter keeps
/// a value, `-` clears it.
pub fn edit_person<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    store: &mut PersonStore,
) -> Result<bool> {
    if store.is_empty() {
        prompt.say("No people in the database to edit.")?;
        return Ok(false);
    }

    prompt.say("\n=== Edit Person ===")?;
    prompt.say("\nSelect a person to edit:")?;
    let ids: Vec<PersonId> = store.people().map(|p| p.id()).collect();
    for (index, person) in store.people().enumerate() {
        prompt.say(format!("{}. {}", index + 1, person.name))?;
    }

    let count = ids.len();
    let choice = prompt.ask_valid("\nEnter number: ", |value| {
        value
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1 && *n <= count)
            .ok_or(ValidationError::Choice(count))
    })?;
    let id = match choice {
        Some(choice) => ids[choice - 1],
        None => return Ok(false),
    };

    let mut draft = match store.get(id) {
        Some(person) => person.clone(),
        None => return Ok(false),
    };
    prompt.say(format!("\nEditing: {}", draft.name))?;

    let columns: Vec<String> = store
        .columns()
        .iter()
        .filter(|c| c.as_str() != SPOUSE_COLUMN)
        .cloned()
        .collect();
    let mut changes = Vec::new();
    for field in &columns {
        let current = draft.field(field).unwrap_or_default();
        let label = format!("{}{} [{}]: ", title(field), hint(field), current);
        let change = prompt.ask_valid(&label, |value| {
            if value.is_empty() {
                return Ok(None);
            }
            let value = if value == "-" { "" } else { value };
            draft.set_field(field, value)?;
            Ok(Some(value.to_owned()))
        })?;
        match change {
            Some(Some(value)) => changes.push((field.clone(), value)),
            Some(None) => (),
            None => return Ok(false),
        }
    }

    let person = match store.update(id, changes) {
        Ok(person) => person.clone(),
        Err(e) => {
            prompt.warn(e.to_string())?;
            return Ok(false);
        }
    };
    add_missing_parents(prompt, store, &person)?;
    let name = person.name;

    let current_spouse = store
        .get(id)
        .and_then(|p| p.field(SPOUSE_COLUMN))
        .unwrap_or_default();
    ask_spouse(prompt, store, id, &format!("Spouse [{}]: ", current_spouse))?;

    prompt.say(format!("\n✅ Updated {}'s information!", name))?;
    Ok(true)
}

pub fn list_people<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, store: &PersonStore) -> Result<()> {
    prompt.say("\n=== Family Members ===")?;
    if store.is_empty() {
        prompt.say("Nobody yet.")?;
    }
    let or_unknown = |value: Option<String>| value.unwrap_or_else(|| "?".to_owned());
    for (index, person) in store.people().enumerate() {
        prompt.say(format!("{}. {} ({})", index + 1, person.name, person.gender))?;
        if person.birth_date.is_some() || person.birth_place.is_some() {
            prompt.say(format!(
                "   Born: {} in {}",
                or_unknown(person.field("birth_date")),
                or_unknown(person.field("birth_place"))
            ))?;
        }
        if let Some(age) = person.age().filter(|_| person.is_alive()) {
            prompt.say(format!("   Age: {}", age))?;
        }
        if person.death_date.is_some() || person.death_place.is_some() {
            prompt.say(format!(
                "   Died: {} in {}",
                or_unknown(person.field("death_date")),
                or_unknown(person.field("death_place"))
            ))?;
        }
        let parents = [ParentRole::Father, ParentRole::Mother]
            .iter()
            .filter_map(|role| person.parent_name(*role))
            .join(" & ");
        if !parents.is_empty() {
            prompt.say(format!("   Parents: {}", parents))?;
        }
        if let Some(spouse) = store.spouse(person) {
            prompt.say(format!("   Spouse: {}", spouse.name))?;
        }
        let children = store.children(person.id());
        if !children.is_empty() {
            prompt.say(format!(
                "   Children: {}",
                children.iter().map(|c| c.name.as_str()).join(", ")
            ))?;
        }
        prompt.say("")?;
    }
    Ok(())
}
