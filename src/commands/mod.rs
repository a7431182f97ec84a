use anyhow::Result;
use log::info;
use std::io::{BufRead, Write};

use crate::error::ValidationError;
use crate::family::PersonStore;
use crate::output::QuizOutput;
use crate::quiz::{Catalog, EndReason, Settings};

mod people;
mod prompt;
mod quiz;

pub use self::prompt::Prompt;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Command {
    TakeQuiz,
    AddPerson,
    EditPerson,
    ListPeople,
    Exit,
}

const MENU: [(Command, &str); 5] = [
    (Command::TakeQuiz, "Take Ancestor Quiz"),
    (Command::AddPerson, "Add New Person"),
    (Command::EditPerson, "Edit Person"),
    (Command::ListPeople, "List All People"),
    (Command::Exit, "Exit"),
];

fn parse_command(value: &str) -> Result<Command, ValidationError> {
    value
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| MENU.get(index))
        .map(|(command, _)| *command)
        .ok_or(ValidationError::Choice(MENU.len()))
}

/// The interactive menu, owning the family and the questions for the whole
/// process.
pub struct Shell<R, W, O> {
    prompt: Prompt<R, W>,
    store: PersonStore,
    catalog: Catalog,
    settings: Settings,
    output: O,
    seed: Option<u64>,
}

impl<R: BufRead, W: Write, O: QuizOutput + Clone> Shell<R, W, O> {
    pub fn new(
        prompt: Prompt<R, W>,
        store: PersonStore,
        catalog: Catalog,
        settings: Settings,
        output: O,
        seed: Option<u64>,
    ) -> Self {
        Shell {
            prompt,
            store,
            catalog,
            settings,
            output,
            seed,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &PersonStore {
        &self.store
    }

    #[cfg(test)]
    pub fn prompt(&self) -> &Prompt<R, W> {
        &self.prompt
    }

    /// Runs until the user exits or the input ends.
    pub fn run(&mut self) -> Result<()> {
        if self.store.is_empty() {
            self.first_run()?;
        }

        loop {
            self.prompt.say("\n📜 Family History App")?;
            for (index, (_, label)) in MENU.iter().enumerate() {
                self.prompt.say(format!("{}. {}", index + 1, label))?;
            }
            let command = match self
                .prompt
                .ask_valid(&format!("Choose an option (1-{}): ", MENU.len()), parse_command)?
            {
                Some(command) => command,
                None => break,
            };
            info!("Running {:?}", command);
            match command {
                Command::TakeQuiz => self.take_quiz()?,
                Command::AddPerson => {
                    self.add_person()?;
                }
                Command::EditPerson => {
                    if people::edit_person(&mut self.prompt, &mut self.store)? {
                        self.store.save()?;
                    }
                }
                Command::ListPeople => people::list_people(&mut self.prompt, &self.store)?,
                Command::Exit => break,
            }
        }

        self.prompt.say("\nGoodbye! 👋")?;
        Ok(())
    }

    fn first_run(&mut self) -> Result<()> {
        self.prompt.say("Welcome! Your family tree is empty.")?;
        self.prompt.say("Let's start by adding the first person.")?;
        while self.add_person()? {
            if !self
                .prompt
                .confirm("\nWould you like to add another family member? (y/n): ")?
            {
                break;
            }
        }
        Ok(())
    }

    /// `false` when the input ran out before the person was complete.
    fn add_person(&mut self) -> Result<bool> {
        let added = people::add_person(&mut self.prompt, &mut self.store)?.is_some();
        if added {
            self.store.save()?;
        }
        Ok(added)
    }

    fn take_quiz(&mut self) -> Result<()> {
        let (reason, _) = quiz::take_quiz(
            &mut self.prompt,
            &self.store,
            &self.catalog,
            &self.settings,
            self.output.clone(),
            self.seed,
        )?;
        if reason == EndReason::NotEnoughData
            && self.prompt.confirm("Would you like to add a new person now? (y/n): ")?
        {
            self.add_person()?;
        }
        Ok(())
    }
}
