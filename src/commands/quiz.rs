use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};

use super::prompt::Prompt;
use crate::family::PersonStore;
use crate::output::{Message, QuizOutput};
use crate::quiz::{Catalog, EndReason, Score, Session, Settings};

const QUIT: &str = "q";

/// Runs one quiz until it ends on its own or the player quits.
pub fn take_quiz<R: BufRead, W: Write, O: QuizOutput>(
    prompt: &mut Prompt<R, W>,
    store: &PersonStore,
    catalog: &Catalog,
    settings: &Settings,
    output: O,
    seed: Option<u64>,
) -> Result<(EndReason, Score)> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    output.say(&Message::QuizRules);
    let mut session = Session::new(store, catalog, settings.clone(), output, rng);

    loop {
        session.advance_to_prompt();
        if let Some(reason) = session.end_reason() {
            return Ok((reason, session.score()));
        }

        let input = match prompt.ask("Your answer: ")? {
            Some(input) => input,
            None => {
                session.end();
                continue;
            }
        };
        if input.eq_ignore_ascii_case(QUIT) {
            session.end();
            continue;
        }
        if let Err(e) = session.answer(&input) {
            prompt.warn(e.to_string())?;
        }
    }
}
