use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;

mod commands;
mod error;
mod family;
mod output;
mod paths;
mod quiz;

use crate::commands::{Prompt, Shell};
use crate::family::PersonStore;
use crate::output::console::ConsoleOutput;
use crate::quiz::{Catalog, Settings};

#[derive(Parser, Debug)]
#[command(name = "family-quiz")]
#[command(about = "Keep your family tree and get quizzed on your ancestors")]
struct Args {
    /// People file (CSV), created on first save
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Question definitions (YAML), the bundled set is used if absent
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Questions per quiz, 0 to keep going until every question was asked
    #[arg(short, long, default_value = "10")]
    rounds: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::open(&path)?,
        None => {
            let path = paths::default_question_file()?;
            if path.exists() {
                Catalog::open(&path)?
            } else {
                info!("No question file at {:?}, using the bundled questions", path);
                Catalog::bundled()?
            }
        }
    };
    Ok(catalog)
}

fn run(args: Args) -> Result<()> {
    let catalog = load_catalog(args.questions).context("Could not load questions")?;
    let data = match args.data {
        Some(path) => path,
        None => paths::default_people_file()?,
    };
    let store = PersonStore::open(&data)?;
    info!("Using people file {:?}", store.path());
    if !store.warnings().is_empty() {
        println!(
            "⚠️  {} problem(s) found while loading {:?}, see the warnings above.",
            store.warnings().len(),
            data
        );
    }

    let settings = Settings {
        max_questions: Some(args.rounds).filter(|rounds| *rounds > 0),
    };
    let stdin = io::stdin();
    let prompt = Prompt::new(stdin.lock(), io::stdout());
    let mut shell = Shell::new(prompt, store, catalog, settings, ConsoleOutput::new(), args.seed);
    shell.run()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
