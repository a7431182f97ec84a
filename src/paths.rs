use anyhow::{Context, Result};
use directories_next::BaseDirs;
use std::path::PathBuf;

const APP_DIR: &str = "family-quiz";

fn base_dirs() -> Result<BaseDirs> {
    BaseDirs::new().context("could not locate system directories")
}

pub fn default_people_file() -> Result<PathBuf> {
    let mut path = base_dirs()?.data_dir().to_path_buf();
    path.push(APP_DIR);
    path.push("people.csv");
    Ok(path)
}

pub fn default_question_file() -> Result<PathBuf> {
    let mut path = base_dirs()?.config_dir().to_path_buf();
    path.push(APP_DIR);
    path.push("questions.yaml");
    Ok(path)
}
