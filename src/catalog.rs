//! CSV import and export of the question catalog.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::{categories, choices, questions};
use crate::db::{self, Category, Choice, Question};

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";
const CHOICES_FILE: &str = "choices.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_catalog(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = categories::get_all_categories(pool).await?;
    let questions = questions::get_all_questions(pool).await?;
    let choices = choices::get_all_choices(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        "Exporting {} categories, {} questions, {} choices to {}",
        categories.len(),
        questions.len(),
        choices.len(),
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    write_to(&dir.join(CHOICES_FILE), choices)?;
    Ok(())
}

pub async fn import_catalog(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    let choices: Vec<Choice> = read_from(&dir.join(CHOICES_FILE))?;
    for question in &questions {
        let correct = choices
            .iter()
            .filter(|c| c.question_id == question.id && c.is_correct)
            .count();
        if correct != 1 {
            tracing::warn!(
                "Question {} has {correct} correct choices, expected exactly one",
                question.id
            );
        }
    }
    db::import_catalog(pool, &categories, &questions, &choices)
        .await
        .context("Failed to import catalog")?;
    tracing::info!(
        "Imported {} categories, {} questions, {} choices",
        categories.len(),
        questions.len(),
        choices.len()
    );
    Ok(())
}
