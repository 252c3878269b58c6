use color_eyre::{eyre::OptionExt, Result};

use super::{
    models::{MultipleChoiceRow, StoredRow},
    Db,
};
use crate::{
    authoring::MultipleChoiceStore,
    models::{MultipleChoiceQuestion, RecordId, SavedRecord},
};

/// JSON-encoded columns of a multiple-choice payload.
struct Encoded {
    options: String,
    correct_answers: String,
    explanation: String,
    tags: String,
}

impl Encoded {
    fn new(payload: &MultipleChoiceQuestion) -> Result<Self> {
        Ok(Self {
            options: serde_json::to_string(&payload.options)?,
            correct_answers: serde_json::to_string(&payload.correct_answers)?,
            explanation: serde_json::to_string(&payload.explanation)?,
            tags: serde_json::to_string(&payload.tags)?,
        })
    }
}

impl MultipleChoiceStore for Db {
    async fn create_multiple_choice(&self, payload: &MultipleChoiceQuestion) -> Result<SavedRecord> {
        let encoded = Encoded::new(payload)?;
        let row: MultipleChoiceRow = self
            .query_one(
                r#"
                INSERT INTO multiple_choice_questions
                    (test_id, question_text, options, correct_answers, explanation, difficulty, tags, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.question_text.as_str(),
                    encoded.options,
                    encoded.correct_answers,
                    encoded.explanation,
                    payload.difficulty.as_str(),
                    encoded.tags,
                    payload.status.as_str(),
                ],
            )
            .await?;

        tracing::info!(
            "multiple-choice question created with id: {} for test: {}",
            row.id,
            payload.test_id
        );
        row.into_saved()
    }

    async fn update_multiple_choice(
        &self,
        id: RecordId,
        payload: &MultipleChoiceQuestion,
    ) -> Result<SavedRecord> {
        let encoded = Encoded::new(payload)?;
        let row: MultipleChoiceRow = self
            .query_optional(
                r#"
                UPDATE multiple_choice_questions
                SET test_id = ?1, question_text = ?2, options = ?3, correct_answers = ?4,
                    explanation = ?5, difficulty = ?6, tags = ?7, status = ?8
                WHERE id = ?9
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.question_text.as_str(),
                    encoded.options,
                    encoded.correct_answers,
                    encoded.explanation,
                    payload.difficulty.as_str(),
                    encoded.tags,
                    payload.status.as_str(),
                    id,
                ],
            )
            .await?
            .ok_or_eyre("multiple-choice question not found")?;

        tracing::info!("multiple-choice question updated with id: {id}");
        row.into_saved()
    }
}
