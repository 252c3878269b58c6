use color_eyre::{
    eyre::{bail, OptionExt},
    Result,
};

use super::{
    models::{GrammarRow, StoredRow},
    Db,
};
use crate::{
    authoring::GrammarStore,
    models::{GrammarQuestion, RecordId, SavedRecord},
};

impl Db {
    async fn authorize_grammar_write(&self, bearer: &str) -> Result<()> {
        if !self.admin_session_exists(bearer).await? {
            bail!("grammar write rejected: unknown bearer credential");
        }
        Ok(())
    }
}

impl GrammarStore for Db {
    async fn create_grammar(&self, payload: &GrammarQuestion, bearer: &str) -> Result<SavedRecord> {
        self.authorize_grammar_write(bearer).await?;

        let alternative_answers = serde_json::to_string(&payload.alternative_answers)?;
        let row: GrammarRow = self
            .query_one(
                r#"
                INSERT INTO grammar_questions
                    (test_id, question_text, correct_answer, alternative_answers, explanation, difficulty, points)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.question_text.as_str(),
                    payload.correct_answer.as_str(),
                    alternative_answers,
                    payload.explanation.as_str(),
                    payload.difficulty.as_str(),
                    i64::from(payload.points),
                ],
            )
            .await?;

        tracing::info!(
            "grammar question created with id: {} for test: {}",
            row.id,
            payload.test_id
        );
        row.into_saved()
    }

    async fn update_grammar(
        &self,
        id: RecordId,
        payload: &GrammarQuestion,
        bearer: &str,
    ) -> Result<SavedRecord> {
        self.authorize_grammar_write(bearer).await?;

        let alternative_answers = serde_json::to_string(&payload.alternative_answers)?;
        let row: GrammarRow = self
            .query_optional(
                r#"
                UPDATE grammar_questions
                SET test_id = ?1, question_text = ?2, correct_answer = ?3, alternative_answers = ?4,
                    explanation = ?5, difficulty = ?6, points = ?7
                WHERE id = ?8
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.question_text.as_str(),
                    payload.correct_answer.as_str(),
                    alternative_answers,
                    payload.explanation.as_str(),
                    payload.difficulty.as_str(),
                    i64::from(payload.points),
                    id,
                ],
            )
            .await?
            .ok_or_eyre("grammar question not found")?;

        tracing::info!("grammar question updated with id: {id}");
        row.into_saved()
    }
}
