use color_eyre::{eyre::OptionExt, Result};

use super::{
    models::{StoredRow, VocabularyRow},
    Db,
};
use crate::{
    authoring::VocabularyStore,
    models::{RecordId, SavedRecord, VocabularyEntry},
};

fn word_class(payload: &VocabularyEntry) -> libsql::Value {
    match &payload.word_class {
        Some(word_class) => libsql::Value::Text(word_class.clone()),
        None => libsql::Value::Null,
    }
}

impl VocabularyStore for Db {
    async fn create_vocabulary(&self, payload: &VocabularyEntry) -> Result<SavedRecord> {
        let row: VocabularyRow = self
            .query_one(
                r#"
                INSERT INTO vocabulary_entries
                    (test_id, word, meaning, example_sentence, word_class, difficulty)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.word.as_str(),
                    payload.meaning.as_str(),
                    payload.example_sentence.as_str(),
                    word_class(payload),
                    payload.difficulty.as_str(),
                ],
            )
            .await?;

        tracing::info!(
            "vocabulary entry created with id: {} for test: {}",
            row.id,
            payload.test_id
        );
        row.into_saved()
    }

    async fn update_vocabulary(&self, id: RecordId, payload: &VocabularyEntry) -> Result<SavedRecord> {
        let row: VocabularyRow = self
            .query_optional(
                r#"
                UPDATE vocabulary_entries
                SET test_id = ?1, word = ?2, meaning = ?3, example_sentence = ?4,
                    word_class = ?5, difficulty = ?6
                WHERE id = ?7
                RETURNING *
                "#,
                libsql::params![
                    payload.test_id.as_str(),
                    payload.word.as_str(),
                    payload.meaning.as_str(),
                    payload.example_sentence.as_str(),
                    word_class(payload),
                    payload.difficulty.as_str(),
                    id,
                ],
            )
            .await?
            .ok_or_eyre("vocabulary entry not found")?;

        tracing::info!("vocabulary entry updated with id: {id}");
        row.into_saved()
    }
}
