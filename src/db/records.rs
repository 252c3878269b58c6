use color_eyre::{eyre::eyre, Result};

use super::{
    models::{GrammarRow, MultipleChoiceRow, StoredRow, VocabularyRow},
    Db,
};
use crate::{
    authoring::RecordSource,
    models::{Category, RawRecord, RecordId, SavedRecord},
};

impl Db {
    async fn fetch_row<T: StoredRow>(&self, id: RecordId) -> Result<T> {
        self.query_optional::<T>(
            &format!("SELECT * FROM {} WHERE id = ?1", T::TABLE),
            libsql::params![id],
        )
        .await?
        .ok_or_else(|| eyre!("no {} question with id {id}", T::CATEGORY))
    }

    async fn rows_for_test<T: StoredRow>(&self, test_id: &str) -> Result<Vec<SavedRecord>> {
        self.query_all::<T>(
            &format!("SELECT * FROM {} WHERE test_id = ?1 ORDER BY id", T::TABLE),
            libsql::params![test_id],
        )
        .await?
        .into_iter()
        .map(StoredRow::into_saved)
        .collect()
    }

    /// Saved records of `category` belonging to `test_id`, oldest first.
    pub async fn list_for_test(&self, category: Category, test_id: &str) -> Result<Vec<SavedRecord>> {
        match category {
            Category::MultipleChoice => self.rows_for_test::<MultipleChoiceRow>(test_id).await,
            Category::Vocabulary => self.rows_for_test::<VocabularyRow>(test_id).await,
            Category::Grammar => self.rows_for_test::<GrammarRow>(test_id).await,
        }
    }

    pub async fn get_saved(&self, category: Category, id: RecordId) -> Result<SavedRecord> {
        match category {
            Category::MultipleChoice => self.fetch_row::<MultipleChoiceRow>(id).await?.into_saved(),
            Category::Vocabulary => self.fetch_row::<VocabularyRow>(id).await?.into_saved(),
            Category::Grammar => self.fetch_row::<GrammarRow>(id).await?.into_saved(),
        }
    }
}

impl RecordSource for Db {
    async fn fetch_raw(&self, category: Category, id: RecordId) -> Result<RawRecord> {
        match category {
            Category::MultipleChoice => self.fetch_row::<MultipleChoiceRow>(id).await?.into_raw(),
            Category::Vocabulary => self.fetch_row::<VocabularyRow>(id).await?.into_raw(),
            Category::Grammar => self.fetch_row::<GrammarRow>(id).await?.into_raw(),
        }
    }
}
