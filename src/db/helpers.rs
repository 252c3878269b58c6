use color_eyre::{eyre::OptionExt, Result};
use libsql::params::IntoParams;
use serde::de::DeserializeOwned;

use super::Db;

impl Db {
    /// Runs `sql` and deserializes every row into `T`.
    pub(super) async fn query_all<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<Vec<T>> {
        let conn = self.conn()?;
        let mut rows = conn.query(sql, params).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(libsql::de::from_row::<T>(&row)?);
        }
        Ok(results)
    }

    /// Runs `sql` and deserializes its first row. No row is an error.
    pub(super) async fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<T> {
        self.query_optional(sql, params)
            .await?
            .ok_or_eyre("expected a row but got none")
    }

    /// Runs `sql` and deserializes its first row, if any.
    pub(super) async fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<Option<T>> {
        let conn = self.conn()?;
        let mut rows = conn.query(sql, params).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(libsql::de::from_row::<T>(&row)?)),
            None => Ok(None),
        }
    }

    /// Runs a statement and returns the number of affected rows.
    pub(super) async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64> {
        let conn = self.conn()?;
        Ok(conn.execute(sql, params).await?)
    }
}
