// libSQL storage collaborators for the authoring engine

use std::sync::Arc;

use color_eyre::{
    eyre::{ensure, OptionExt},
    Result,
};

pub mod models;

mod admin;
mod grammar;
mod helpers;
mod multiple_choice;
mod records;
mod schema;
mod vocabulary;

/// Database handle. Implements every storage collaborator the authoring
/// engine talks to.
#[derive(Clone)]
pub struct Db {
    db: Arc<libsql::Database>,
}

impl Db {
    /// Opens `url` (`file:<path>` for a local database, anything else is a
    /// remote libSQL server) and creates missing tables.
    pub async fn new(url: String, auth_token: String) -> Result<Self> {
        let db = match url.strip_prefix("file:") {
            Some(path) => libsql::Builder::new_local(path).build().await?,
            None => libsql::Builder::new_remote(url, auth_token).build().await?,
        };

        let conn = db.connect()?;

        let one = conn
            .query("SELECT 1", ())
            .await?
            .next()
            .await?
            .ok_or_eyre("connection check failed")?
            .get::<i64>(0)?;
        ensure!(one == 1, "connection check returned {one}");

        schema::create_schema(&conn).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { db: Arc::new(db) })
    }

    fn conn(&self) -> Result<libsql::Connection> {
        Ok(self.db.connect()?)
    }
}
