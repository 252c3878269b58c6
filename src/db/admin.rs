use color_eyre::Result;
use serde::Deserialize;
use ulid::Ulid;

use super::Db;

#[derive(Deserialize)]
struct Exists {
    found: i64,
}

impl Db {
    /// Issues a bearer credential accepted by grammar writes.
    pub async fn create_admin_session(&self) -> Result<String> {
        let session = Ulid::new().to_string();

        self.execute(
            "INSERT INTO admin_sessions (id) VALUES (?1)",
            libsql::params![session.as_str()],
        )
        .await?;

        tracing::info!("new admin session created");
        Ok(session)
    }

    pub async fn admin_session_exists(&self, session: &str) -> Result<bool> {
        let exists: Exists = self
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM admin_sessions WHERE id = ?1) AS found",
                libsql::params![session],
            )
            .await?;

        tracing::debug!("admin session exists: {}", exists.found != 0);
        Ok(exists.found != 0)
    }
}
