// Database schema initialization
//
// List- and map-valued fields are stored as JSON text.

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS admin_sessions (
            id TEXT PRIMARY KEY
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS multiple_choice_questions (
            id INTEGER PRIMARY KEY,
            test_id TEXT NOT NULL,
            question_text TEXT NOT NULL,
            options TEXT NOT NULL DEFAULT '[]',
            correct_answers TEXT NOT NULL DEFAULT '[]',
            explanation TEXT NOT NULL DEFAULT '{}',
            difficulty TEXT NOT NULL DEFAULT 'medium',
            tags TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'active'
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS vocabulary_entries (
            id INTEGER PRIMARY KEY,
            test_id TEXT NOT NULL,
            word TEXT NOT NULL,
            meaning TEXT NOT NULL,
            example_sentence TEXT NOT NULL DEFAULT '',
            word_class TEXT,
            difficulty TEXT NOT NULL DEFAULT 'medium'
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS grammar_questions (
            id INTEGER PRIMARY KEY,
            test_id TEXT NOT NULL,
            question_text TEXT NOT NULL,
            correct_answer TEXT NOT NULL,
            alternative_answers TEXT NOT NULL DEFAULT '[]',
            explanation TEXT NOT NULL DEFAULT '',
            difficulty TEXT NOT NULL DEFAULT 'medium',
            points INTEGER NOT NULL DEFAULT 1
        )
        "#,
        (),
    )
    .await?;

    for table in [
        "multiple_choice_questions",
        "vocabulary_entries",
        "grammar_questions",
    ] {
        conn.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_{table}_test_id ON {table}(test_id)"),
            (),
        )
        .await?;
    }

    Ok(())
}
