use rusqlite::Connection;

pub(crate) fn setup_schema_v0(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS predefined_questions (
                  question              TEXT NOT NULL,
                  answer                TEXT NOT NULL,
                  category              TEXT,
                  is_active             INTEGER NOT NULL DEFAULT 1
                  )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS index_active on predefined_questions (is_active);",
        (),
    )?;

    Ok(())
}
