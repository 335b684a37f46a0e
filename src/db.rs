use std::fmt::Display;

use rusqlite::{named_params, Connection, OptionalExtension};

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) enum Error {
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Sqlite(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Sqlite(e) => write!(f, "Database error: {}", e),
            Error::Json(e) => write!(f, "Malformed pokémon record: {}", e),
        }
    }
}

impl std::error::Error for Error {}

/// A stored pokémon row: the raw JSON record and the message id that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PokemonRow {
    pub json: String,
    pub message_id: i64,
}

// Rows come back in insertion order, which is what slot numbers are built on.
pub(crate) fn select_pokemon(conn: &Connection, user_id: i64) -> Result<Vec<PokemonRow>> {
    let mut stmt = conn.prepare(
        "SELECT pokemon, message_id FROM users WHERE users.user_id = :user_id ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map(named_params! { ":user_id": user_id }, |row| {
            Ok(PokemonRow {
                json: row.get(0)?,
                message_id: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub(crate) fn insert_pokemon(
    conn: &Connection,
    user_id: i64,
    message_id: i64,
    json: &str,
) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO users (user_id, message_id, pokemon) VALUES (:user_id, :message_id, :pokemon)",
    )?;
    stmt.execute(named_params! {
        ":user_id": user_id,
        ":message_id": message_id,
        ":pokemon": json,
    })?;
    Ok(())
}

pub(crate) fn update_pokemon(
    conn: &Connection,
    user_id: i64,
    message_id: i64,
    json: &str,
) -> Result<()> {
    let query = "UPDATE users SET pokemon = :pokemon
        WHERE users.user_id = :user_id AND users.message_id = :message_id";
    conn.execute(
        query,
        named_params! {
            ":user_id": user_id,
            ":message_id": message_id,
            ":pokemon": json,
        },
    )?;
    Ok(())
}

pub(crate) fn delete_pokemon(conn: &Connection, message_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM users WHERE users.message_id = :message_id",
        named_params! { ":message_id": message_id },
    )?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn count_pokemon(conn: &Connection, user_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE users.user_id = :user_id",
        named_params! { ":user_id": user_id },
        |row| row.get(0),
    )?;
    Ok(count)
}

// Users without a settings row have their first pokémon selected.
pub(crate) fn get_selected(conn: &Connection, user_id: i64) -> Result<i64> {
    let selected = conn
        .query_row(
            "SELECT pokeid FROM user_settings WHERE user_settings.user_id = :user_id",
            named_params! { ":user_id": user_id },
            |row| row.get(0),
        )
        .optional()?;
    Ok(selected.unwrap_or(1))
}

pub(crate) fn set_selected(conn: &Connection, user_id: i64, pokeid: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO user_settings (user_id, pokeid) VALUES (:user_id, :pokeid)
        ON CONFLICT(user_id) DO UPDATE SET pokeid = excluded.pokeid",
        named_params! {
            ":user_id": user_id,
            ":pokeid": pokeid,
        },
    )?;
    Ok(())
}

pub(crate) fn all_selected(conn: &Connection) -> Result<Vec<(i64, i64)>> {
    let mut stmt = conn.prepare("SELECT user_id, pokeid FROM user_settings")?;
    let selected = stmt
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(selected)
}

pub(crate) fn has_starter(conn: &Connection, user_id: i64) -> Result<bool> {
    let has_starter = conn
        .query_row(
            "SELECT has_starter FROM user_settings WHERE user_settings.user_id = :user_id",
            named_params! { ":user_id": user_id },
            |row| row.get(0),
        )
        .optional()?;
    Ok(has_starter.unwrap_or(false))
}

pub(crate) fn set_starter(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO user_settings (user_id, has_starter) VALUES (:user_id, 1)
        ON CONFLICT(user_id) DO UPDATE SET has_starter = 1",
        named_params! { ":user_id": user_id },
    )?;
    Ok(())
}

pub(crate) fn setup(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER NOT NULL,
        message_id INTEGER NOT NULL UNIQUE,
        pokemon TEXT NOT NULL
    )",
        (),
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
        user_id INTEGER PRIMARY KEY,
        pokeid INTEGER NOT NULL DEFAULT 1,
        has_starter INTEGER NOT NULL DEFAULT 0
    )",
        (),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        setup(&conn).expect("schema");
        conn
    }

    #[test]
    fn rows_keep_insertion_order() -> Result<()> {
        let conn = conn();
        insert_pokemon(&conn, 1, 30, r#"{"name":"C"}"#)?;
        insert_pokemon(&conn, 1, 10, r#"{"name":"A"}"#)?;
        insert_pokemon(&conn, 2, 20, r#"{"name":"B"}"#)?;

        let rows = select_pokemon(&conn, 1)?;
        assert_eq!(
            vec![30, 10],
            rows.iter().map(|r| r.message_id).collect::<Vec<_>>()
        );
        assert_eq!(1, count_pokemon(&conn, 2)?);
        Ok(())
    }

    #[test]
    fn update_is_scoped_to_owner() -> Result<()> {
        let conn = conn();
        insert_pokemon(&conn, 1, 10, r#"{"name":"A"}"#)?;

        update_pokemon(&conn, 2, 10, r#"{"name":"Hijacked"}"#)?;
        assert_eq!(r#"{"name":"A"}"#, select_pokemon(&conn, 1)?[0].json);

        update_pokemon(&conn, 1, 10, r#"{"name":"B"}"#)?;
        assert_eq!(r#"{"name":"B"}"#, select_pokemon(&conn, 1)?[0].json);
        Ok(())
    }

    #[test]
    fn delete_removes_single_row() -> Result<()> {
        let conn = conn();
        insert_pokemon(&conn, 1, 10, "{}")?;
        insert_pokemon(&conn, 1, 11, "{}")?;

        delete_pokemon(&conn, 10)?;
        assert_eq!(1, count_pokemon(&conn, 1)?);
        assert_eq!(11, select_pokemon(&conn, 1)?[0].message_id);
        Ok(())
    }

    #[test]
    fn settings_defaults() -> Result<()> {
        let conn = conn();
        assert_eq!(1, get_selected(&conn, 5)?);
        assert!(!has_starter(&conn, 5)?);

        set_selected(&conn, 5, 3)?;
        assert!(!has_starter(&conn, 5)?);
        set_starter(&conn, 5)?;
        assert!(has_starter(&conn, 5)?);
        assert_eq!(3, get_selected(&conn, 5)?);
        assert_eq!(vec![(5, 3)], all_selected(&conn)?);
        Ok(())
    }
}
