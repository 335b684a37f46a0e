use std::{collections::HashMap, sync::RwLock};

use rusqlite::Connection;

use crate::db;

/// In-memory copy of every user's selected slot.
#[derive(Debug, Default)]
pub(crate) struct SelectionCache {
    selected: RwLock<HashMap<i64, i64>>,
}

impl SelectionCache {
    /// Reloads the whole cache from the settings table.
    pub(crate) fn refresh(&self, conn: &Connection) -> db::Result<()> {
        let selected = db::all_selected(conn)?
            .into_iter()
            .collect::<HashMap<_, _>>();
        log::debug!("Refreshed selection cache with {} users", selected.len());

        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = selected;
        Ok(())
    }

    pub(crate) fn get(&self, user_id: i64) -> Option<i64> {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user_id)
            .copied()
    }

    /// The user's selected slot, going to the database on a miss.
    pub(crate) fn selected(&self, conn: &Connection, user_id: i64) -> db::Result<i64> {
        match self.get(user_id) {
            Some(pointer) => Ok(pointer),
            None => db::get_selected(conn, user_id),
        }
    }
}
