//! SQLite-backed Pokemon catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::query::{Identifier, ListQuery, SearchFilter};
use super::{
    CatalogError, CatalogStore, Navigation, NavigationEntry, PokemonData, PokemonPage,
    PokemonRecord, PokemonSummary, UpsertOutcome,
};

const RECORD_COLUMNS: &str = "number, name, image, types, weight, height, description, color, \
     base_stats, moves, created_at, updated_at";

/// SQLite-backed Pokemon catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS pokemon (
                number INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                image TEXT,
                types TEXT NOT NULL DEFAULT '[]',
                weight INTEGER NOT NULL DEFAULT 0,
                height INTEGER NOT NULL DEFAULT 0,
                description TEXT,
                color TEXT,
                base_stats TEXT NOT NULL,
                moves TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Names are unique regardless of case
            CREATE UNIQUE INDEX IF NOT EXISTS idx_pokemon_name ON pokemon(name COLLATE NOCASE);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog connection lock poisoned".to_string()))
    }

    /// Build the WHERE clause and its parameters for a search filter.
    fn filter_clause(filter: &SearchFilter) -> (String, Vec<Value>) {
        match filter {
            SearchFilter::All => (String::new(), Vec::new()),
            SearchFilter::ExactNumber(n) => {
                ("WHERE number = ?".to_string(), vec![Value::Integer(*n as i64)])
            }
            SearchFilter::NumberContains(digits) => (
                r"WHERE CAST(number AS TEXT) LIKE ? ESCAPE '\'".to_string(),
                vec![Value::Text(format!("%{}%", escape_like(digits)))],
            ),
            // LIKE is case-insensitive for ASCII; the term is already lowercase
            SearchFilter::NameContains(term) => (
                r"WHERE LOWER(name) LIKE ? ESCAPE '\'".to_string(),
                vec![Value::Text(format!("%{}%", escape_like(term)))],
            ),
            SearchFilter::NoMatch => ("WHERE 0".to_string(), Vec::new()),
        }
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<PokemonRecord> {
        let types: String = row.get(3)?;
        let base_stats: String = row.get(8)?;
        let moves: String = row.get(9)?;
        let created_at_str: String = row.get(10)?;
        let updated_at_str: String = row.get(11)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(PokemonRecord {
            data: PokemonData {
                number: row.get(0)?,
                name: row.get(1)?,
                image: row.get(2)?,
                types: decode_json(3, &types)?,
                weight: row.get(4)?,
                height: row.get(5)?,
                description: row.get(6)?,
                color: row.get(7)?,
                base_stats: decode_json(8, &base_stats)?,
                moves: decode_json(9, &moves)?,
            },
            created_at,
            updated_at,
        })
    }

    fn neighbor(
        conn: &Connection,
        sql: &str,
        number: u32,
    ) -> Result<Option<NavigationEntry>, CatalogError> {
        conn.query_row(sql, params![number], |row| {
            Ok(NavigationEntry {
                number: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()
        .map_err(|e| CatalogError::Database(e.to_string()))
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, CatalogError> {
    serde_json::to_string(value).map_err(|e| CatalogError::Serialization(e.to_string()))
}

fn decode_json<T: serde::de::DeserializeOwned>(column: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl CatalogStore for SqliteCatalog {
    fn upsert(&self, pokemon: &PokemonData) -> Result<UpsertOutcome, CatalogError> {
        let types = encode_json(&pokemon.types)?;
        let base_stats = encode_json(&pokemon.base_stats)?;
        let moves = encode_json(&pokemon.moves)?;
        let now_str = Utc::now().to_rfc3339();

        let conn = self.lock()?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM pokemon WHERE number = ?",
                params![pokemon.number],
                |_| Ok(true),
            )
            .optional()
            .map_err(|e| CatalogError::Database(e.to_string()))?
            .unwrap_or(false);

        conn.execute(
            "INSERT INTO pokemon (number, name, image, types, weight, height, description, color,
                                  base_stats, moves, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(number) DO UPDATE SET
                name = excluded.name,
                image = excluded.image,
                types = excluded.types,
                weight = excluded.weight,
                height = excluded.height,
                description = excluded.description,
                color = excluded.color,
                base_stats = excluded.base_stats,
                moves = excluded.moves,
                updated_at = excluded.updated_at",
            params![
                pokemon.number,
                &pokemon.name,
                &pokemon.image,
                &types,
                pokemon.weight,
                pokemon.height,
                &pokemon.description,
                &pokemon.color,
                &base_stats,
                &moves,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(if exists {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        })
    }

    fn list(&self, query: &ListQuery) -> Result<PokemonPage, CatalogError> {
        let (where_clause, mut values) = Self::filter_clause(&query.filter);
        let conn = self.lock()?;

        let total_count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM pokemon {}", where_clause),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        // Column and direction come from closed enums, never from user input
        let sql = format!(
            "SELECT name, number, image FROM pokemon {} ORDER BY {} {} LIMIT ? OFFSET ?",
            where_clause,
            query.sort.column(),
            query.order.keyword(),
        );
        values.push(Value::Integer(query.limit as i64));
        values.push(Value::Integer(query.offset as i64));

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(PokemonSummary {
                    name: row.get(0)?,
                    number: row.get(1)?,
                    image: row.get(2)?,
                })
            })
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }

        Ok(PokemonPage {
            items,
            total_count: total_count.max(0) as u64,
        })
    }

    fn get(&self, id: &Identifier) -> Result<PokemonRecord, CatalogError> {
        let conn = self.lock()?;

        let result = match id {
            Identifier::Number(n) => conn.query_row(
                &format!("SELECT {} FROM pokemon WHERE number = ?", RECORD_COLUMNS),
                params![n],
                Self::row_to_record,
            ),
            Identifier::Name(name) => conn.query_row(
                &format!(
                    "SELECT {} FROM pokemon WHERE name = ? COLLATE NOCASE",
                    RECORD_COLUMNS
                ),
                params![name],
                Self::row_to_record,
            ),
        };

        result.map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(id.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    fn navigation(&self, number: u32) -> Result<Navigation, CatalogError> {
        let conn = self.lock()?;

        let prev = Self::neighbor(
            &conn,
            "SELECT number, name FROM pokemon WHERE number < ? ORDER BY number DESC LIMIT 1",
            number,
        )?;
        let next = Self::neighbor(
            &conn,
            "SELECT number, name FROM pokemon WHERE number > ? ORDER BY number ASC LIMIT 1",
            number,
        )?;

        Ok(Navigation { prev, next })
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pokemon", [], |row| row.get(0))
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(count.max(0) as u64)
    }

    fn ping(&self) -> Result<(), CatalogError> {
        let conn = self.lock()?;

        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
