use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::store::{DrugAlias, DrugStore, InteractionRow};
use super::StoreError;

/// SQLite-backed knowledge store for embedded deployments.
///
/// The schema is owned by the platform's sync tooling; this crate only
/// reads it. The insert helpers exist for fixtures and operational
/// backfills — the analysis core never calls them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating the schema if absent.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode=DELETE;
             PRAGMA foreign_keys=ON;

             CREATE TABLE IF NOT EXISTS drug_aliases (
                 alias           TEXT PRIMARY KEY COLLATE NOCASE,
                 canonical_name  TEXT NOT NULL,
                 canonical_code  TEXT
             );

             CREATE TABLE IF NOT EXISTS interaction_cache (
                 code_a          TEXT NOT NULL,
                 code_b          TEXT NOT NULL,
                 drug_a          TEXT NOT NULL,
                 drug_b          TEXT NOT NULL,
                 severity        TEXT NOT NULL,
                 mechanism       TEXT,
                 recommendation  TEXT,
                 evidence_level  TEXT,
                 citations       TEXT NOT NULL DEFAULT '[]',
                 PRIMARY KEY (code_a, code_b)
             );

             CREATE TABLE IF NOT EXISTS curated_interactions (
                 drug_a          TEXT NOT NULL COLLATE NOCASE,
                 drug_b          TEXT NOT NULL COLLATE NOCASE,
                 severity        TEXT NOT NULL,
                 mechanism       TEXT,
                 recommendation  TEXT,
                 evidence_level  TEXT,
                 citations       TEXT NOT NULL DEFAULT '[]',
                 PRIMARY KEY (drug_a, drug_b)
             );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))
    }

    /// Insert or replace a directory alias.
    pub fn insert_alias(
        &self,
        alias: &str,
        canonical_name: &str,
        canonical_code: Option<&str>,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO drug_aliases (alias, canonical_name, canonical_code)
             VALUES (?1, ?2, ?3)",
            params![alias, canonical_name.to_lowercase(), canonical_code],
        )?;
        Ok(())
    }

    /// Insert or replace a cache-tier row keyed by canonical code pair.
    pub fn insert_cached_interaction(
        &self,
        code_a: &str,
        code_b: &str,
        row: &InteractionRow,
    ) -> Result<(), StoreError> {
        let citations = serde_json::to_string(&row.citations)
            .map_err(|e| StoreError::MalformedRow(e.to_string()))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO interaction_cache
             (code_a, code_b, drug_a, drug_b, severity, mechanism, recommendation, evidence_level, citations)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                code_a,
                code_b,
                row.drug_a,
                row.drug_b,
                row.severity,
                row.mechanism,
                row.recommendation,
                row.evidence_level,
                citations,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a curated-tier row keyed by substance name pair.
    pub fn insert_curated_interaction(&self, row: &InteractionRow) -> Result<(), StoreError> {
        let citations = serde_json::to_string(&row.citations)
            .map_err(|e| StoreError::MalformedRow(e.to_string()))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO curated_interactions
             (drug_a, drug_b, severity, mechanism, recommendation, evidence_level, citations)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.drug_a,
                row.drug_b,
                row.severity,
                row.mechanism,
                row.recommendation,
                row.evidence_level,
                citations,
            ],
        )?;
        Ok(())
    }
}

fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<(InteractionRow, String)> {
    Ok((
        InteractionRow {
            drug_a: row.get("drug_a")?,
            drug_b: row.get("drug_b")?,
            severity: row.get("severity")?,
            mechanism: row.get("mechanism")?,
            recommendation: row.get("recommendation")?,
            evidence_level: row.get("evidence_level")?,
            citations: Vec::new(),
        },
        row.get("citations")?,
    ))
}

fn parse_citations(
    found: Option<(InteractionRow, String)>,
) -> Result<Option<InteractionRow>, StoreError> {
    match found {
        None => Ok(None),
        Some((mut row, citations_json)) => {
            row.citations = serde_json::from_str(&citations_json)
                .map_err(|e| StoreError::MalformedRow(format!("citations column: {e}")))?;
            Ok(Some(row))
        }
    }
}

#[async_trait]
impl DrugStore for SqliteStore {
    async fn lookup_alias(&self, name: &str) -> Result<Option<DrugAlias>, StoreError> {
        let conn = self.lock()?;
        let hit = conn
            .query_row(
                "SELECT canonical_name, canonical_code FROM drug_aliases WHERE alias = ?1",
                params![name.trim()],
                |row| {
                    Ok(DrugAlias {
                        canonical_name: row.get(0)?,
                        canonical_code: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(hit)
    }

    async fn lookup_interaction(
        &self,
        code_a: &str,
        code_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT drug_a, drug_b, severity, mechanism, recommendation, evidence_level, citations
                 FROM interaction_cache WHERE code_a = ?1 AND code_b = ?2",
                params![code_a, code_b],
                interaction_from_row,
            )
            .optional()?;
        parse_citations(found)
    }

    async fn lookup_interaction_by_name(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT drug_a, drug_b, severity, mechanism, recommendation, evidence_level, citations
                 FROM curated_interactions WHERE drug_a = ?1 AND drug_b = ?2",
                params![name_a, name_b],
                interaction_from_row,
            )
            .optional()?;
        parse_citations(found)
    }
}
