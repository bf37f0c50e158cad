//! Persistence/lookup collaborator seam.
//!
//! The analysis core consumes any store implementing [`DrugStore`]; it
//! never writes through it. Concrete stores: in-memory (tests, fixtures),
//! SQLite (embedded deployments), remote HTTP (platform knowledge
//! service), and disabled (bundled heuristics only).

pub mod disabled;
pub mod memory;
pub mod remote;
pub mod sqlite;
pub mod store;

pub use disabled::DisabledStore;
pub use memory::InMemoryStore;
pub use remote::RemoteStore;
pub use sqlite::SqliteStore;
pub use store::{DrugAlias, DrugStore, InteractionRow};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Malformed row: {0}")]
    MalformedRow(String),
}
