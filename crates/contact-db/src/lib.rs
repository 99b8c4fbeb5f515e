//! # Contact Database
//!
//! Store layer for the contact service: connection lifecycle management
//! with retry/backoff, and the parameterized query set over the contacts
//! table.

mod contacts;
mod manager;

pub use contacts::{
    delete_contact, get_contact, insert_contact, list_contacts, search_contacts, update_contact,
};
pub use manager::{is_fatal_store_error, ConnectionManager};

/// Database connection pool type
pub type DbPool = sqlx::MySqlPool;

/// Embedded schema migrations, applied after every successful connect
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
