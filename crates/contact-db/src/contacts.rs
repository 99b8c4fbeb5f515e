// ============================================================================
// Contact Queries
// ============================================================================
//
// Every statement binds its inputs; untrusted input never reaches command
// text. Listings order newest first, with legacy NULL-timestamp rows last
// and id breaking ties.
//
// ============================================================================

use contact_types::{ContactMessage, NewContact};
use sqlx::MySqlPool;

/// Insert a validated contact and return its assigned id
pub async fn insert_contact(pool: &MySqlPool, contact: &NewContact) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO contacts (name, email, message)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.message)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id() as i64)
}

/// Fetch all contacts, newest first
pub async fn list_contacts(pool: &MySqlPool) -> Result<Vec<ContactMessage>, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        SELECT id, name, email, message, created_at
        FROM contacts
        ORDER BY created_at IS NULL, created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Fetch one contact by id
pub async fn get_contact(pool: &MySqlPool, id: i64) -> Result<Option<ContactMessage>, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        SELECT id, name, email, message, created_at
        FROM contacts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Case-insensitive substring search over name and email, newest first
pub async fn search_contacts(
    pool: &MySqlPool,
    term: &str,
) -> Result<Vec<ContactMessage>, sqlx::Error> {
    let pattern = format!("%{}%", term.to_lowercase());

    sqlx::query_as::<_, ContactMessage>(
        r#"
        SELECT id, name, email, message, created_at
        FROM contacts
        WHERE LOWER(name) LIKE ? OR LOWER(email) LIKE ?
        ORDER BY created_at IS NULL, created_at DESC, id DESC
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await
}

/// Overwrite name, email, and message of an existing contact
///
/// Returns false when no row matched; id and created_at are never touched.
pub async fn update_contact(
    pool: &MySqlPool,
    id: i64,
    contact: &NewContact,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE contacts
        SET name = ?, email = ?, message = ?
        WHERE id = ?
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.message)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a contact by id; returns false when no row matched
pub async fn delete_contact(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM contacts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
