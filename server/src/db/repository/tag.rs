//! Tag Repository
//!
//! Tags are created on first use and shared across prompts; they are never
//! deleted through the API. Names are lower-cased before they touch the DB.

use super::RepoResult;
use shared::models::Tag;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Lower-case, trim, and deduplicate a tag list, dropping empties.
/// Input order is preserved for the first occurrence of each name.
pub fn normalize(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tag WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(tag)
}

/// Tag names for one prompt, alphabetical
pub async fn find_names_for_prompt(pool: &SqlitePool, prompt_id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT t.name FROM prompt_tag pt JOIN tag t ON pt.tag_id = t.id WHERE pt.prompt_id = ? ORDER BY t.name",
    )
    .bind(prompt_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Upsert a tag by (already normalized) name inside a transaction, returning its id
pub async fn upsert_by_name(tx: &mut Transaction<'_, Sqlite>, name: &str) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO tag (id, name) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING")
        .bind(id)
        .bind(name)
        .execute(&mut **tx)
        .await?;

    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM tag WHERE name = ?")
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
    Ok(id)
}

/// Associate tags with a prompt; duplicate associations are ignored
pub async fn attach_to_prompt(
    tx: &mut Transaction<'_, Sqlite>,
    prompt_id: i64,
    tags: &[String],
) -> RepoResult<()> {
    for name in tags {
        let tag_id = upsert_by_name(tx, name).await?;
        sqlx::query("INSERT OR IGNORE INTO prompt_tag (prompt_id, tag_id) VALUES (?1, ?2)")
            .bind(prompt_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Replace the whole tag set of a prompt (all-or-nothing within the caller's tx)
pub async fn replace_for_prompt(
    tx: &mut Transaction<'_, Sqlite>,
    prompt_id: i64,
    tags: &[String],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM prompt_tag WHERE prompt_id = ?")
        .bind(prompt_id)
        .execute(&mut **tx)
        .await?;
    attach_to_prompt(tx, prompt_id, tags).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_dedupes() {
        let input = vec![
            "Rust".to_string(),
            "rust".to_string(),
            "  SQL  ".to_string(),
            "".to_string(),
            "sql".to_string(),
        ];
        assert_eq!(normalize(&input), vec!["rust".to_string(), "sql".to_string()]);
    }

    #[test]
    fn normalize_preserves_first_occurrence_order() {
        let input = vec!["zeta".to_string(), "alpha".to_string(), "ZETA".to_string()];
        assert_eq!(
            normalize(&input),
            vec!["zeta".to_string(), "alpha".to_string()]
        );
    }

    #[test]
    fn normalize_empty_input() {
        assert!(normalize(&[]).is_empty());
    }
}
