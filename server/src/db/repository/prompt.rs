//! Prompt Repository
//!
//! Owner-scoped listing with a typed filter builder, joined detail reads,
//! and transactional create/update so a prompt and its tag associations are
//! never observable in a half-written state.

use super::{RepoError, RepoResult, tag};
use shared::error::ErrorCode;
use shared::models::{Prompt, PromptCreate, PromptUpdate, PromptWithMeta, Visibility};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Columns shared by every joined prompt read: the prompt row, category
/// name/color, and the prompt's tag names aggregated alphabetically.
const PROMPT_WITH_META_SELECT: &str = "SELECT p.id, p.user_id, p.title, p.description, p.content, p.category_id, p.visibility, p.is_template, p.template_variables, p.target_ai_model, p.model_parameters, p.usage_count, p.version, p.created_at, p.updated_at, c.name AS category_name, c.color AS category_color, (SELECT GROUP_CONCAT(name, ',') FROM (SELECT t.name FROM prompt_tag pt JOIN tag t ON pt.tag_id = t.id WHERE pt.prompt_id = p.id ORDER BY t.name)) AS tag_csv FROM prompt p LEFT JOIN category c ON p.category_id = c.id";

/// Joined row shape; converted to [`PromptWithMeta`] for the API
#[derive(Debug, sqlx::FromRow)]
struct PromptRow {
    id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    content: String,
    category_id: Option<i64>,
    visibility: Visibility,
    is_template: bool,
    #[sqlx(json)]
    template_variables: serde_json::Map<String, serde_json::Value>,
    target_ai_model: Option<String>,
    #[sqlx(json)]
    model_parameters: serde_json::Map<String, serde_json::Value>,
    usage_count: i64,
    version: i64,
    created_at: i64,
    updated_at: i64,
    category_name: Option<String>,
    category_color: Option<String>,
    tag_csv: Option<String>,
}

impl From<PromptRow> for PromptWithMeta {
    fn from(row: PromptRow) -> Self {
        let tags = row
            .tag_csv
            .map(|csv| csv.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        Self {
            prompt: Prompt {
                id: row.id,
                user_id: row.user_id,
                title: row.title,
                description: row.description,
                content: row.content,
                category_id: row.category_id,
                visibility: row.visibility,
                is_template: row.is_template,
                template_variables: row.template_variables,
                target_ai_model: row.target_ai_model,
                model_parameters: row.model_parameters,
                usage_count: row.usage_count,
                version: row.version,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            category_name: row.category_name,
            category_color: row.category_color,
            tags,
        }
    }
}

/// Typed predicate accumulator for the prompt listing.
///
/// Always restricts to the owning user; each optional filter is appended
/// conjunctively with its own bind parameter. User input never reaches the
/// SQL text itself.
#[derive(Debug, Clone)]
pub struct PromptFilter {
    pub owner_id: i64,
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub visibility: Option<Visibility>,
}

impl PromptFilter {
    pub fn owned_by(owner_id: i64) -> Self {
        Self {
            owner_id,
            category_id: None,
            search: None,
            visibility: None,
        }
    }

    /// Append `WHERE ...` with one bind per predicate
    fn push_predicates(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE p.user_id = ").push_bind(self.owner_id);

        if let Some(category_id) = self.category_id {
            qb.push(" AND p.category_id = ").push_bind(category_id);
        }

        if let Some(ref search) = self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (LOWER(p.title) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(p.description) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(p.content) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(visibility) = self.visibility {
            qb.push(" AND p.visibility = ").push_bind(visibility.as_str());
        }
    }
}

/// One page of the owner's prompts, most recently updated first
pub async fn find_page(
    pool: &SqlitePool,
    filter: &PromptFilter,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PromptWithMeta>> {
    let mut qb = QueryBuilder::<Sqlite>::new(PROMPT_WITH_META_SELECT);
    filter.push_predicates(&mut qb);
    qb.push(" ORDER BY p.updated_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows: Vec<PromptRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Total row count for the same filter (for pagination)
pub async fn count(pool: &SqlitePool, filter: &PromptFilter) -> RepoResult<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM prompt p");
    filter.push_predicates(&mut qb);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(total)
}

pub async fn find_with_meta(pool: &SqlitePool, id: i64) -> RepoResult<Option<PromptWithMeta>> {
    let sql = format!("{} WHERE p.id = ?", PROMPT_WITH_META_SELECT);
    let row = sqlx::query_as::<_, PromptRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

fn json_object_text(map: &Option<serde_json::Map<String, serde_json::Value>>) -> String {
    map.as_ref()
        .map(|m| serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string()))
        .unwrap_or_else(|| "{}".to_string())
}

/// Create a prompt and its tag associations in one transaction.
///
/// `tags` must already be normalized (see [`tag::normalize`]). Any failure,
/// including a failing tag insert, rolls the whole write back.
pub async fn create(
    pool: &SqlitePool,
    owner_id: i64,
    data: &PromptCreate,
    tags: &[String],
) -> RepoResult<PromptWithMeta> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let template_variables = json_object_text(&data.template_variables);
    let model_parameters = json_object_text(&data.model_parameters);

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO prompt (id, user_id, title, description, content, category_id, visibility, is_template, template_variables, target_ai_model, model_parameters, usage_count, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, 1, ?12, ?12)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.content)
    .bind(data.category_id)
    .bind(data.visibility.unwrap_or_default().as_str())
    .bind(data.is_template.unwrap_or(false))
    .bind(&template_variables)
    .bind(&data.target_ai_model)
    .bind(&model_parameters)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tag::attach_to_prompt(&mut tx, id, tags).await?;

    tx.commit().await?;

    find_with_meta(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create prompt".into()))
}

/// Partial update; supplied fields overwrite, omitted fields keep prior
/// values. A supplied tag set replaces the existing associations inside the
/// same transaction. The version counter increments on every success.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    data: &PromptUpdate,
    tags: Option<&[String]>,
) -> RepoResult<PromptWithMeta> {
    let now = shared::util::now_millis();
    let template_variables = data
        .template_variables
        .as_ref()
        .map(|m| serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string()));
    let model_parameters = data
        .model_parameters
        .as_ref()
        .map(|m| serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string()));

    let mut tx = pool.begin().await?;

    let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM prompt WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(owner) = owner else {
        return Err(RepoError::NotFound(format!("Prompt {id} not found")));
    };
    if owner != owner_id {
        return Err(RepoError::Business(
            ErrorCode::NotResourceOwner,
            "Only the owner can modify a prompt".into(),
        ));
    }

    sqlx::query(
        "UPDATE prompt SET title = COALESCE(?1, title), description = COALESCE(?2, description), content = COALESCE(?3, content), category_id = COALESCE(?4, category_id), visibility = COALESCE(?5, visibility), is_template = COALESCE(?6, is_template), template_variables = COALESCE(?7, template_variables), target_ai_model = COALESCE(?8, target_ai_model), model_parameters = COALESCE(?9, model_parameters), version = version + 1, updated_at = ?10 WHERE id = ?11",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.content)
    .bind(data.category_id)
    .bind(data.visibility.map(|v| v.as_str()))
    .bind(data.is_template)
    .bind(&template_variables)
    .bind(&data.target_ai_model)
    .bind(&model_parameters)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(tags) = tags {
        tag::replace_for_prompt(&mut tx, id, tags).await?;
    }

    tx.commit().await?;

    find_with_meta(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Prompt {id} not found")))
}

/// Hard delete; tag associations and executions cascade via foreign keys
pub async fn delete(pool: &SqlitePool, id: i64, owner_id: i64) -> RepoResult<bool> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM prompt WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(owner) = owner else {
        return Err(RepoError::NotFound(format!("Prompt {id} not found")));
    };
    if owner != owner_id {
        return Err(RepoError::Business(
            ErrorCode::NotResourceOwner,
            "Only the owner can delete a prompt".into(),
        ));
    }

    sqlx::query("DELETE FROM prompt WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_always_scopes_to_owner() {
        let filter = PromptFilter::owned_by(42);
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM prompt p");
        filter.push_predicates(&mut qb);
        let sql = qb.sql();
        assert!(sql.contains("WHERE p.user_id = "));
        assert!(!sql.contains("category_id"));
        assert!(!sql.contains("LIKE"));
        assert!(!sql.contains("visibility"));
    }

    #[test]
    fn filter_appends_each_supplied_predicate() {
        let filter = PromptFilter {
            owner_id: 1,
            category_id: Some(7),
            search: Some("sql injection'; --".to_string()),
            visibility: Some(Visibility::Public),
        };
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM prompt p");
        filter.push_predicates(&mut qb);
        let sql = qb.sql();
        assert!(sql.contains("p.category_id = "));
        assert!(sql.contains("LOWER(p.title) LIKE "));
        assert!(sql.contains("LOWER(p.description) LIKE "));
        assert!(sql.contains("LOWER(p.content) LIKE "));
        assert!(sql.contains("p.visibility = "));
        // User input goes through binds, never into the SQL text
        assert!(!sql.contains("injection"));
    }
}
