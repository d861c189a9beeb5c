//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Payloads are
//! rejected here before any database write; failures carry the offending
//! field in the error details. SQLite TEXT has no built-in length
//! enforcement, so the schema CHECKs mirror these limits as a backstop.

use shared::AppError;
use shared::models::{CategoryCreate, CategoryUpdate, ExecutionCreate, PromptCreate, PromptUpdate};

// ── Text length limits ──────────────────────────────────────────────

/// Prompt titles
pub const MAX_TITLE_LEN: usize = 255;

/// Prompt descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Prompt body text
pub const MAX_CONTENT_LEN: usize = 10_000;

/// Tags per prompt
pub const MAX_TAGS: usize = 10;

/// Single tag name
pub const MAX_TAG_LEN: usize = 50;

/// Entity names: category names, model identifiers
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: color codes, icon names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::validation(format!("{field} must not be empty")).with_detail("field", field)
        );
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if tags.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "At most {MAX_TAGS} tags are allowed ({} given)",
            tags.len()
        ))
        .with_detail("field", "tags"));
    }
    for tag in tags {
        if tag.trim().len() > MAX_TAG_LEN {
            return Err(AppError::validation(format!(
                "Tag '{}' is too long (max {MAX_TAG_LEN} chars)",
                tag.trim()
            ))
            .with_detail("field", "tags"));
        }
    }
    Ok(())
}

// ── Payload validation ──────────────────────────────────────────────

pub fn validate_prompt_create(data: &PromptCreate) -> Result<(), AppError> {
    validate_required_text(&data.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&data.content, "content", MAX_CONTENT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.target_ai_model, "target_ai_model", MAX_NAME_LEN)?;
    validate_tags(&data.tags)?;
    Ok(())
}

pub fn validate_prompt_update(data: &PromptUpdate) -> Result<(), AppError> {
    if let Some(ref title) = data.title {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
    }
    if let Some(ref content) = data.content {
        validate_required_text(content, "content", MAX_CONTENT_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.target_ai_model, "target_ai_model", MAX_NAME_LEN)?;
    if let Some(ref tags) = data.tags {
        validate_tags(tags)?;
    }
    Ok(())
}

pub fn validate_category_create(data: &CategoryCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

pub fn validate_category_update(data: &CategoryUpdate) -> Result<(), AppError> {
    if let Some(ref name) = data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

pub fn validate_execution_create(data: &ExecutionCreate) -> Result<(), AppError> {
    validate_required_text(&data.ai_model_used, "ai_model_used", MAX_NAME_LEN)?;
    if let Some(rating) = data.response_quality_rating
        && !(1..=5).contains(&rating)
    {
        return Err(AppError::with_message(
            shared::ErrorCode::RatingOutOfRange,
            format!("Quality rating must be between 1 and 5 ({rating} given)"),
        )
        .with_detail("field", "response_quality_rating"));
    }
    if let Some(ms) = data.execution_time_ms
        && ms < 0
    {
        return Err(AppError::validation("execution_time_ms must not be negative")
            .with_detail("field", "execution_time_ms"));
    }
    if let Some(tokens) = data.tokens_used
        && tokens < 0
    {
        return Err(AppError::validation("tokens_used must not be negative")
            .with_detail("field", "tokens_used"));
    }
    if let Some(cost) = data.cost_estimate
        && cost < 0.0
    {
        return Err(AppError::validation("cost_estimate must not be negative")
            .with_detail("field", "cost_estimate"));
    }
    Ok(())
}
