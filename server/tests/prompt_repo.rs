//! Prompt repository behavior: tag normalization, partial updates,
//! ownership, filtering, and transactional rollback.

mod common;

use common::{seed_user, test_pool};
use prolibr_server::db::repository::prompt::PromptFilter;
use prolibr_server::db::repository::{RepoError, prompt, tag};
use shared::ErrorCode;
use shared::models::{PromptCreate, PromptUpdate, Visibility};

fn basic_create(title: &str) -> PromptCreate {
    PromptCreate {
        title: title.into(),
        content: format!("Content of {title}"),
        ..Default::default()
    }
}

#[tokio::test]
async fn created_prompt_has_deduped_lowercase_tags() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let mut data = basic_create("Tagged prompt");
    data.tags = vec![
        "Rust".into(),
        "rust".into(),
        " SQL ".into(),
        "Async".into(),
    ];
    let normalized = tag::normalize(&data.tags);
    let created = prompt::create(&pool, owner.id, &data, &normalized)
        .await
        .unwrap();

    let mut tags = created.tags.clone();
    tags.sort();
    assert_eq!(tags, vec!["async", "rust", "sql"]);
    assert_eq!(created.prompt.version, 1);
    assert_eq!(created.prompt.usage_count, 0);
}

#[tokio::test]
async fn reused_tag_names_share_one_tag_row() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    for title in ["First", "Second"] {
        let mut data = basic_create(title);
        data.tags = vec!["shared-tag".into()];
        let normalized = tag::normalize(&data.tags);
        prompt::create(&pool, owner.id, &data, &normalized)
            .await
            .unwrap();
    }

    let tag_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag WHERE name = 'shared-tag'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tag_count, 1);
}

#[tokio::test]
async fn update_keeps_omitted_fields_and_bumps_version() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let mut data = basic_create("Original title");
    data.description = Some("Original description".into());
    data.visibility = Some(Visibility::Shared);
    data.tags = vec!["keepme".into()];
    let normalized = tag::normalize(&data.tags);
    let created = prompt::create(&pool, owner.id, &data, &normalized)
        .await
        .unwrap();

    let update = PromptUpdate {
        title: Some("New title".into()),
        ..Default::default()
    };
    let updated = prompt::update(&pool, created.prompt.id, owner.id, &update, None)
        .await
        .unwrap();

    assert_eq!(updated.prompt.title, "New title");
    assert_eq!(
        updated.prompt.description.as_deref(),
        Some("Original description")
    );
    assert_eq!(updated.prompt.content, created.prompt.content);
    assert_eq!(updated.prompt.visibility, Visibility::Shared);
    assert_eq!(updated.tags, vec!["keepme"]);
    assert_eq!(updated.prompt.version, 2);
}

#[tokio::test]
async fn supplied_tags_replace_the_whole_set() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let mut data = basic_create("Retagged");
    data.tags = vec!["old-a".into(), "old-b".into()];
    let normalized = tag::normalize(&data.tags);
    let created = prompt::create(&pool, owner.id, &data, &normalized)
        .await
        .unwrap();

    let new_tags = vec!["fresh".to_string()];
    let updated = prompt::update(
        &pool,
        created.prompt.id,
        owner.id,
        &PromptUpdate::default(),
        Some(&new_tags),
    )
    .await
    .unwrap();

    assert_eq!(updated.tags, vec!["fresh"]);
}

#[tokio::test]
async fn update_by_non_owner_is_rejected() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let intruder = seed_user(&pool, "bob").await;

    let created = prompt::create(&pool, owner.id, &basic_create("Private"), &[])
        .await
        .unwrap();

    let update = PromptUpdate {
        title: Some("Hijacked".into()),
        ..Default::default()
    };
    let err = prompt::update(&pool, created.prompt.id, intruder.id, &update, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Business(ErrorCode::NotResourceOwner, _)
    ));

    // Row unchanged
    let unchanged = prompt::find_with_meta(&pool, created.prompt.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.prompt.title, "Private");
    assert_eq!(unchanged.prompt.version, 1);
}

#[tokio::test]
async fn delete_by_non_owner_leaves_row_intact() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let intruder = seed_user(&pool, "bob").await;

    let created = prompt::create(&pool, owner.id, &basic_create("Mine"), &[])
        .await
        .unwrap();

    let err = prompt::delete(&pool, created.prompt.id, intruder.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Business(ErrorCode::NotResourceOwner, _)
    ));

    assert!(
        prompt::find_with_meta(&pool, created.prompt.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn delete_cascades_tags_and_executions() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let mut data = basic_create("Doomed");
    data.tags = vec!["ephemeral".into()];
    let normalized = tag::normalize(&data.tags);
    let created = prompt::create(&pool, owner.id, &data, &normalized)
        .await
        .unwrap();
    let id = created.prompt.id;

    prolibr_server::db::repository::execution::log(
        &pool,
        id,
        owner.id,
        &shared::models::ExecutionCreate {
            ai_model_used: "gpt-4".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(prompt::delete(&pool, id, owner.id).await.unwrap());

    let assoc: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompt_tag WHERE prompt_id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let execs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM execution WHERE prompt_id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(assoc, 0);
    assert_eq!(execs, 0);
}

#[tokio::test]
async fn failed_tag_insert_rolls_back_the_prompt() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    // A 51-char tag passes straight to the repo here, violating the schema
    // CHECK mid-transaction after the prompt row is already inserted
    let bad_tags = vec!["t".repeat(51)];
    let result = prompt::create(&pool, owner.id, &basic_create("Half written"), &bad_tags).await;
    assert!(result.is_err());

    let prompts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompt")
        .fetch_one(&pool)
        .await
        .unwrap();
    let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(prompts, 0, "prompt row must not survive the rollback");
    assert_eq!(tags, 0);
}

#[tokio::test]
async fn listing_is_scoped_to_the_owner() {
    let pool = test_pool().await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let mut public = basic_create("Bob public");
    public.visibility = Some(Visibility::Public);
    prompt::create(&pool, bob.id, &public, &[]).await.unwrap();
    prompt::create(&pool, bob.id, &basic_create("Bob private"), &[])
        .await
        .unwrap();
    prompt::create(&pool, alice.id, &basic_create("Alice own"), &[])
        .await
        .unwrap();

    // Even with visibility=public, the listing never leaves Alice's rows
    let filter = PromptFilter {
        owner_id: alice.id,
        category_id: None,
        search: None,
        visibility: Some(Visibility::Public),
    };
    let rows = prompt::find_page(&pool, &filter, 50, 0).await.unwrap();
    assert!(rows.is_empty());

    let all = prompt::find_page(&pool, &PromptFilter::owned_by(alice.id), 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].prompt.title, "Alice own");
}

#[tokio::test]
async fn search_matches_title_description_and_content() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let mut a = basic_create("Kubernetes deploy");
    a.content = "How to roll out".into();
    let mut b = basic_create("Other");
    b.description = Some("kubernetes tips".into());
    let mut c = basic_create("Unrelated");
    c.content = "Nothing here".into();
    for data in [&a, &b, &c] {
        prompt::create(&pool, owner.id, data, &[]).await.unwrap();
    }

    let mut filter = PromptFilter::owned_by(owner.id);
    filter.search = Some("KUBERNETES".into());
    let rows = prompt::find_page(&pool, &filter, 50, 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    let total = prompt::count(&pool, &filter).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn page_and_count_agree() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    for i in 0..15 {
        prompt::create(&pool, owner.id, &basic_create(&format!("Prompt {i}")), &[])
            .await
            .unwrap();
    }

    let filter = PromptFilter::owned_by(owner.id);
    let total = prompt::count(&pool, &filter).await.unwrap();
    assert_eq!(total, 15);

    let second_page = prompt::find_page(&pool, &filter, 10, 10).await.unwrap();
    assert_eq!(second_page.len(), 5);
}
