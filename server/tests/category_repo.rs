//! Category repository behavior: counts, uniqueness, guarded deletion.

mod common;

use common::{seed_user, test_pool};
use prolibr_server::db::repository::{RepoError, category, prompt};
use shared::ErrorCode;
use shared::models::{CategoryCreate, CategoryUpdate, PromptCreate};

fn named(name: &str) -> CategoryCreate {
    CategoryCreate {
        name: name.into(),
        description: None,
        color: Some("#3B82F6".into()),
        icon: None,
        sort_order: None,
    }
}

#[tokio::test]
async fn create_and_list_with_counts() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;

    let work = category::create(&pool, named("Work")).await.unwrap();
    category::create(&pool, named("Play")).await.unwrap();

    let data = PromptCreate {
        title: "In work".into(),
        content: "...".into(),
        category_id: Some(work.id),
        ..Default::default()
    };
    prompt::create(&pool, owner.id, &data, &[]).await.unwrap();

    let categories = category::find_all(&pool).await.unwrap();
    assert_eq!(categories.len(), 2);
    let by_name = |n: &str| categories.iter().find(|c| c.name == n).unwrap();
    assert_eq!(by_name("Work").prompt_count, 1);
    assert_eq!(by_name("Play").prompt_count, 0);
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let pool = test_pool().await;
    category::create(&pool, named("Work")).await.unwrap();

    let err = category::create(&pool, named("Work")).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::Business(ErrorCode::CategoryNameExists, _)
    ));
}

#[tokio::test]
async fn rename_onto_existing_name_is_a_conflict() {
    let pool = test_pool().await;
    category::create(&pool, named("Work")).await.unwrap();
    let play = category::create(&pool, named("Play")).await.unwrap();

    let update = CategoryUpdate {
        name: Some("Work".into()),
        description: None,
        color: None,
        icon: None,
        sort_order: None,
    };
    let err = category::update(&pool, play.id, update).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::Business(ErrorCode::CategoryNameExists, _)
    ));
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let pool = test_pool().await;
    let created = category::create(&pool, named("Work")).await.unwrap();

    let update = CategoryUpdate {
        description: Some("All work prompts".into()),
        name: None,
        color: None,
        icon: None,
        sort_order: None,
    };
    let updated = category::update(&pool, created.id, update).await.unwrap();
    assert_eq!(updated.name, "Work");
    assert_eq!(updated.color.as_deref(), Some("#3B82F6"));
    assert_eq!(updated.description.as_deref(), Some("All work prompts"));
}

#[tokio::test]
async fn delete_with_dependent_prompts_is_rejected() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let work = category::create(&pool, named("Work")).await.unwrap();

    let data = PromptCreate {
        title: "Blocker".into(),
        content: "...".into(),
        category_id: Some(work.id),
        ..Default::default()
    };
    let blocker = prompt::create(&pool, owner.id, &data, &[]).await.unwrap();

    let err = category::delete(&pool, work.id).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::Business(ErrorCode::CategoryHasPrompts, _)
    ));

    // Once the dependent prompt is gone, deletion goes through
    prompt::delete(&pool, blocker.prompt.id, owner.id)
        .await
        .unwrap();
    assert!(category::delete(&pool, work.id).await.unwrap());
    assert!(category::find_by_id(&pool, work.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_category_is_not_found() {
    let pool = test_pool().await;
    let err = category::delete(&pool, 424242).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
