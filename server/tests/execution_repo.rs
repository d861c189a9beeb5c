//! Execution repository behavior: append-only logging, usage counter,
//! history paging, per-user aggregates.

mod common;

use common::{seed_user, test_pool};
use prolibr_server::db::repository::{execution, prompt};
use shared::models::{ExecutionCreate, PromptCreate};

async fn seed_prompt(pool: &sqlx::SqlitePool, owner_id: i64, title: &str) -> i64 {
    let data = PromptCreate {
        title: title.into(),
        content: "...".into(),
        ..Default::default()
    };
    prompt::create(pool, owner_id, &data, &[])
        .await
        .unwrap()
        .prompt
        .id
}

fn run(model: &str, rating: Option<i64>, tokens: i64, cost: f64) -> ExecutionCreate {
    ExecutionCreate {
        ai_model_used: model.into(),
        response_quality_rating: rating,
        tokens_used: Some(tokens),
        cost_estimate: Some(cost),
        ..Default::default()
    }
}

#[tokio::test]
async fn logging_bumps_usage_count() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let prompt_id = seed_prompt(&pool, owner.id, "Counted").await;

    for _ in 0..3 {
        execution::log(&pool, prompt_id, owner.id, &run("gpt-4", Some(4), 100, 0.01))
            .await
            .unwrap();
    }

    let detail = prompt::find_with_meta(&pool, prompt_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.prompt.usage_count, 3);
}

#[tokio::test]
async fn history_is_newest_first_and_paged() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let prompt_id = seed_prompt(&pool, owner.id, "History").await;

    for i in 0..5 {
        execution::log(
            &pool,
            prompt_id,
            owner.id,
            &run(&format!("model-{i}"), None, 0, 0.0),
        )
        .await
        .unwrap();
    }

    let page = execution::find_by_prompt(&pool, prompt_id, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].created_at >= page[1].created_at);

    let rest = execution::find_by_prompt(&pool, prompt_id, 10, 2).await.unwrap();
    assert_eq!(rest.len(), 3);
}

#[tokio::test]
async fn defaults_fill_optional_fields() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "alice").await;
    let prompt_id = seed_prompt(&pool, owner.id, "Defaults").await;

    let logged = execution::log(
        &pool,
        prompt_id,
        owner.id,
        &ExecutionCreate {
            ai_model_used: "gpt-4".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(logged.was_successful);
    assert_eq!(logged.tokens_used, 0);
    assert_eq!(logged.cost_estimate, 0.0);
    assert!(logged.response_quality_rating.is_none());
    assert!(logged.input_variables.is_empty());
}

#[tokio::test]
async fn analytics_aggregates_per_user() {
    let pool = test_pool().await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let alice_prompt = seed_prompt(&pool, alice.id, "Alice's").await;
    let bob_prompt = seed_prompt(&pool, bob.id, "Bob's").await;

    execution::log(&pool, alice_prompt, alice.id, &run("gpt-4", Some(4), 100, 0.50))
        .await
        .unwrap();
    execution::log(&pool, alice_prompt, alice.id, &run("gpt-4", Some(2), 50, 0.25))
        .await
        .unwrap();
    execution::log(&pool, bob_prompt, bob.id, &run("claude", Some(5), 999, 9.99))
        .await
        .unwrap();

    let analytics = execution::user_analytics(&pool, alice.id).await.unwrap();
    assert_eq!(analytics.total_prompts, 1);
    assert_eq!(analytics.total_executions, 2);
    assert_eq!(analytics.avg_quality_rating, Some(3.0));
    assert_eq!(analytics.total_tokens_used, 150);
    assert!((analytics.total_cost_estimate - 0.75).abs() < 1e-9);
    assert_eq!(analytics.executions_this_week, 2);
}

#[tokio::test]
async fn analytics_for_fresh_user_is_all_zero() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "newbie").await;

    let analytics = execution::user_analytics(&pool, user.id).await.unwrap();
    assert_eq!(analytics.total_prompts, 0);
    assert_eq!(analytics.total_executions, 0);
    assert_eq!(analytics.avg_quality_rating, None);
    assert_eq!(analytics.total_tokens_used, 0);
    assert_eq!(analytics.total_cost_estimate, 0.0);
}
