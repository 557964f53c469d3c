mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// POST → 201, GET all → one item, PUT → 202, GET by id → updated,
/// DELETE → 204, GET by id → 404.
#[tokio::test]
async fn full_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::register(server, "todo-roundtrip", "pw").await?;

    // Create
    let res = client
        .post(format!("{}/api/todos", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "buy milk", "isCompleted": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(location.starts_with("/api/todos/"), "location: {}", location);
    let id: u64 = location.rsplit('/').next().unwrap_or_default().parse()?;

    // Exactly one item, ours
    let res = client
        .get(format!("{}/api/todos", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let todos = res.json::<serde_json::Value>().await?;
    let todos = todos.as_array().expect("array body");
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "buy milk");
    assert_eq!(todos[0]["isCompleted"], false);
    assert_eq!(todos[0]["id"], id);

    // Update
    let res = client
        .put(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "title": "buy milk done", "isCompleted": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = client
        .get(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let todo = res.json::<serde_json::Value>().await?;
    assert_eq!(todo["title"], "buy milk done");
    assert_eq!(todo["isCompleted"], true);

    // Delete, then the id is gone
    let res = client
        .delete(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Second delete finds nothing
    let res = client
        .delete(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn todos_are_scoped_to_their_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let alice = common::register(server, "scope-alice", "pw").await?;
    let bob = common::register(server, "scope-bob", "pw").await?;

    let res = client
        .post(format!("{}/api/todos", server.base_url))
        .bearer_auth(&alice)
        .json(&json!({ "title": "alice's secret errand", "isCompleted": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let id: u64 = location.rsplit('/').next().unwrap_or_default().parse()?;

    // Bob cannot see it by id - 404, not 403
    let res = client
        .get(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Nor in his list
    let res = client
        .get(format!("{}/api/todos", server.base_url))
        .bearer_auth(&bob)
        .send()
        .await?;
    let todos = res.json::<serde_json::Value>().await?;
    let titles: Vec<_> = todos
        .as_array()
        .expect("array body")
        .iter()
        .map(|t| t["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(!titles.contains(&"alice's secret errand".to_string()));

    // Bob cannot delete it either, and it survives his attempt
    let res = client
        .delete(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn foreign_update_is_a_no_op() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let alice = common::register(server, "upd-alice", "pw").await?;
    let bob = common::register(server, "upd-bob", "pw").await?;

    let res = client
        .post(format!("{}/api/todos", server.base_url))
        .bearer_auth(&alice)
        .json(&json!({ "title": "untouched", "isCompleted": false }))
        .send()
        .await?;
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let id: u64 = location.rsplit('/').next().unwrap_or_default().parse()?;

    // Permissive contract: 202 even though nothing matched for bob
    let res = client
        .put(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&bob)
        .json(&json!({ "title": "hijacked", "isCompleted": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = client
        .get(format!("{}/api/todos/{}", server.base_url, id))
        .bearer_auth(&alice)
        .send()
        .await?;
    let todo = res.json::<serde_json::Value>().await?;
    assert_eq!(todo["title"], "untouched");
    assert_eq!(todo["isCompleted"], false);
    Ok(())
}

#[tokio::test]
async fn validation_failures_return_the_field_error_array() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::register(server, "val-alice", "pw").await?;

    for payload in [
        json!({ "isCompleted": true }),
        json!({ "title": "", "isCompleted": false }),
        json!({ "title": "ab", "isCompleted": false }),
    ] {
        let res = client
            .post(format!("{}/api/todos", server.base_url))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {}", payload);

        let errors = res.json::<serde_json::Value>().await?;
        let errors = errors.as_array().expect("array body");
        assert!(!errors.is_empty());
        assert_eq!(errors[0]["property"], "title");
        assert!(errors[0]["error"].is_string());
    }

    // And nothing was created
    let res = client
        .get(format!("{}/api/todos", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let todos = res.json::<serde_json::Value>().await?;
    assert_eq!(todos.as_array().expect("array body").len(), 0);
    Ok(())
}
