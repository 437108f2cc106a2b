mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};
use uuid::Uuid;

async fn seeded() -> (TestApp, String) {
    let app = TestApp::new();
    let token = common::token_for(Uuid::new_v4());

    let work = app.notebook(&token, "Work").await;
    app.note(&token, &work, json!({ "title": "Meeting notes" })).await;
    app.note(&token, &work, json!({ "title": "Budget" })).await;

    let home = app.notebook(&token, "Home").await;
    app.note(&token, &home, json!({ "title": "Groceries" })).await;

    let travel = app.notebook(&token, "Travel meetups").await;
    app.note(&token, &travel, json!({ "title": "Packing list" })).await;

    (app, token)
}

fn titles(notebook: &Value) -> Vec<(&str, bool)> {
    notebook["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| (item["title"].as_str().unwrap(), item["is_match"].as_bool().unwrap()))
        .collect()
}

#[tokio::test]
async fn blank_search_returns_everything() {
    let (app, token) = seeded().await;
    let (status, body) = app.get("/api/sidebar", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["query"], "");
    let notebooks = body["data"]["notebooks"].as_array().unwrap();
    assert_eq!(notebooks.len(), 3);
    assert!(notebooks.iter().all(|nb| titles(nb).iter().all(|(_, matched)| !matched)));
    assert_eq!(
        notebooks[0]["segments"],
        json!([{ "text": "Work", "matched": false }])
    );
}

#[tokio::test]
async fn search_keeps_matching_notebooks_and_flags_notes() {
    let (app, token) = seeded().await;
    let (_, body) = app.get("/api/sidebar?search=MEET", &token).await;

    let notebooks = body["data"]["notebooks"].as_array().unwrap();
    let names: Vec<&str> = notebooks.iter().map(|nb| nb["title"].as_str().unwrap()).collect();
    assert_eq!(names, ["Work", "Travel meetups"]);

    let work = titles(&notebooks[0]);
    assert!(work.contains(&("Meeting notes", true)));
    assert!(work.contains(&("Budget", false)));

    // notebook name matched, its notes did not
    assert_eq!(titles(&notebooks[1]), [("Packing list", false)]);
    assert_eq!(
        notebooks[1]["segments"],
        json!([
            { "text": "Travel ", "matched": false },
            { "text": "meet", "matched": true },
            { "text": "ups", "matched": false }
        ])
    );

    let meeting = notebooks[0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["title"] == "Meeting notes")
        .unwrap();
    assert_eq!(meeting["segments"][0], json!({ "text": "Meet", "matched": true }));
}

#[tokio::test]
async fn search_without_hits_is_empty() {
    let (app, token) = seeded().await;
    let (_, body) = app.get("/api/sidebar?search=zzz", &token).await;
    assert_eq!(body["data"]["notebooks"], json!([]));
}
