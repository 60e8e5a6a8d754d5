mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn healthz_is_ok() {
    let (app, _storage) = spawn_app().await;
    let response = get(&app, "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readyz_is_ok() {
    let (app, _storage) = spawn_app().await;
    let response = get(&app, "/readyz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_movie_returns_created_movie() {
    let (app, _storage) = spawn_app().await;

    let response = post_json(
        &app,
        "/movies",
        serde_json::json!({
            "title": "Movie",
            "description": "Description",
            "release": "2021-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["id"].is_string());
    assert_eq!(body["title"], "Movie");
    assert_eq!(body["description"], "Description");
    assert_eq!(body["release"], "2021-01-01");
    assert_eq!(body["images"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_movie_is_rejected() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "Movie", "2021-01-01").await;

    let response = post_json(
        &app,
        "/movies",
        serde_json::json!({
            "title": "Movie",
            "description": "Another description",
            "release": "2021-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Movie already exists.");
}

#[tokio::test]
async fn future_release_is_rejected() {
    let (app, _storage) = spawn_app().await;

    let response = post_json(
        &app,
        "/movies",
        serde_json::json!({
            "title": "Movie",
            "description": "Description",
            "release": "2999-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_release_is_rejected() {
    let (app, _storage) = spawn_app().await;

    let response = post_json(
        &app,
        "/movies",
        serde_json::json!({
            "title": "Movie",
            "description": "Description",
            "release": "01/01/2021",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_movie_roundtrip() {
    let (app, _storage) = spawn_app().await;
    let id = create_movie(&app, "Movie", "2021-01-01").await;

    let response = get(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["title"], "Movie");
    assert_eq!(body["release"], "2021-01-01");
}

#[tokio::test]
async fn get_missing_movie_is_bad_request() {
    let (app, _storage) = spawn_app().await;

    let response = get(&app, &format!("/movies/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_movie_changes_fields() {
    let (app, _storage) = spawn_app().await;
    let id = create_movie(&app, "Movie", "2021-01-01").await;

    let response = put_json(
        &app,
        &format!("/movies/{id}"),
        serde_json::json!({
            "title": "Updated Movie",
            "description": "Updated Description",
            "release": "2020-06-15",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["title"], "Updated Movie");
    assert_eq!(body["description"], "Updated Description");
    assert_eq!(body["release"], "2020-06-15");
}

#[tokio::test]
async fn update_to_existing_title_and_release_is_rejected() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "First", "2021-01-01").await;
    let second = create_movie(&app, "Second", "2021-02-02").await;

    let response = put_json(
        &app,
        &format!("/movies/{second}"),
        serde_json::json!({
            "title": "First",
            "description": "Description",
            "release": "2021-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_movie_then_get_fails() {
    let (app, _storage) = spawn_app().await;
    let id = create_movie(&app, "Movie", "2021-01-01").await;

    let response = delete(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_movies_returns_all() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "First", "2021-01-01").await;
    create_movie(&app, "Second", "2021-02-02").await;

    let response = get(&app, "/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn paged_movies_reports_totals() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "First", "2021-01-01").await;
    create_movie(&app, "Second", "2021-02-02").await;
    create_movie(&app, "Third", "2021-03-03").await;

    let response = get(&app, "/movies/paged?pageNumber=1&pageSize=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["movies"].as_array().unwrap().len(), 2);
    assert_eq!(body["pageNumber"], 1);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["totalRecords"], 3);

    let response = get(&app, "/movies/paged?pageNumber=2&pageSize=2").await;
    let body = body_json(response).await;
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn page_past_end_is_rejected() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "Only", "2021-01-01").await;

    let response = get(&app, "/movies/paged?pageNumber=5&pageSize=2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn huge_page_number_on_empty_catalog_is_handled() {
    let (app, _storage) = spawn_app().await;

    // With zero pages the out-of-range guard does not fire; the offset
    // arithmetic has to cope with the full u32 range anyway.
    let response = get(&app, "/movies/paged?pageNumber=4294967295&pageSize=20").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["movies"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalRecords"], 0);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let (app, _storage) = spawn_app().await;
    create_movie(&app, "The Matrix", "1999-03-31").await;
    create_movie(&app, "Alien", "1979-05-25").await;

    let response = get(&app, "/movies/search?title=matrix").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "The Matrix");
}
