//! File API integration tests.
//!
//! Run with: `cargo test -p vidstore-api --test files_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use axum::http::StatusCode;
use helpers::{location_of, setup_test_app, setup_test_app_with, upload};
use sha2::{Digest, Sha256};
use vidstore_core::models::FileSummary;
use vidstore_core::UploadPolicy;

const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 not a real video, close enough";

#[tokio::test]
async fn test_readyz_at_root_and_v1() {
    let app = setup_test_app().await;

    let response = app.client().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.client().get("/v1/readyz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_returns_location_header() {
    let app = setup_test_app().await;

    let response = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(location_of(&response), "/files/sample.mp4");
    assert_eq!(app.row_count().await, 1);
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_upload_disallowed_mime_leaves_nothing_behind() {
    let app = setup_test_app().await;

    let response = upload(&app, "cat.png", "image/png", b"not a video").await;

    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(app.row_count().await, 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_without_file_part_is_bad_request() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("comment", "no file here");
    let response = app.client().post("/files").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn test_upload_over_size_limit_leaves_nothing_behind() {
    let app = setup_test_app_with(UploadPolicy {
        allowed_mime_types: vec![],
        max_file_size_bytes: 16,
    })
    .await;

    let response = upload(&app, "big.mp4", "video/mp4", &[0u8; 64]).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.row_count().await, 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_colliding_names_get_sequential_suffixes() {
    let app = setup_test_app().await;

    let first = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;
    let second = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;
    let third = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;

    assert_eq!(location_of(&first), "/files/sample.mp4");
    assert_eq!(location_of(&second), "/files/sample_1.mp4");
    assert_eq!(location_of(&third), "/files/sample_2.mp4");
}

#[tokio::test]
async fn test_deleting_frees_the_fileid_for_reuse() {
    let app = setup_test_app().await;

    upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;
    upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;

    let response = app.client().delete("/files/sample.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // The base name is free again, so the probe lands on it directly.
    let response = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;
    assert_eq!(location_of(&response), "/files/sample.mp4");
}

#[tokio::test]
async fn test_download_restores_original_identity_and_bytes() {
    let app = setup_test_app().await;

    upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;

    let response = app.client().get("/files/sample.mp4").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type").to_str().unwrap(), "video/mp4");
    assert_eq!(
        response.header("content-disposition").to_str().unwrap(),
        "attachment; filename=\"sample.mp4\""
    );

    let body = response.as_bytes().to_vec();
    assert_eq!(body, MP4_BYTES);

    // Byte length and digest must match what the upload recorded.
    let (size, checksum): (i64, String) =
        sqlx::query_as("SELECT size, checksum FROM files WHERE fileid = $1")
            .bind("sample.mp4")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(body.len() as i64, size);
    assert_eq!(hex::encode(Sha256::digest(&body)), checksum);
}

#[tokio::test]
async fn test_download_unknown_or_deleted_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/files/never-existed.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    upload(&app, "gone.mp4", "video/mp4", MP4_BYTES).await;
    app.client().delete("/files/gone.mp4").await;

    let response = app.client().get("/files/gone.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_insertion_ordered_and_skips_deleted() {
    let app = setup_test_app().await;

    upload(&app, "first.mp4", "video/mp4", MP4_BYTES).await;
    upload(&app, "second.mp4", "video/mp4", MP4_BYTES).await;
    upload(&app, "third.mp4", "video/mp4", MP4_BYTES).await;

    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    let fileids: Vec<&str> = listed.iter().map(|f| f.fileid.as_str()).collect();
    assert_eq!(fileids, ["first.mp4", "second.mp4", "third.mp4"]);

    app.client().delete("/files/second.mp4").await;

    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    let fileids: Vec<&str> = listed.iter().map(|f| f.fileid.as_str()).collect();
    assert_eq!(fileids, ["first.mp4", "third.mp4"]);

    app.client().delete("/files/first.mp4").await;
    app.client().delete("/files/third.mp4").await;

    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    assert!(listed.is_empty());
    // Soft delete: rows stay, blobs go.
    assert_eq!(app.row_count().await, 3);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_list_pagination() {
    let app = setup_test_app().await;

    upload(&app, "a.mp4", "video/mp4", MP4_BYTES).await;
    upload(&app, "b.mp4", "video/mp4", MP4_BYTES).await;
    upload(&app, "c.mp4", "video/mp4", MP4_BYTES).await;

    let listed: Vec<FileSummary> = app.client().get("/files?skip=1&limit=1").await.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fileid, "b.mp4");

    // A non-positive limit means no pagination at all.
    let listed: Vec<FileSummary> = app.client().get("/files?skip=1&limit=0").await.json();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn test_delete_twice_returns_not_found() {
    let app = setup_test_app().await;

    upload(&app, "once.mp4", "video/mp4", MP4_BYTES).await;

    let response = app.client().delete("/files/once.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.client().delete("/files/once.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_to_end_workflow() {
    let app = setup_test_app().await;

    // Upload sample.mp4, then a second file with the same name.
    let first = upload(&app, "sample.mp4", "video/mp4", MP4_BYTES).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    assert_eq!(location_of(&first), "/files/sample.mp4");

    let second = upload(&app, "sample.mp4", "video/mp4", b"different bytes").await;
    assert_eq!(location_of(&second), "/files/sample_1.mp4");

    // Two entries, upload order.
    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    let fileids: Vec<&str> = listed.iter().map(|f| f.fileid.as_str()).collect();
    assert_eq!(fileids, ["sample.mp4", "sample_1.mp4"]);
    // Both kept their original name.
    assert!(listed.iter().all(|f| f.name == "sample.mp4"));

    // Download restores the original bytes.
    let response = app.client().get("/files/sample.mp4").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.as_bytes().to_vec(), MP4_BYTES);

    // Delete the first; one entry remains.
    let response = app.client().delete("/files/sample.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    let fileids: Vec<&str> = listed.iter().map(|f| f.fileid.as_str()).collect();
    assert_eq!(fileids, ["sample_1.mp4"]);
}

#[tokio::test]
async fn test_v1_routes_behave_like_root_routes() {
    let app = setup_test_app().await;

    let part = axum_test::multipart::Part::bytes(MP4_BYTES.to_vec())
        .file_name("nested.mp4".to_string())
        .mime_type("video/mp4".to_string());
    let form = axum_test::multipart::MultipartForm::new().add_part("file", part);

    let response = app.client().post("/v1/files").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = app.client().get("/v1/files/nested.mp4").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Same state behind both mounts.
    let listed: Vec<FileSummary> = app.client().get("/files").await.json();
    assert_eq!(listed.len(), 1);

    let response = app.client().delete("/v1/files/nested.mp4").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}
