use super::*;

#[tokio::test]
async fn test_clear_history_endpoint() {
    let (downloader, _temp_dir) = create_test_downloader().await;
    downloader.submit("https://example.com/a", None).await.unwrap();
    downloader.submit("https://example.com/b", None).await.unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri("/history")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router_for(&downloader), request).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], 2);

    let (_, listed) = get_json(router_for(&downloader), "/status").await;
    assert_eq!(listed, serde_json::json!([]));
}

#[tokio::test]
async fn test_purge_endpoint_keeps_snapshot() {
    let (downloader, _temp_dir) = create_test_downloader().await;
    downloader.submit("https://example.com/a", None).await.unwrap();

    let download_dir = downloader.get_config().download_dir().clone();
    std::fs::write(download_dir.join("clip.mp4"), b"video").unwrap();
    std::fs::create_dir(download_dir.join("leftovers")).unwrap();

    let (status, json) =
        post_json(router_for(&downloader), "/purge", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);
    assert!(downloader.get_config().snapshot_path().exists());
    assert_eq!(downloader.list_jobs().await.len(), 1);
}
