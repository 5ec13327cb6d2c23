use haven_assistant::{
    AssistantApi, AssistantConfig, AssistantError, ErrorKind, FileStore, LocalFile,
    MessageRequest, OpenAIAssistantClient, RunStatus,
};
use mockito::{Matcher, Server, ServerGuard};

fn client_for(server: &ServerGuard) -> OpenAIAssistantClient {
    let config = AssistantConfig::new("sk-test", "asst_123")
        .unwrap()
        .with_base_url(server.url());
    OpenAIAssistantClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_create_thread_sends_auth_and_version_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads")
        .match_header("authorization", "Bearer sk-test")
        .match_header("openai-beta", "assistants=v2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "thread_abc", "object": "thread", "created_at": 1700000000}"#)
        .create_async()
        .await;

    let thread = client_for(&server).create_thread().await.unwrap();

    assert_eq!(thread.id, "thread_abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_error_carries_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).create_thread().await.unwrap_err();

    match &err {
        AssistantError::Service { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn test_service_error_falls_back_when_body_unreadable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = client_for(&server)
        .create_run("thread_1", None)
        .await
        .unwrap_err();

    assert_eq!(err.reason(), "Failed to run assistant");
}

#[tokio::test]
async fn test_post_message_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/messages")
        .match_body(Matcher::PartialJsonString(
            r#"{"role": "user", "content": "Find me a videographer in Austin"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"id": "msg_1", "role": "user", "content": [{"type": "text", "text": {"value": "Find me a videographer in Austin", "annotations": []}}]}"#)
        .create_async()
        .await;

    let message = client_for(&server)
        .post_message("thread_1", MessageRequest::user("Find me a videographer in Austin"))
        .await
        .unwrap();

    assert_eq!(message.text(), Some("Find me a videographer in Austin"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_attach_files_posts_attachments() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/messages")
        .match_body(Matcher::PartialJsonString(
            r#"{"attachments": [{"file_id": "file-1", "tools": [{"type": "file_search"}]}, {"file_id": "file-2", "tools": [{"type": "file_search"}]}]}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"id": "msg_2", "role": "user", "content": []}"#)
        .create_async()
        .await;

    let attached = client_for(&server)
        .attach_files("thread_1", &["file-1".to_string(), "file-2".to_string()])
        .await
        .unwrap();

    assert!(attached.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_attach_no_files_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let attached = client_for(&server).attach_files("thread_1", &[]).await.unwrap();

    assert!(attached.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_run_uses_configured_assistant() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/runs")
        .match_body(Matcher::Json(serde_json::json!({
            "assistant_id": "asst_123",
            "instructions": "Be brief."
        })))
        .with_status(200)
        .with_body(r#"{"id": "run_1", "status": "queued", "thread_id": "thread_1", "assistant_id": "asst_123"}"#)
        .create_async()
        .await;

    let run = client_for(&server)
        .create_run("thread_1", Some("Be brief."))
        .await
        .unwrap();

    assert_eq!(run.id, "run_1");
    assert_eq!(run.status, RunStatus::Queued);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_run_status_exposes_last_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_body(r#"{"id": "run_1", "status": "failed", "last_error": {"code": "rate_limit_exceeded", "message": "Quota exhausted"}}"#)
        .create_async()
        .await;

    let run = client_for(&server).run_status("thread_1", "run_1").await.unwrap();

    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.last_error.unwrap().message, "Quota exhausted");
}

#[tokio::test]
async fn test_latest_messages_requests_newest_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/threads/thread_1/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("order".into(), "desc".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"object": "list", "data": [{"id": "msg_9", "role": "assistant", "content": [{"type": "text", "text": {"value": "Here are three creators.", "annotations": []}}]}]}"#)
        .create_async()
        .await;

    let messages = client_for(&server).latest_messages("thread_1").await.unwrap();

    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_assistant_reply());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_latest_messages_rejects_non_list() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/threads/thread_1/messages")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"object": "list", "data": {"id": "msg_9"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).latest_messages("thread_1").await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_upload_file_is_multipart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::Regex("assistants".to_string()))
        .with_status(200)
        .with_body(r#"{"id": "file-xyz", "bytes": 5, "created_at": 1700000000, "filename": "listing.txt", "purpose": "assistants"}"#)
        .create_async()
        .await;

    let file = LocalFile::from_bytes("listing.txt", b"hello".to_vec());
    let object = client_for(&server).upload_file(&file).await.unwrap();

    assert_eq!(object.id, "file-xyz");
    assert_eq!(object.filename, "listing.txt");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_error_is_transient() {
    // Nothing listens on this port
    let config = AssistantConfig::new("sk-test", "asst_123")
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    let client = OpenAIAssistantClient::new(&config).unwrap();

    let err = client.run_status("thread_1", "run_1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
}
