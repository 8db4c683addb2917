//! Full todo lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every `TodoApi` call
//! over real HTTP through `ReqwestTransport`. Checks that envelopes resolve,
//! validation failures notify translated text, and a stale version comes back
//! as a silent conflict.

use std::sync::Arc;
use std::time::Duration;

use todo_client::{
    Category, ClientConfig, CreateTodo, ErrorKind, ListQuery, RecordingNotifier, SortBy,
    TodoApi, UpdateStatus, UpdateTodo,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn connect(base_url: &str) -> (TodoApi<todo_client::ReqwestTransport>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let api = TodoApi::connect(ClientConfig::new(base_url), notifier.clone()).unwrap();
    (api, notifier)
}

#[tokio::test(flavor = "multi_thread")]
async fn crud_lifecycle() {
    let base_url = start_server().await;
    let (api, notifier) = connect(&base_url);

    // Step 1: list — should be empty.
    let listed = api.list_todos(ListQuery::default()).await.unwrap();
    assert_eq!(listed.code, 0);
    assert!(listed.data.unwrap().is_empty(), "expected empty list");

    // Step 2: create.
    let input = CreateTodo {
        title: "Integration test".to_string(),
        category: Some(Category::Study),
        priority: Some(4),
        ..CreateTodo::default()
    };
    let created = api.create_todo(&input).await.unwrap().into_data().unwrap();
    assert_eq!(created.title, "Integration test");
    assert_eq!(created.category, Category::Study);
    assert_eq!(created.version, 0);
    let id = created.id;

    // Step 3: get.
    let fetched = api.get_todo(id).await.unwrap().into_data().unwrap();
    assert_eq!(fetched, created);

    // Step 4: complete it.
    let status = UpdateStatus {
        completed: true,
        version: fetched.version,
    };
    let done = api.update_todo_status(id, &status).await.unwrap().into_data().unwrap();
    assert!(done.completed);
    assert_eq!(done.version, 1);

    // Step 5: edit with the stale version — silent conflict.
    let stale = UpdateTodo {
        title: Some("Stale edit".to_string()),
        category: Some(Category::Work),
        version: 0,
        ..UpdateTodo::default()
    };
    let err = api.update_todo(id, &stale).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let conflict = err.conflict().unwrap();
    assert_eq!(conflict.current_version, 1);
    assert_eq!(conflict.provided_version, 0);
    assert_eq!(conflict.latest_data.unwrap(), done);
    assert_eq!(notifier.count(), 0);

    // Step 6: retry with the fresh version.
    let fresh = UpdateTodo {
        version: conflict.current_version,
        ..stale
    };
    let edited = api.update_todo(id, &fresh).await.unwrap().into_data().unwrap();
    assert_eq!(edited.title, "Stale edit");
    assert_eq!(edited.category, Category::Work);
    assert_eq!(edited.version, 2);

    // Step 7: filtered list.
    let query = ListQuery {
        category: Some(Category::Work),
        sort: Some(SortBy::Priority),
    };
    let work = api.list_todos(query).await.unwrap().into_data().unwrap();
    assert_eq!(work.len(), 1);

    // Step 8: delete.
    let deleted = api.delete_todo(id).await.unwrap();
    assert_eq!(deleted.code, 0);
    assert!(deleted.data.is_none());

    // Step 9: get after delete — 404, notified in translation.
    let err = api.get_todo(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientRequest);
    assert_eq!(err.transport().and_then(|e| e.status()), Some(404));
    assert_eq!(notifier.texts(), vec!["待办事项不存在"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn validation_failure_is_notified_in_translation() {
    let base_url = start_server().await;
    let (api, notifier) = connect(&base_url);

    let err = api.create_todo(&CreateTodo::new("   ")).await.unwrap_err();

    assert_eq!(err.transport().and_then(|e| e.status()), Some(400));
    assert!(err.transport().is_some_and(|e| e.has_response()));
    assert_eq!(
        err.transport().and_then(|e| e.body_message()),
        Some("title is required and cannot be empty")
    );
    assert_eq!(notifier.texts(), vec!["标题不能为空"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_is_a_network_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = Arc::new(RecordingNotifier::new());
    let config = ClientConfig::new(&format!("http://{addr}")).with_timeout(Duration::from_secs(2));
    let api = TodoApi::connect(config, notifier.clone()).unwrap();

    let err = api.list_todos(ListQuery::default()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(!err.transport().unwrap().has_response());
    assert_eq!(notifier.texts(), vec!["网络连接失败，请检查网络"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_base_url_is_never_sent() {
    let notifier = Arc::new(RecordingNotifier::new());
    let api = TodoApi::connect(ClientConfig::new("not a url"), notifier.clone()).unwrap();

    let err = api.get_todo(1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Construction);
    assert_eq!(notifier.count(), 1);
}
