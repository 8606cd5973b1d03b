//! Scenario 6 (§8 "Remote transparency"): a client's view of an `add`
//! matches a server-local subscriber's view, and `queue_snapshot` agrees
//! between the two.

use std::sync::Arc;
use std::time::Duration;

use rq_client::{ClientConfig, RunQueueProxy};
use rq_core::{Event, RunQueueApi};
use rq_engine::RunQueue;
use rq_server::{RunQueueServer, ServerConfig};

use crate::prelude::{engine_with, expect_next, ok_target, SPEC_WAIT};

#[tokio::test]
async fn client_add_is_observed_identically_to_a_local_subscriber() {
    let log_dir = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();

    let engine: Arc<RunQueue> = engine_with(log_dir.path(), -1, ok_target);
    engine.start();
    let mut local_events = engine.subscribe();

    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        password: "correct-horse".to_string(),
        workspace_dir: workspace.path().to_path_buf(),
    };
    let server = Arc::new(RunQueueServer::new(server_config, Arc::clone(&engine)).unwrap());
    let serve_task = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = serve_task.serve().await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let proxy = RunQueueProxy::new();
    let client_config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        password: "correct-horse".to_string(),
    };
    proxy.connect(&client_config).await.unwrap();
    let mut client_events = proxy.subscribe();

    let id = proxy.add("X".to_string(), Default::default()).await.unwrap();

    let local_event = expect_next(&mut local_events, SPEC_WAIT, |e| matches!(e, Event::RunListChanged { .. })).await;
    let Event::RunListChanged { items: local_items } = local_event else {
        unreachable!()
    };

    let client_event = expect_next(&mut client_events, SPEC_WAIT, |e| matches!(e, Event::RunListChanged { .. })).await;
    let Event::RunListChanged { items: client_items } = client_event else {
        unreachable!()
    };

    assert_eq!(local_items.iter().find(|i| i.id == id).map(|i| &i.name), Some(&"X".to_string()));
    assert_eq!(
        local_items.iter().find(|i| i.id == id).map(|i| &i.name),
        client_items.iter().find(|i| i.id == id).map(|i| &i.name)
    );

    let server_order = engine.queue_snapshot().await.unwrap();
    let client_order = proxy.queue_snapshot().await.unwrap();
    assert_eq!(server_order, client_order);

    let _ = server.shutdown().await;
}
