//! End-to-end: client fed from a watched file.

use std::time::Duration;

use gray_config::bootstrap::WatchTarget;
use gray_config::lifecycle::ConfigClient;
use gray_config::resilience::Backoff;
use gray_config::watch::FileFeed;

mod common;

use common::wait_until;

#[tokio::test]
async fn test_file_changes_reach_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkout.conf");
    std::fs::write(&path, "[app]\nmode=initial\n[gray]\nbeta=deny\n").unwrap();

    let client = ConfigClient::new();
    let target = WatchTarget::new(vec![dir.path().display().to_string()], "checkout.conf");
    let handle = client.start_watch(FileFeed::new(), target, Backoff::new(10, 100)).unwrap();

    // Initial snapshot
    assert!(
        wait_until(Duration::from_secs(5), || {
            client.store().get("app", "mode").as_deref() == Some("initial")
        })
        .await
    );
    assert!(!client.gray().is_allowed("gray.beta", "ann"));

    // Give the watcher a moment to settle before writing
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, "[app]\nmode=updated\n[gray]\nbeta=allow\n").unwrap();

    assert!(
        wait_until(Duration::from_secs(10), || {
            client.store().get("app", "mode").as_deref() == Some("updated")
        })
        .await
    );
    // The cache reset follows the store write
    assert!(wait_until(Duration::from_secs(5), || client.gray().is_allowed("gray.beta", "ann")).await);

    handle.abort();
}
