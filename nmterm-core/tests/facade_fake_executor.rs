// tests/facade_fake_executor.rs
//
// Drives NetworkManager against a fake executor that records argument
// vectors and replays canned nmcli output.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use nmterm_core::network::{ConnectionId, WifiRequest};
use nmterm_core::runner::ExecFuture;
use nmterm_core::{CommandError, Execute, NetworkManager};

/// Replies in order; records every argv it was asked to run.
#[derive(Default)]
struct FakeExecutor {
    replies: Mutex<VecDeque<Result<String, i32>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeExecutor {
    fn replying(replies: Vec<Result<&str, i32>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|argv| argv.join(" "))
            .collect()
    }
}

impl Execute for FakeExecutor {
    fn execute<'a>(&'a self, argv: &'a [String]) -> ExecFuture<'a> {
        self.calls.lock().unwrap().push(argv.to_vec());
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Ok(String::new()));
        let program = argv[0].clone();
        Box::pin(async move {
            reply.map_err(|code| CommandError::Exit {
                program,
                code: Some(code),
            })
        })
    }
}

fn manager(fake: &Arc<FakeExecutor>) -> NetworkManager {
    NetworkManager::with_executor(fake.clone(), "nmcli")
}

#[tokio::test]
async fn snapshot_runs_three_queries_in_order() {
    let fake = FakeExecutor::replying(vec![
        Ok("sleepyrouter:Infra:11:54 Mbit/s:74:▂▄▆_:WPA2\nCoffee:Infra:1:54 Mbit/s:31:▂___:\n"),
        Ok("sleepyrouter:1484d982-bd6e-4e56-a4a0-df4c10414762:802-11-wireless:wlp2s0\n"),
        Ok("connected:full:enabled:enabled:enabled:enabled\n"),
    ]);

    let snapshot = manager(&fake).snapshot().await.unwrap();

    assert_eq!(snapshot.networks.len(), 2);
    assert_eq!(snapshot.networks[1].ssid, "Coffee");
    assert_eq!(snapshot.connections.len(), 1);
    assert!(snapshot.is_active("sleepyrouter"));
    assert!(!snapshot.is_active("Coffee"));
    assert!(snapshot.status.as_ref().unwrap().connected);

    assert_eq!(
        fake.calls(),
        vec![
            "nmcli -t -f SSID,MODE,CHAN,RATE,SIGNAL,BARS,SECURITY device wifi list",
            "nmcli -t -f NAME,UUID,TYPE,DEVICE connection show",
            "nmcli -t -f STATE,CONNECTIVITY,WIFI-HW,WIFI,WWAN-HW,WWAN general status",
        ]
    );
}

#[tokio::test]
async fn snapshot_stops_at_first_failure() {
    let fake = FakeExecutor::replying(vec![Ok(""), Err(8)]);

    let err = manager(&fake).snapshot().await.unwrap_err();

    assert_eq!(err.code(), Some(8));
    assert_eq!(fake.calls().len(), 2);
}

#[tokio::test]
async fn empty_scan_is_empty_list() {
    let fake = FakeExecutor::replying(vec![Ok("\n")]);
    assert!(manager(&fake).scan_networks().await.unwrap().is_empty());
}

#[tokio::test]
async fn detail_is_parsed_from_show_output() {
    let fake = FakeExecutor::replying(vec![Ok(
        "connection.id:                          Foobar\n\
         connection.uuid:                        12f88ea5-3ae1-4aa8-adbf-b5d12ace5dfc\n\
         connection.autoconnect:                 yes\n",
    )]);

    let detail = manager(&fake)
        .connection_detail(&ConnectionId::parse("Foobar"))
        .await
        .unwrap();

    assert_eq!(detail.get("connection.uuid"), Some("12f88ea5-3ae1-4aa8-adbf-b5d12ace5dfc"));
    assert_eq!(fake.calls(), vec!["nmcli connection show id Foobar"]);
}

#[tokio::test]
async fn delete_uses_uuid_form_for_uuids() {
    let fake = FakeExecutor::replying(vec![Ok(""), Ok("")]);
    let nm = manager(&fake);

    nm.delete_connection(&ConnectionId::parse("1914bb0c-fa13-4d9d-befc-f3db3c96f0bb"))
        .await
        .unwrap();
    nm.delete_connection(&ConnectionId::parse("Foobar")).await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            "nmcli connection delete uuid 1914bb0c-fa13-4d9d-befc-f3db3c96f0bb",
            "nmcli connection delete id Foobar",
        ]
    );
}

#[tokio::test]
async fn connect_passes_ssid_with_spaces_as_one_argument() {
    let fake = FakeExecutor::replying(vec![Ok("Device 'wlp2s0' successfully activated.\n")]);

    manager(&fake)
        .connect_wifi(&WifiRequest::new("My Home").password("s3cr3t"))
        .await
        .unwrap();

    let calls = fake.calls.lock().unwrap().clone();
    assert_eq!(
        calls[0],
        vec!["nmcli", "device", "wifi", "connect", "My Home", "password", "s3cr3t"]
    );
}

#[tokio::test]
async fn failing_action_surfaces_exit_code() {
    let fake = FakeExecutor::replying(vec![Err(10)]);

    let err = manager(&fake)
        .connection_up(&ConnectionId::parse("Foobar"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(10));
}

#[tokio::test]
async fn connectivity_reads_scalar() {
    let fake = FakeExecutor::replying(vec![Ok("limited\n")]);
    assert_eq!(
        manager(&fake).connectivity().await.unwrap().as_deref(),
        Some("limited")
    );
    assert_eq!(fake.calls(), vec!["nmcli -t networking connectivity"]);
}
