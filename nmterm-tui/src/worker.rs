/*!
 * nmcli worker
 * Owns the NetworkManager and runs one command at a time off the UI thread
 */

use std::time::{Duration, Instant};

use nmterm_core::network::{ConnectionDetail, ConnectionId, WifiRequest};
use nmterm_core::{CommandError, NetworkManager, Snapshot};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ConnectionUp { id: ConnectionId },
    ConnectionDown { id: ConnectionId },
    DeleteConnection { id: ConnectionId },
    ShowConnection { id: ConnectionId },
    ConnectWifi { request: WifiRequest },
    AddWifi { request: WifiRequest },
    DisconnectDevice { interface: String },
    SetWifiRadio { on: bool },
    SetNetworking { on: bool },
    Rescan,
    CheckConnectivity,
}

impl Request {
    pub fn describe(&self) -> String {
        match self {
            Request::ConnectionUp { id } => format!("activate {}", id),
            Request::ConnectionDown { id } => format!("deactivate {}", id),
            Request::DeleteConnection { id } => format!("delete {}", id),
            Request::ShowConnection { id } => format!("show {}", id),
            Request::ConnectWifi { request } => format!("connect to {}", request.ssid),
            Request::AddWifi { request } => format!("save {}", request.profile_name()),
            Request::DisconnectDevice { interface } => format!("disconnect {}", interface),
            Request::SetWifiRadio { on } => format!("wifi radio {}", on_off(*on)),
            Request::SetNetworking { on } => format!("networking {}", on_off(*on)),
            Request::Rescan => "rescan".to_string(),
            Request::CheckConnectivity => "connectivity check".to_string(),
        }
    }

    /// Whether the visible state is likely to change afterwards.
    fn refreshes(&self) -> bool {
        !matches!(
            self,
            Request::ShowConnection { .. } | Request::CheckConnectivity
        )
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    Snapshot {
        seq: u64,
        snapshot: Snapshot,
        took: Duration,
    },
    Detail {
        id: ConnectionId,
        detail: ConnectionDetail,
    },
    Connectivity {
        state: Option<String>,
    },
    Done {
        message: String,
    },
    Failed {
        context: String,
        error: String,
    },
}

/// Handle held by the UI. Dropping it stops the worker.
pub struct Worker {
    requests: mpsc::Sender<Request>,
    refresh: mpsc::Sender<()>,
    responses: mpsc::UnboundedReceiver<Response>,
}

impl Worker {
    pub fn spawn(nm: NetworkManager, poll_every: Duration) -> Self {
        let (requests, request_rx) = mpsc::channel(16);
        // Capacity 1: a refresh that is already queued absorbs new ones
        let (refresh, refresh_rx) = mpsc::channel(1);
        let (response_tx, responses) = mpsc::unbounded_channel();

        tokio::spawn(run(nm, poll_every, request_rx, refresh_rx, response_tx));

        Self {
            requests,
            refresh,
            responses,
        }
    }

    /// Ask for a poll now instead of waiting for the timer.
    pub fn refresh(&self) {
        let _ = self.refresh.try_send(());
    }

    pub fn submit(&self, request: Request) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("worker queue rejected request: {}", e);
                false
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<Response> {
        self.responses.try_recv().ok()
    }
}

async fn run(
    nm: NetworkManager,
    poll_every: Duration,
    mut requests: mpsc::Receiver<Request>,
    mut refresh: mpsc::Receiver<()>,
    responses: mpsc::UnboundedSender<Response>,
) {
    let mut ticker = interval(poll_every);
    // Next tick is measured from when the last poll finished
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq: u64 = 0;

    tracing::debug!("worker started, polling every {:?}", poll_every);

    loop {
        let poll = tokio::select! {
            biased;
            request = requests.recv() => match request {
                Some(request) => {
                    let refresh_after = request.refreshes();
                    let response = handle(&nm, request).await;
                    let ok = !matches!(response, Response::Failed { .. });
                    if responses.send(response).is_err() {
                        break;
                    }
                    ok && refresh_after
                }
                None => break,
            },
            Some(()) = refresh.recv() => true,
            _ = ticker.tick() => true,
        };

        if poll {
            seq += 1;
            let response = poll_once(&nm, seq).await;
            if responses.send(response).is_err() {
                break;
            }
            ticker.reset();
        }
    }

    tracing::debug!("worker stopped after {} polls", seq);
}

async fn poll_once(nm: &NetworkManager, seq: u64) -> Response {
    let started = Instant::now();
    match nm.snapshot().await {
        Ok(snapshot) => Response::Snapshot {
            seq,
            snapshot,
            took: started.elapsed(),
        },
        Err(e) => failed("refresh", e),
    }
}

async fn handle(nm: &NetworkManager, request: Request) -> Response {
    let context = request.describe();
    tracing::info!("request: {}", context);

    let result = match &request {
        Request::ShowConnection { id } => {
            return match nm.connection_detail(id).await {
                Ok(detail) => Response::Detail {
                    id: id.clone(),
                    detail,
                },
                Err(e) => failed(&context, e),
            };
        }
        Request::CheckConnectivity => {
            return match nm.connectivity().await {
                Ok(state) => Response::Connectivity { state },
                Err(e) => failed(&context, e),
            };
        }
        Request::ConnectionUp { id } => nm.connection_up(id).await,
        Request::ConnectionDown { id } => nm.connection_down(id).await,
        Request::DeleteConnection { id } => nm.delete_connection(id).await,
        Request::ConnectWifi { request } => nm.connect_wifi(request).await,
        Request::AddWifi { request } => nm.add_wifi_connection(request).await,
        Request::DisconnectDevice { interface } => nm.disconnect_device(interface).await,
        Request::SetWifiRadio { on } => nm.set_wifi_radio(*on).await,
        Request::SetNetworking { on } => nm.set_networking(*on).await,
        Request::Rescan => nm.rescan().await,
    };

    match result {
        Ok(()) => Response::Done {
            message: format!("{}: done", context),
        },
        Err(e) => failed(&context, e),
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn failed(context: &str, error: CommandError) -> Response {
    tracing::warn!("{} failed: {}", context, error);
    Response::Failed {
        context: context.to_string(),
        error: error.to_string(),
    }
}
