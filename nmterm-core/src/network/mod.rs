pub mod command;
pub mod connection;
pub mod general;
pub mod wifi;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::parse::{parse_detail, parse_scalar, parse_tabular};
use crate::runner::{CommandError, CommandRunner, Execute};

pub use command::NmCommand;
pub use connection::{ConfiguredConnection, ConnectionDetail, ConnectionId, NO_DEVICE};
pub use general::LinkStatus;
pub use wifi::{ObservedNetwork, WifiRequest};

pub const DEFAULT_PROGRAM: &str = "nmcli";

/// One poll's worth of state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub networks: Vec<ObservedNetwork>,
    pub connections: Vec<ConfiguredConnection>,
    pub status: Option<LinkStatus>,
}

impl Snapshot {
    /// Saved profile whose name matches a visible SSID.
    pub fn profile_for(&self, ssid: &str) -> Option<&ConfiguredConnection> {
        self.connections.iter().find(|conn| conn.name == ssid)
    }

    /// Whether the network with this SSID is the one currently in use.
    pub fn is_active(&self, ssid: &str) -> bool {
        self.profile_for(ssid).is_some_and(|conn| conn.connected)
    }
}

/// nmcli front door: builds each command, runs it, parses the result.
#[derive(Clone)]
pub struct NetworkManager {
    exec: Arc<dyn Execute>,
    program: String,
}

impl NetworkManager {
    pub fn new(runner: CommandRunner, program: impl Into<String>) -> Self {
        Self::with_executor(Arc::new(runner), program)
    }

    pub fn with_executor(exec: Arc<dyn Execute>, program: impl Into<String>) -> Self {
        Self {
            exec,
            program: program.into(),
        }
    }

    /// Run a command and return its raw standard output.
    pub async fn run(&self, command: &NmCommand) -> Result<String, CommandError> {
        let argv = command.argv(&self.program);
        self.exec.execute(&argv).await
    }

    pub async fn scan_networks(&self) -> Result<Vec<ObservedNetwork>, CommandError> {
        let out = self.run(&NmCommand::WifiList).await?;
        Ok(parse_tabular(&out))
    }

    pub async fn rescan(&self) -> Result<(), CommandError> {
        self.run(&NmCommand::WifiRescan).await.map(drop)
    }

    pub async fn configured_connections(&self) -> Result<Vec<ConfiguredConnection>, CommandError> {
        let out = self.run(&NmCommand::ConnectionList).await?;
        Ok(parse_tabular(&out))
    }

    /// General status; nmcli prints a single line.
    pub async fn link_status(&self) -> Result<Option<LinkStatus>, CommandError> {
        let out = self.run(&NmCommand::GeneralStatus).await?;
        Ok(parse_tabular(&out).into_iter().next())
    }

    pub async fn connectivity(&self) -> Result<Option<String>, CommandError> {
        let out = self.run(&NmCommand::Connectivity).await?;
        Ok(parse_scalar(&out))
    }

    pub async fn connection_detail(
        &self,
        id: &ConnectionId,
    ) -> Result<ConnectionDetail, CommandError> {
        let out = self.run(&NmCommand::ConnectionShow(id.clone())).await?;
        Ok(ConnectionDetail::from(parse_detail(&out)))
    }

    pub async fn connection_up(&self, id: &ConnectionId) -> Result<(), CommandError> {
        self.run(&NmCommand::ConnectionUp(id.clone())).await.map(drop)
    }

    pub async fn connection_down(&self, id: &ConnectionId) -> Result<(), CommandError> {
        self.run(&NmCommand::ConnectionDown(id.clone())).await.map(drop)
    }

    pub async fn delete_connection(&self, id: &ConnectionId) -> Result<(), CommandError> {
        self.run(&NmCommand::ConnectionDelete(id.clone())).await.map(drop)
    }

    pub async fn connect_wifi(&self, request: &WifiRequest) -> Result<(), CommandError> {
        self.run(&NmCommand::WifiConnect(request.clone())).await.map(drop)
    }

    pub async fn add_wifi_connection(&self, request: &WifiRequest) -> Result<(), CommandError> {
        self.run(&NmCommand::WifiAdd(request.clone())).await.map(drop)
    }

    pub async fn disconnect_device(&self, interface: &str) -> Result<(), CommandError> {
        self.run(&NmCommand::DeviceDisconnect(interface.to_string()))
            .await
            .map(drop)
    }

    pub async fn set_networking(&self, on: bool) -> Result<(), CommandError> {
        self.run(&NmCommand::Networking(on)).await.map(drop)
    }

    pub async fn set_wifi_radio(&self, on: bool) -> Result<(), CommandError> {
        self.run(&NmCommand::WifiRadio(on)).await.map(drop)
    }

    /// Scan, list profiles and read status, one command after another.
    pub async fn snapshot(&self) -> Result<Snapshot, CommandError> {
        let networks = self.scan_networks().await?;
        let connections = self.configured_connections().await?;
        let status = self.link_status().await?;

        Ok(Snapshot {
            networks,
            connections,
            status,
        })
    }
}

impl std::fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkManager")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}
