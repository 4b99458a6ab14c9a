/*!
 * nmcli invocations as data
 */

use super::connection::{ConnectionId, CONNECTION_FIELDS};
use super::general::STATUS_FIELDS;
use super::wifi::{WifiRequest, WIFI_FIELDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmCommand {
    WifiList,
    WifiRescan,
    ConnectionList,
    GeneralStatus,
    Connectivity,
    ConnectionShow(ConnectionId),
    ConnectionUp(ConnectionId),
    ConnectionDown(ConnectionId),
    ConnectionDelete(ConnectionId),
    WifiConnect(WifiRequest),
    WifiAdd(WifiRequest),
    DeviceDisconnect(String),
    Networking(bool),
    WifiRadio(bool),
}

impl NmCommand {
    /// Arguments after the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        let mut push = |items: &[&str]| args.extend(items.iter().map(|s| s.to_string()));

        match self {
            NmCommand::WifiList => push(&["-t", "-f", WIFI_FIELDS, "device", "wifi", "list"]),
            NmCommand::WifiRescan => push(&["device", "wifi", "rescan"]),
            NmCommand::ConnectionList => {
                push(&["-t", "-f", CONNECTION_FIELDS, "connection", "show"])
            }
            NmCommand::GeneralStatus => push(&["-t", "-f", STATUS_FIELDS, "general", "status"]),
            NmCommand::Connectivity => push(&["-t", "networking", "connectivity"]),
            NmCommand::ConnectionShow(id) => {
                push(&["connection", "show", id.selector(), id.value()])
            }
            NmCommand::ConnectionUp(id) => push(&["connection", "up", id.selector(), id.value()]),
            NmCommand::ConnectionDown(id) => {
                push(&["connection", "down", id.selector(), id.value()])
            }
            NmCommand::ConnectionDelete(id) => {
                push(&["connection", "delete", id.selector(), id.value()])
            }
            NmCommand::WifiConnect(req) => {
                push(&["device", "wifi", "connect", req.ssid.as_str()]);
                if let Some(password) = &req.password {
                    push(&["password", password.as_str()]);
                }
                if let Some(interface) = &req.interface {
                    push(&["ifname", interface.as_str()]);
                }
                if let Some(name) = &req.name {
                    push(&["name", name.as_str()]);
                }
                if req.private {
                    push(&["private", "yes"]);
                }
            }
            NmCommand::WifiAdd(req) => {
                push(&[
                    "connection",
                    "add",
                    "type",
                    "wifi",
                    "con-name",
                    req.profile_name(),
                    "ifname",
                    req.interface.as_deref().unwrap_or("*"),
                    "ssid",
                    req.ssid.as_str(),
                ]);
                if let Some(password) = &req.password {
                    push(&["wifi-sec.key-mgmt", "wpa-psk", "wifi-sec.psk", password.as_str()]);
                }
            }
            NmCommand::DeviceDisconnect(interface) => {
                push(&["device", "disconnect", interface.as_str()])
            }
            NmCommand::Networking(on) => push(&["networking", on_off(*on)]),
            NmCommand::WifiRadio(on) => push(&["radio", "wifi", on_off(*on)]),
        }

        args
    }

    /// Full argument vector including the program.
    pub fn argv(&self, program: &str) -> Vec<String> {
        let mut argv = vec![program.to_string()];
        argv.extend(self.args());
        argv
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
