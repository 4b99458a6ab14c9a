/*!
 * Overall NetworkManager state and radio switches
 */

use serde::{Deserialize, Serialize};

use crate::parse::{Fields, FromFields};

pub const STATUS_FIELDS: &str = "STATE,CONNECTIVITY,WIFI-HW,WIFI,WWAN-HW,WWAN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub state: String,
    pub connectivity: Option<String>,
    pub wifi_hw: Option<String>,
    pub wifi: Option<String>,
    pub wwan_hw: Option<String>,
    pub wwan: Option<String>,
    pub connected: bool,
}

impl LinkStatus {
    pub fn wifi_enabled(&self) -> bool {
        self.wifi.as_deref() == Some("enabled")
    }

    /// Networking is off when NetworkManager reports `asleep`.
    pub fn networking_enabled(&self) -> bool {
        self.state != "asleep"
    }
}

impl FromFields for LinkStatus {
    fn from_fields(fields: Fields) -> Self {
        let state = fields.text(0).unwrap_or_default();
        Self {
            connected: state == "connected",
            state,
            connectivity: fields.text(1),
            wifi_hw: fields.text(2),
            wifi: fields.text(3),
            wwan_hw: fields.text(4),
            wwan: fields.text(5),
        }
    }
}
