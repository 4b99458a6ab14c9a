/*!
 * WiFi scan results and connect requests
 */

use serde::{Deserialize, Serialize};

use crate::parse::{Fields, FromFields};

/// Field list requested from `nmcli device wifi list`, in terse order.
pub const WIFI_FIELDS: &str = "SSID,MODE,CHAN,RATE,SIGNAL,BARS,SECURITY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedNetwork {
    /// Empty for hidden networks.
    pub ssid: String,
    pub mode: Option<String>,
    pub channel: Option<u32>,
    pub rate: Option<String>,
    /// 0-100; `None` when nmcli printed something that is not a number.
    pub signal: Option<u8>,
    pub bars: Option<String>,
    pub security: Option<String>,
}

impl ObservedNetwork {
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }

    /// Whether joining needs a secret. nmcli prints `--` or nothing for open networks.
    pub fn is_secured(&self) -> bool {
        match self.security.as_deref().map(str::trim) {
            None | Some("") | Some("--") => false,
            Some(_) => true,
        }
    }
}

impl FromFields for ObservedNetwork {
    fn from_fields(fields: Fields) -> Self {
        Self {
            ssid: fields.text(0).unwrap_or_default(),
            mode: fields.text(1),
            channel: fields.number(2),
            rate: fields.text(3),
            signal: fields.number(4),
            bars: fields.text(5),
            security: fields.text(6),
        }
    }
}

/// Parameters for joining a visible network or saving a profile for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiRequest {
    pub ssid: String,
    pub password: Option<String>,
    /// Profile name; nmcli defaults to the SSID.
    pub name: Option<String>,
    pub interface: Option<String>,
    /// Keep the profile (and its secret) to the current user.
    pub private: bool,
}

impl WifiRequest {
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            ..Default::default()
        }
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn interface(mut self, interface: Option<String>) -> Self {
        self.interface = interface;
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn profile_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ssid)
    }
}
