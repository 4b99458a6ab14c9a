/*!
 * Saved connection profiles
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parse::{is_uuid, Fields, FromFields};

pub const CONNECTION_FIELDS: &str = "NAME,UUID,TYPE,DEVICE";

/// What nmcli prints in the DEVICE column of an inactive profile.
pub const NO_DEVICE: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredConnection {
    pub name: String,
    pub uuid: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub device: Option<String>,
    pub connected: bool,
}

impl ConfiguredConnection {
    /// Most specific handle nmcli accepts for this profile.
    pub fn id(&self) -> ConnectionId {
        match &self.uuid {
            Some(uuid) if is_uuid(uuid) => ConnectionId::Uuid(uuid.clone()),
            _ => ConnectionId::Name(self.name.clone()),
        }
    }

    /// Bound device, if any.
    pub fn active_device(&self) -> Option<&str> {
        self.device.as_deref().filter(|device| *device != NO_DEVICE)
    }
}

impl FromFields for ConfiguredConnection {
    fn from_fields(fields: Fields) -> Self {
        let device = fields.text(3);
        let connected = device.as_deref() != Some(NO_DEVICE);
        Self {
            name: fields.text(0).unwrap_or_default(),
            uuid: fields.text(1),
            kind: fields.text(2),
            device,
            connected,
        }
    }
}

/// How a connection is addressed on the nmcli command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionId {
    Name(String),
    Uuid(String),
}

impl ConnectionId {
    /// Classify a free-form identifier by its shape.
    pub fn parse(id: &str) -> Self {
        if is_uuid(id) {
            ConnectionId::Uuid(id.to_string())
        } else {
            ConnectionId::Name(id.to_string())
        }
    }

    /// Selector keyword nmcli expects before the value.
    pub fn selector(&self) -> &'static str {
        match self {
            ConnectionId::Name(_) => "id",
            ConnectionId::Uuid(_) => "uuid",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ConnectionId::Name(value) | ConnectionId::Uuid(value) => value,
        }
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// `nmcli connection show <id>` as a flat field map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetail {
    pub fields: BTreeMap<String, String>,
}

impl ConnectionDetail {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ConnectionDetail {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_detail, parse_tabular};

    const LISTING: &str = "\
        Foobar:12c8b6a5-31d1-4ea8-a1af-b541da345df1:802-11-wireless:--\n\
        LINKGEAR11:1484d982-bd6e-4e56-a4a0-df4c10414762:802-11-wireless:wlp2s0\n";

    #[test]
    fn connected_follows_device() {
        let conns: Vec<ConfiguredConnection> = parse_tabular(LISTING);
        assert_eq!(conns.len(), 2);
        assert!(!conns[0].connected);
        assert_eq!(conns[0].active_device(), None);
        assert!(conns[1].connected);
        assert_eq!(conns[1].active_device(), Some("wlp2s0"));
        assert_eq!(conns[1].kind.as_deref(), Some("802-11-wireless"));
    }

    #[test]
    fn missing_device_counts_as_connected() {
        let conns: Vec<ConfiguredConnection> =
            parse_tabular("Foobar:12c8b6a5-31d1-4ea8-a1af-b541da345df1:802-11-wireless");
        assert_eq!(conns[0].device, None);
        assert!(conns[0].connected);
        assert_eq!(conns[0].active_device(), None);

        let conns: Vec<ConfiguredConnection> = parse_tabular("Foobar:not-a-uuid");
        assert!(conns[0].connected);
        assert_eq!(conns[0].id(), ConnectionId::Name("Foobar".into()));
    }

    #[test]
    fn id_prefers_uuid() {
        let conns: Vec<ConfiguredConnection> = parse_tabular(LISTING);
        assert_eq!(
            conns[0].id(),
            ConnectionId::Uuid("12c8b6a5-31d1-4ea8-a1af-b541da345df1".into())
        );
    }

    #[test]
    fn connection_id_selector() {
        assert_eq!(ConnectionId::parse("Foobar").selector(), "id");
        assert_eq!(
            ConnectionId::parse("1914bb0c-fa13-4d9d-befc-f3db3c96f0bb").selector(),
            "uuid"
        );
        assert_eq!(ConnectionId::parse("Foobar").to_string(), "Foobar");
    }

    #[test]
    fn detail_wraps_parsed_block() {
        let detail = ConnectionDetail::from(parse_detail(
            "connection.id:                          Foobar\n\
             connection.interface-name:              --\n\
             connection.autoconnect:                 yes\n",
        ));
        assert_eq!(detail.get("connection.id"), Some("Foobar"));
        assert_eq!(detail.get("connection.interface-name"), Some("--"));
        assert_eq!(detail.len(), 3);
    }
}
