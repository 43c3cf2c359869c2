use std::collections::BTreeMap;

use serde::de::{Deserialize, DeserializeOwned, Deserializer};

/// The subset of a `podman inspect` / `docker inspect` document the inventory needs.
///
/// Every field is optional, runtimes differ in what they report and missing data is
/// resolved by the host record extractor. A field of the wrong type decodes as missing
/// instead of rejecting the whole document.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NetworkSettings {
    #[serde(rename = "IPAddress", default, deserialize_with = "lenient")]
    pub ip_address: Option<String>,
    /// Port table keyed by `<port>/<proto>`.
    ///
    /// Kept in a [`BTreeMap`], so iteration is sorted by key and identical between runs.
    /// Runtimes report `null` for exposed ports without a host binding.
    #[serde(rename = "Ports", default, deserialize_with = "lenient")]
    pub ports: Option<BTreeMap<String, Option<Vec<PortBinding>>>>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PortBinding {
    #[serde(rename = "HostPort", default, deserialize_with = "lenient")]
    pub host_port: Option<String>,
}

/// Decodes `T`, mapping a value of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            log::debug!("ignoring malformed inspect field: {}", err);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_docker_document() {
        let raw = r#"[{
            "Id": "f00dfeed",
            "Name": "/web",
            "NetworkSettings": {
                "IPAddress": "172.17.0.2",
                "Ports": {
                    "22/tcp": [{"HostIp": "0.0.0.0", "HostPort": "2222"}],
                    "80/tcp": null
                }
            }
        }]"#;

        let docs: Vec<InspectDocument> = serde_json::from_str(raw).unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.name.as_deref(), Some("/web"));
        let net = doc.network_settings.as_ref().unwrap();
        assert_eq!(net.ip_address.as_deref(), Some("172.17.0.2"));
        let ports = net.ports.as_ref().unwrap();
        assert!(ports["80/tcp"].is_none());
        assert_eq!(
            ports["22/tcp"].as_ref().unwrap()[0].host_port.as_deref(),
            Some("2222")
        );
    }

    #[test]
    fn test_decode_sparse_document() {
        let raw = r#"[{"Name": null, "NetworkSettings": {"Ports": null}}]"#;

        let docs: Vec<InspectDocument> = serde_json::from_str(raw).unwrap();
        assert!(docs[0].name.is_none());
        let net = docs[0].network_settings.as_ref().unwrap();
        assert!(net.ip_address.is_none());
        assert!(net.ports.is_none());
    }

    #[test]
    fn test_decode_wrongly_typed_fields() {
        let raw = r#"[{
            "Name": 42,
            "NetworkSettings": {
                "IPAddress": 5,
                "Ports": {"22/tcp": [{"HostIp": "0.0.0.0", "HostPort": 2222}]}
            }
        }]"#;

        let docs: Vec<InspectDocument> = serde_json::from_str(raw).unwrap();
        assert!(docs[0].name.is_none());
        let net = docs[0].network_settings.as_ref().unwrap();
        assert!(net.ip_address.is_none());
        let ports = net.ports.as_ref().unwrap();
        assert!(ports["22/tcp"].as_ref().unwrap()[0].host_port.is_none());
    }

    #[test]
    fn test_decode_wrongly_typed_sections() {
        let raw = r#"[{"Name": "/web", "NetworkSettings": {"Ports": ["22/tcp"]}}]"#;
        let docs: Vec<InspectDocument> = serde_json::from_str(raw).unwrap();
        assert_eq!(docs[0].name.as_deref(), Some("/web"));
        assert!(docs[0].network_settings.as_ref().unwrap().ports.is_none());

        let raw = r#"[{"Name": "/web", "NetworkSettings": "bridge"}]"#;
        let docs: Vec<InspectDocument> = serde_json::from_str(raw).unwrap();
        assert!(docs[0].network_settings.is_none());
    }
}
