use crate::runtime::InspectDocument;

/// Container port whose host-side mapping becomes the connection port.
pub const SSH_PORT: u16 = 22;

/// Connection fields as reported by the runtime, before fallbacks are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
}

/// Pulls name, address and SSH port out of an inspect document.
///
/// Empty strings are reported as `None`. When several port table keys map container
/// port 22 (e.g. `22/tcp` and `22/udp`) only the first in key order is used, and within
/// it only the first binding.
pub fn extract(document: &InspectDocument) -> ExtractedFields {
    let name = document
        .name
        .as_deref()
        .map(|name| name.strip_prefix('/').unwrap_or(name))
        .filter(|name| !name.is_empty())
        .map(str::to_owned);

    let network = document.network_settings.as_ref();
    let address = network
        .and_then(|net| net.ip_address.as_deref())
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_owned);

    let port = network
        .and_then(|net| net.ports.as_ref())
        .and_then(|ports| {
            ports
                .iter()
                .filter(|(key, _)| container_port(key) == Some(SSH_PORT))
                .find_map(|(_, bindings)| bindings.as_deref().and_then(<[_]>::first))
        })
        .and_then(|binding| binding.host_port.as_deref())
        .and_then(|host_port| match host_port.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(err) => {
                log::debug!("ignoring non-numeric host port {:?}: {}", host_port, err);
                None
            }
        });

    ExtractedFields {
        name,
        address,
        port,
    }
}

/// Parses the numeric prefix of a `<port>/<proto>` key.
fn container_port(key: &str) -> Option<u16> {
    key.split('/').next()?.trim().parse().ok()
}
