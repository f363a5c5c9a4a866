use std::collections::BTreeMap;

use crate::errors::{NetpulseError, NetpulseResult};
use crate::models::SpeedtestResult;

/// Tag attached to every point regardless of the configured specification.
pub const NAMESPACE_TAG: &str = "namespace";

const WILDCARD: char = '*';

/// Tag names selectable in the tag specification, besides namespace.
const SELECTABLE_TAGS: [&str; 15] = [
    "isp",
    "interface",
    "internal_ip",
    "interface_mac",
    "vpn_enabled",
    "external_ip",
    "server_id",
    "server_name",
    "server_location",
    "server_country",
    "server_host",
    "server_port",
    "server_ip",
    "speedtest_id",
    "speedtest_url",
];

/// Parsed form of the tag specification string.
///
/// Parsing validates every name up front, so resolving against a result can
/// no longer fail once the configuration has been accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum TagSpec {
    /// No specification configured: only the namespace tag.
    NamespaceOnly,
    /// Specification contained the wildcard marker: every candidate tag.
    All,
    /// Explicit comma-separated selection; namespace is always added on top.
    Named(Vec<String>),
}

impl TagSpec {
    pub fn parse(spec: Option<&str>) -> NetpulseResult<Self> {
        let Some(spec) = spec else {
            return Ok(TagSpec::NamespaceOnly);
        };
        if spec.contains(WILDCARD) {
            return Ok(TagSpec::All);
        }

        let mut names = Vec::new();
        for entry in spec.split(',') {
            let name = entry.trim();
            if name.is_empty() {
                return Err(NetpulseError::Configuration(format!(
                    "empty entry in tag specification: {spec:?}"
                )));
            }
            if name == NAMESPACE_TAG {
                continue;
            }
            if !SELECTABLE_TAGS.contains(&name) {
                return Err(NetpulseError::UnknownTag {
                    name: name.to_string(),
                });
            }
            names.push(name.to_string());
        }
        Ok(TagSpec::Named(names))
    }

    /// Build the tag mapping for one measurement result.
    pub fn resolve(&self, result: &SpeedtestResult, namespace: &str) -> BTreeMap<String, String> {
        match self {
            TagSpec::NamespaceOnly => {
                let mut tags = BTreeMap::new();
                tags.insert(NAMESPACE_TAG.to_string(), namespace.to_string());
                tags
            }
            TagSpec::All => candidate_tags(result, namespace),
            TagSpec::Named(names) => {
                let candidates = candidate_tags(result, namespace);
                let mut tags = BTreeMap::new();
                tags.insert(NAMESPACE_TAG.to_string(), namespace.to_string());
                for name in names {
                    if let Some(value) = candidates.get(name.as_str()) {
                        tags.insert(name.clone(), value.clone());
                    }
                }
                tags
            }
        }
    }
}

/// The full candidate mapping all 16 known tags resolve from.
fn candidate_tags(result: &SpeedtestResult, namespace: &str) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert(NAMESPACE_TAG.to_string(), namespace.to_string());
    tags.insert("isp".to_string(), result.isp.clone());
    tags.insert("interface".to_string(), result.interface.name.clone());
    tags.insert(
        "internal_ip".to_string(),
        result.interface.internal_ip.clone(),
    );
    tags.insert(
        "interface_mac".to_string(),
        result.interface.mac_addr.clone(),
    );
    tags.insert("vpn_enabled".to_string(), vpn_enabled(result).to_string());
    tags.insert(
        "external_ip".to_string(),
        result.interface.external_ip.clone(),
    );
    tags.insert("server_id".to_string(), result.server.id.to_string());
    tags.insert("server_name".to_string(), result.server.name.clone());
    tags.insert(
        "server_location".to_string(),
        result.server.location.clone(),
    );
    tags.insert("server_country".to_string(), result.server.country.clone());
    tags.insert("server_host".to_string(), result.server.host.clone());
    tags.insert("server_port".to_string(), result.server.port.to_string());
    tags.insert("server_ip".to_string(), result.server.ip.clone());
    tags.insert("speedtest_id".to_string(), result.result.id.clone());
    tags.insert("speedtest_url".to_string(), result.result.url.clone());
    tags
}

// Only the literal JSON string "false" counts as disabled; any other value,
// a boolean false included, and an absent field all count as enabled.
fn vpn_enabled(result: &SpeedtestResult) -> &'static str {
    match &result.interface.is_vpn {
        Some(serde_json::Value::String(flag)) if flag == "false" => "false",
        _ => "true",
    }
}
