use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const STATE_ACTIVE: &str = "active";
pub const STATE_UPGRADED: &str = "upgraded";
pub const HEALTH_HEALTHY: &str = "healthy";

/// Cattle sends `null` for empty collections as often as it omits them.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Envelope used by every Cattle list endpoint.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Project (environment) the service belongs to.
    pub account_id: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_config: Option<Map<String, Value>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub secondary_launch_configs: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_config: Option<LbConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// `(accountId, id)`, the pair every per-service endpoint is keyed by.
    pub fn ids(&self) -> (&str, &str) {
        (&self.account_id, &self.id)
    }

    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn image(&self) -> Option<&str> {
        self.launch_config
            .as_ref()
            .and_then(|lc| lc.get("imageUuid"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LbConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub port_rules: Vec<PortRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortRule {
    pub source_port: u16,
    #[serde(default)]
    pub path: Option<String>,
    /// `None` for rules that route by selector instead of a service.
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PortRule {
    /// An absent path only matches a rule without a path.
    pub fn matches(&self, source_port: u16, path: Option<&str>) -> bool {
        self.source_port == source_port && self.path.as_deref() == path
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Stack {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
pub struct EndpointReport {
    pub url: String,
    pub source: String,
    pub access_key: String,
}

#[derive(Serialize)]
pub struct ServiceRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub state: &'a str,
    pub health: &'a str,
    pub image: &'a str,
}

impl<'a> From<&'a Service> for ServiceRow<'a> {
    fn from(s: &'a Service) -> Self {
        ServiceRow {
            id: &s.id,
            name: &s.name,
            state: &s.state,
            health: s.health_state.as_deref().unwrap_or("n/a"),
            image: s.image().unwrap_or("-"),
        }
    }
}
