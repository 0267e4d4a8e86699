//! Node-configuration payload generation
//!
//! Renders the document the node's install-time agent consumes: flat
//! `key=value` lines under `harvester.*` keys, passed to the installer as
//! boot arguments. Two schema variants exist, selected by the cluster's
//! target version; the dispatch table and both renderers live here.

use crate::error::ConfigError;

/// Join port used by the legacy schema.
const LEGACY_JOIN_PORT: u16 = 8443;

/// Explicit schema marker carried by the current variant.
const CURRENT_SCHEME_VERSION: &str = "1";

/// Install mode for one node. Join is the default: only an Inventory
/// carrying the create-node condition bootstraps a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallMode {
    /// Bootstrap a new cluster on this node
    Create,
    /// Join the cluster at the VIP
    #[default]
    Join,
}

impl InstallMode {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            InstallMode::Create => "create",
            InstallMode::Join => "join",
        }
    }
}

/// Inputs to the payload generator, already flattened out of the
/// Inventory/Cluster pair. Zero values pass through; the builders do not
/// validate, callers are expected to have gated on allocation already.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// URL the installer fetches extra configuration from
    pub config_url: String,
    /// Management interface hardware address
    pub mac_address: String,
    /// Install mode
    pub mode: InstallMode,
    /// Target disk device path
    pub disk: String,
    /// Cluster address (the VIP)
    pub vip: String,
    /// Cluster join token
    pub token: String,
    /// Generated install-time password
    pub password: String,
    /// Assigned static address
    pub address: String,
    /// Netmask for the assigned address
    pub netmask: String,
    /// Default gateway
    pub gateway: String,
    /// DNS servers
    pub nameservers: Vec<String>,
    /// SSH public keys authorized on the node
    pub ssh_keys: Vec<String>,
}

/// Node-config schema variants, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// No explicit schema marker; legacy join port; network block under the
    /// `harvester-mgmt` key
    Legacy,
    /// Carries `scheme_version`; joins over 443; network block under
    /// `management_interface`
    Current,
}

/// Ordered dispatch table: a version maps to the last variant whose
/// threshold it reaches. Unparseable or empty versions fall through to the
/// first entry.
const SCHEMA_VERSIONS: &[((u64, u64), SchemaVariant)] = &[
    ((0, 0), SchemaVariant::Legacy),
    ((1, 1), SchemaVariant::Current),
];

/// Select the schema variant for a target product version string.
pub fn schema_variant_for(version: &str) -> SchemaVariant {
    let parsed = parse_major_minor(version).unwrap_or((0, 0));
    SCHEMA_VERSIONS
        .iter()
        .rev()
        .find(|(threshold, _)| parsed >= *threshold)
        .map_or(SchemaVariant::Legacy, |(_, variant)| *variant)
}

/// Parse "v1.2.3" / "1.2" into a (major, minor) pair. A missing minor
/// counts as zero; anything else unparseable yields None.
fn parse_major_minor(version: &str) -> Option<(u64, u64)> {
    let trimmed = version.trim().trim_start_matches('v');
    let mut parts = trimmed.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// Generate the node-configuration payload for the given target version.
pub fn generate_node_config(version: &str, config: &NodeConfig) -> Result<String, ConfigError> {
    schema_variant_for(version).render(config)
}

impl SchemaVariant {
    /// Render the payload in this schema variant.
    pub fn render(self, config: &NodeConfig) -> Result<String, ConfigError> {
        let mut doc = Document::default();

        if self == SchemaVariant::Current {
            doc.push("scheme_version", CURRENT_SCHEME_VERSION)?;
        }

        doc.push("harvester.install.automatic", "true")?;
        doc.push("harvester.install.mode", config.mode.as_str())?;
        if !config.disk.is_empty() {
            doc.push("harvester.install.device", &config.disk)?;
        }

        match config.mode {
            InstallMode::Join => {
                doc.push("harvester.server_url", &self.join_url(&config.vip))?;
            }
            InstallMode::Create => {
                doc.push("harvester.install.vip", &config.vip)?;
                doc.push("harvester.install.vip_mode", "static")?;
            }
        }

        let network_key = match self {
            SchemaVariant::Legacy => "harvester.install.networks.harvester-mgmt",
            SchemaVariant::Current => "harvester.install.management_interface",
        };
        doc.push(&format!("{network_key}.method"), "static")?;
        doc.push(&format!("{network_key}.ip"), &config.address)?;
        doc.push(&format!("{network_key}.subnet_mask"), &config.netmask)?;
        doc.push(&format!("{network_key}.gateway"), &config.gateway)?;
        doc.push(&format!("{network_key}.default_route"), "true")?;
        doc.push(
            &format!("{network_key}.interfaces"),
            &format!("hwAddr:{}", config.mac_address),
        )?;

        if !config.config_url.is_empty() {
            doc.push("harvester.install.config_url", &config.config_url)?;
        }
        doc.push("harvester.token", &config.token)?;
        doc.push("harvester.os.password", &config.password)?;
        doc.push("harvester.os.dns_nameservers", &config.nameservers.join(","))?;
        doc.push_key_list("harvester.os.ssh_authorized_keys", &config.ssh_keys)?;

        Ok(doc.render())
    }

    /// URL joining nodes dial. 443 is implied by the scheme in the current
    /// variant, so it carries no explicit port.
    fn join_url(self, vip: &str) -> String {
        match self {
            SchemaVariant::Legacy => format!("https://{vip}:{LEGACY_JOIN_PORT}/"),
            SchemaVariant::Current => format!("https://{vip}/"),
        }
    }
}

/// Accumulates the flat `key=value` lines of one payload.
#[derive(Debug, Default)]
struct Document {
    lines: Vec<String>,
}

impl Document {
    fn push(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        Self::check_encodable(key, value)?;
        self.lines.push(format!("{key}={value}"));
        Ok(())
    }

    /// Render a list value as an escaped-quoted YAML-style item list, e.g.
    /// `key=\"- a \n- b \"`. Omitted entirely when the list is empty.
    fn push_key_list(&mut self, key: &str, items: &[String]) -> Result<(), ConfigError> {
        if items.is_empty() {
            return Ok(());
        }
        for item in items {
            Self::check_encodable(key, item)?;
        }
        let body = items
            .iter()
            .map(|item| format!("- {item} "))
            .collect::<Vec<_>>()
            .join("\\n");
        self.lines.push(format!("{key}=\\\"{body}\\\""));
        Ok(())
    }

    fn check_encodable(key: &str, value: &str) -> Result<(), ConfigError> {
        if value.contains(['"', '\n']) {
            return Err(ConfigError::Unencodable(key.to_string()));
        }
        Ok(())
    }

    fn render(self) -> String {
        self.lines.join("\n")
    }
}
