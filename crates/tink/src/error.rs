//! Builder error types.

use thiserror::Error;

/// Node-config rendering failures.
///
/// The generator performs no I/O; the only way it can fail is a value that
/// the flat `key=value` document format cannot carry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A value contains characters (quote, newline) the document cannot encode
    #[error("value for {0} contains characters the node-config document cannot carry")]
    Unencodable(String),
}

/// Descriptor generation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// Node-config rendering failed while building a Hardware descriptor
    #[error("generating node config for inventory {name}: {source}")]
    NodeConfig {
        /// Inventory the descriptor was being built for
        name: String,
        /// Underlying rendering failure
        #[source]
        source: ConfigError,
    },
}
