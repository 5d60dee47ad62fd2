//! Structures deserialized from `dgn_manifest.json`.
use serde::Deserialize;

//==================================================================================MANIFEST
#[derive(Debug, Deserialize)]
/// Manifest describing the named DGN table.
pub(crate) struct Manifest {
    pub(crate) dgns: Vec<DgnEntry>,
}

#[derive(Debug, Deserialize, Clone)]
/// One named Data Group Number.
pub(crate) struct DgnEntry {
    /// Human readable name, e.g. `"Product Identification"`.
    pub(crate) name: String,
    /// Hexadecimal DGN value, e.g. `"0FEEB"`.
    pub(crate) dgn: String,
    /// Default transmit priority.
    #[serde(default)]
    pub(crate) priority: Option<u8>,
    /// Free-form description copied into the generated docs.
    #[serde(default)]
    pub(crate) description: Option<String>,
}

//==================================================================================RESOLVED
#[derive(Debug, Clone, PartialEq)]
/// Manifest entry once validated and normalized.
pub(crate) struct ResolvedDgn {
    pub(crate) const_name: String,
    pub(crate) label: String,
    pub(crate) value: u32,
    pub(crate) priority: u8,
    pub(crate) description: String,
}
