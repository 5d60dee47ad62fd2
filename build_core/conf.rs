//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest listing every DGN the stack knows by name.
pub(crate) const DGN_MANIFEST_PATH: &str = "build_core/var/dgn_manifest.json";
/// Environment variable overriding the manifest path.
pub(crate) const DGN_MANIFEST_ENV: &str = "RVC_STACK_DGN_MANIFEST_PATH";
/// Generated DGN file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_DGN_FILE_NAME: &str = "generated_dgns.rs";
/// Largest value a DGN can take (data page + PDU format + PDU specific).
pub(crate) const MAX_DGN: u32 = 0x1_FFFF;
/// Priority used when the manifest does not provide one.
pub(crate) const DEFAULT_PRIORITY: u8 = 6;
