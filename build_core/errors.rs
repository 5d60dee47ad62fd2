//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, validation, code generation).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the manifest.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// DGN string is not hexadecimal or exceeds 17 bits.
    #[error("[MESSAGE]:Invalid DGN value [NAME]:{name} [VALUE]:{value}")]
    InvalidDgn { name: String, value: String },

    /// Priority does not fit in 3 bits.
    #[error("[MESSAGE]:Invalid priority [NAME]:{name} [PRIORITY]:{priority}")]
    InvalidPriority { name: String, priority: u8 },

    /// Two manifest entries share a name or a value.
    #[error("[MESSAGE]:Duplicate DGN entry [NAME]:{name}")]
    DuplicateDgn { name: String },
}
