//! Cargo build script: generates the named RV-C / J1939 DGN table.

mod build_core;
use crate::build_core::{conf::*, domain::Manifest, errors::BuildError, gen_dgns::run_dgns_gen};

use std::fs;
use std::path::PathBuf;

// The DGN space is declared in JSON (`build_core/var/dgn_manifest.json`) and turned into
// `pub const` items plus a sorted lookup table. `src/protocol/dgn/mod.rs` pulls the
// generated file in with `include!`.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", DGN_MANIFEST_PATH);
    println!("cargo:rerun-if-env-changed={}", DGN_MANIFEST_ENV);

    // 1. Locate the manifest.
    // Priority order:
    //   1. RVC_STACK_DGN_MANIFEST_PATH environment variable
    //   2. Default manifest shipped with the crate
    let default_manifest_path = PathBuf::from(DGN_MANIFEST_PATH);
    let manifest_path = match std::env::var(DGN_MANIFEST_ENV).ok().map(PathBuf::from) {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom DGN manifest from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom manifest path specified but file not found: {:?}",
                path
            );
            println!("cargo:warning=Falling back to the default DGN manifest");
            default_manifest_path
        }
        None => default_manifest_path,
    };

    // 2. Parse and generate.
    let manifest_string =
        fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
            path: manifest_path.clone(),
            source: e,
        })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;
    let code = run_dgns_gen(&manifest)?;

    // 3. Write into `OUT_DIR`.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let dgn_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_DGN_FILE_NAME);
    fs::write(&dgn_file_path, code).map_err(|e| BuildError::WriteFile {
        path: dgn_file_path,
        source: e,
    })?;

    Ok(())
}
