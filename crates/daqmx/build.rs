//! Generates the attribute accessors, enums, status codes and collections
//! into `OUT_DIR` from the metadata catalog.
//!
//! Set `DAQMX_METADATA_DIR` to build against a catalog other than the one
//! bundled with `daqmx-metadata`.

use std::env;
use std::path::{Path, PathBuf};

use daqmx_codegen::{CodegenConfig, Generator};
use daqmx_metadata::MetadataStore;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=codegen.toml");
    println!("cargo:rerun-if-env-changed=DAQMX_METADATA_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        panic!("OUT_DIR is not set; build.rs must run under cargo");
    };

    let store = match env::var_os("DAQMX_METADATA_DIR") {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            println!("cargo:rerun-if-changed={}", dir.display());
            MetadataStore::from_dir(&dir)
        }
        None => MetadataStore::bundled(),
    }
    .unwrap_or_else(|e| panic!("metadata catalog is invalid: {e}"));

    let config = CodegenConfig::load(Path::new("codegen.toml"))
        .unwrap_or_else(|e| panic!("codegen.toml is invalid: {e}"));

    Generator::new(&store, &config)
        .write_to(&out_dir)
        .unwrap_or_else(|e| panic!("code generation failed: {e}"));
}
