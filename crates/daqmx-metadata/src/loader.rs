//! Reading catalog files from disk or from the copy compiled into the crate.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::MetadataError;
use crate::schema::CatalogFile;

/// One catalog file's name and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    /// Path relative to the catalog root, used in diagnostics.
    pub name: String,
    /// TOML text.
    pub contents: String,
}

impl CatalogSource {
    /// Wraps in-memory text.
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Parses the text into raw records.
    pub fn parse(&self) -> Result<CatalogFile, MetadataError> {
        toml::from_str(&self.contents).map_err(|e| MetadataError::Parse {
            file: self.name.clone(),
            message: e.to_string(),
        })
    }
}

macro_rules! bundled {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!("../catalog/", $path)))),*]
    };
}

/// The catalog shipped with this crate.
const BUNDLED: &[(&str, &str)] = bundled![
    "classes.toml",
    "enums.toml",
    "errors.toml",
    "collections.toml",
    "attributes/system.toml",
    "attributes/device.toml",
    "attributes/physical_channel.toml",
    "attributes/task.toml",
    "attributes/channel.toml",
    "attributes/ai_channel.toml",
    "attributes/ao_channel.toml",
    "attributes/ci_channel.toml",
    "attributes/co_channel.toml",
    "attributes/di_channel.toml",
    "attributes/do_channel.toml",
    "attributes/timing.toml",
    "attributes/in_stream.toml",
    "attributes/out_stream.toml",
    "attributes/triggers.toml",
    "attributes/scale.toml",
    "attributes/persisted.toml",
];

/// Sources of the bundled catalog.
pub fn bundled_sources() -> Vec<CatalogSource> {
    BUNDLED
        .iter()
        .map(|(name, contents)| CatalogSource::new(*name, *contents))
        .collect()
}

/// Reads every `*.toml` file under `dir`, recursively, in path order.
pub fn read_dir_sources(dir: &Path) -> Result<Vec<CatalogSource>, MetadataError> {
    let mut paths = Vec::new();
    collect_toml_files(dir, &mut paths)?;
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let contents = fs::read_to_string(&path).map_err(|source| MetadataError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let name = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            debug!(file = %name, "read catalog file");
            Ok(CatalogSource::new(name, contents))
        })
        .collect()
}

fn collect_toml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), MetadataError> {
    let io_err = |source| MetadataError::Io {
        path: dir.display().to_string(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_toml_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sources_parse() {
        for source in bundled_sources() {
            source.parse().unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn bundled_list_covers_catalog_directory() {
        let dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/catalog"));
        let on_disk = read_dir_sources(dir).unwrap();
        let mut bundled = bundled_sources();
        bundled.sort_by(|a, b| a.name.cmp(&b.name));

        let names = |sources: &[CatalogSource]| {
            sources.iter().map(|s| s.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&bundled), names(&on_disk));
        for (bundled, on_disk) in bundled.iter().zip(&on_disk) {
            assert_eq!(bundled.contents, on_disk.contents, "{}", bundled.name);
        }
    }

    #[test]
    fn directory_sources_are_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("attributes")).unwrap();
        fs::write(dir.path().join("classes.toml"), "").unwrap();
        fs::write(dir.path().join("attributes/b.toml"), "").unwrap();
        fs::write(dir.path().join("attributes/a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<_> = read_dir_sources(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["attributes/a.toml", "attributes/b.toml", "classes.toml"]);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = CatalogSource::new("broken.toml", "[[errors]\n").parse().unwrap_err();
        assert!(err.to_string().starts_with("failed to parse broken.toml"));
    }
}
