//! Runs templates over a store and writes or diffs the results.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use daqmx_metadata::MetadataStore;
use similar::TextDiff;
use tracing::{debug, info};

use crate::config::{CodegenConfig, ModuleSpec, Template};
use crate::emit;
use crate::error::CodegenError;
use crate::naming;

/// A generated file that differs from what is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// Unified diff from the on-disk file to the generated one.
    pub diff: String,
}

/// Renders the modules a [`CodegenConfig`] lists.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    store: &'a MetadataStore,
    config: &'a CodegenConfig,
}

impl<'a> Generator<'a> {
    /// Binds a validated store to a config.
    pub fn new(store: &'a MetadataStore, config: &'a CodegenConfig) -> Self {
        Self { store, config }
    }

    /// Renders every module and reads every copy source, keyed by output
    /// path. Output is byte-identical for identical inputs.
    pub fn generate(&self) -> Result<BTreeMap<PathBuf, String>, CodegenError> {
        check_names(self.store)?;

        let mut files = BTreeMap::new();
        for module in &self.config.modules {
            let body = self.render(module)?;
            let text = format!("{}\n\n{body}", self.config.header());
            debug!(output = %module.output.display(), template = module.template.as_str(), "rendered module");
            files.insert(module.output.clone(), text);
        }
        for copy in &self.config.copy {
            let source = self.config.source_path(copy);
            let text = fs::read_to_string(&source).map_err(CodegenError::io(&source))?;
            files.insert(copy.output.clone(), text);
        }
        Ok(files)
    }

    fn render(&self, module: &ModuleSpec) -> Result<String, CodegenError> {
        match module.template {
            Template::Class => {
                let name = module.class.as_deref().ok_or_else(|| {
                    CodegenError::MissingTemplateField {
                        output: module.output.display().to_string(),
                        template: module.template.as_str(),
                        field: "class",
                    }
                })?;
                let class = self.store.class(name).ok_or_else(|| CodegenError::UnknownClass {
                    output: module.output.display().to_string(),
                    class: name.to_string(),
                })?;
                emit::class::render(self.store, class)
            }
            Template::Enums => emit::enums::render(self.store),
            Template::Errors => emit::errors::render(self.store),
            Template::Collections => emit::collections::render(self.store),
        }
    }

    /// Generates into `out`, rewriting only files whose contents changed.
    /// Returns the paths that were written.
    pub fn write_to(&self, out: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let files = self.generate()?;
        let mut written = Vec::new();
        for (relative, text) in &files {
            let path = out.join(relative);
            if fs::read_to_string(&path).is_ok_and(|existing| existing == *text) {
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(CodegenError::io(parent))?;
            }
            fs::write(&path, text).map_err(CodegenError::io(&path))?;
            written.push(path);
        }
        info!(
            out = %out.display(),
            files = files.len(),
            written = written.len(),
            "generation complete"
        );
        Ok(written)
    }

    /// Compares generated output with `out` without writing anything.
    /// Missing files diff against empty text.
    pub fn check(&self, out: &Path) -> Result<Vec<Drift>, CodegenError> {
        let files = self.generate()?;
        let mut drift = Vec::new();
        for (relative, text) in files {
            let path = out.join(&relative);
            let existing = fs::read_to_string(&path).unwrap_or_default();
            if existing == text {
                continue;
            }
            let name = relative.display().to_string();
            let diff = TextDiff::from_lines(&existing, &text)
                .unified_diff()
                .context_radius(3)
                .header(&format!("a/{name}"), &format!("b/{name}"))
                .to_string();
            drift.push(Drift {
                path: relative,
                diff,
            });
        }
        Ok(drift)
    }
}

/// Rejects classes on which two generated or hand-written members would
/// share a name.
pub fn check_names(store: &MetadataStore) -> Result<(), CodegenError> {
    for class in store.classes() {
        let mut names: BTreeMap<String, String> = BTreeMap::new();
        let mut claim = |name: String, origin: String| -> Result<(), CodegenError> {
            if names.contains_key(&name) {
                return Err(CodegenError::NameCollision {
                    location: origin,
                    class: class.name.clone(),
                    name,
                });
            }
            names.insert(name, origin);
            Ok(())
        };

        for method in &class.hand_written {
            claim(method.clone(), format!("{} (hand-written)", class.location()))?;
        }
        if !class.hand_written_struct {
            claim("new".to_string(), class.location())?;
            for param in &class.handle_parameters {
                claim(param.name.clone(), class.location())?;
            }
        }
        for attribute in store.effective_attributes(&class.name) {
            if attribute.access.readable() {
                claim(attribute.name.clone(), attribute.location())?;
            }
            if attribute.access.writable() {
                claim(naming::setter(&attribute.name), attribute.location())?;
            }
            if attribute.resettable {
                claim(naming::resetter(&attribute.name), attribute.location())?;
            }
        }
        for collection in store.collections().filter(|c| c.owner == class.name) {
            if let Some(accessor) = &collection.accessor {
                claim(accessor.clone(), collection.location())?;
            }
        }
    }
    Ok(())
}
