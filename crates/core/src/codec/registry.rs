//! Registry of codec plugins, keyed by name and extension.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::aac::AacPlugin;
use super::config::ToolPaths;
use super::context::CodecContext;
use super::flac::FlacPlugin;
use super::mp3::Mp3CbrPlugin;
use super::traits::CodecPlugin;
use crate::process::ProcessRunner;
use crate::tags::TagBridge;

/// Plugins available to the pipeline.
///
/// Built once at startup; share it behind an `Arc` afterwards, at which
/// point it is read-only.
#[derive(Default, Clone)]
pub struct CodecRegistry {
    plugins: BTreeMap<String, Arc<dyn CodecPlugin>>,
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the FLAC, MP3 and AAC plugins.
    pub fn with_builtin(tools: &ToolPaths, tags: Arc<dyn TagBridge>) -> Self {
        let context = CodecContext::new(ProcessRunner::new(tools.nice.clone()), tags);

        let mut registry = Self::new();
        registry.register(Arc::new(FlacPlugin::new(
            context.clone(),
            tools.flac.clone(),
        )));
        registry.register(Arc::new(Mp3CbrPlugin::new(
            context.clone(),
            tools.lame.clone(),
        )));
        registry.register(Arc::new(AacPlugin::new(
            context,
            tools.afconvert.clone(),
            tools.wrapper.clone(),
        )));
        registry
    }

    /// Adds a plugin under its name, returning any plugin it replaced.
    pub fn register(&mut self, plugin: Arc<dyn CodecPlugin>) -> Option<Arc<dyn CodecPlugin>> {
        debug!(codec = plugin.name(), extension = plugin.extension(), "Registered codec");
        self.plugins.insert(plugin.name().to_string(), plugin)
    }

    /// Looks up a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CodecPlugin>> {
        self.plugins.get(&name.to_lowercase()).cloned()
    }

    /// Looks up a plugin by file extension (leading dot optional).
    pub fn by_extension(&self, extension: &str) -> Option<Arc<dyn CodecPlugin>> {
        let extension = extension.trim_start_matches('.');
        self.plugins
            .values()
            .find(|p| p.extension().eq_ignore_ascii_case(extension))
            .cloned()
    }

    /// Looks up the plugin for a file by its extension.
    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn CodecPlugin>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension(ext))
    }

    /// Registered plugin names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    /// Plugins usable as a conversion source.
    pub fn sources(&self) -> Vec<Arc<dyn CodecPlugin>> {
        self.plugins
            .values()
            .filter(|p| p.role().can_be_source())
            .cloned()
            .collect()
    }

    /// Plugins usable as a conversion target.
    pub fn outputs(&self) -> Vec<Arc<dyn CodecPlugin>> {
        self.plugins
            .values()
            .filter(|p| p.role().can_be_output())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
