//! Plugin host: ordered, sequential invocation of hook functions at the
//! named phases of a bundle call.
//!
//! Recognized phases are `preTransform` and `postTransform` (per module,
//! around the edit application) and `bundle` (once, over the assembled
//! output). Hooks may be synchronous or asynchronous behind one boxed-future
//! signature; the host awaits each before invoking the next, so plugin
//! composition is strictly sequential and deterministic.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::error::BundleError;
use crate::module::ExportsInfo;

/// The outcome of one hook invocation: the (possibly rewritten) text, or a
/// reason the host wraps into a [`BundleError::Plugin`].
pub type HookResult = Result<String, String>;

/// Boxed future returned by every hook, so synchronous and asynchronous
/// plugin implementations share a signature.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = HookResult> + Send + 'a>>;

/// Read-only view of a module handed to the per-module hooks.
pub struct ModuleMeta<'a> {
    /// Canonical key (absolute path).
    pub key: &'a Path,
    /// The key as it appears in the emitted module table.
    pub display_key: &'a str,
    /// Discovery-order id.
    pub id: usize,
    /// The module's exports descriptor.
    pub exports: &'a ExportsInfo,
}

/// A bundling plugin. Every hook defaults to identity, so implementations
/// override only the phases they participate in.
///
/// Offset contract: `pre_transform` runs before the positional edits are
/// applied, and those edits are expressed against the original source. A
/// hook that shifts bytes under an import/export statement span yields
/// undefined output; rewrites must stay outside those spans.
pub trait Plugin: Send + Sync {
    /// Name used in diagnostics and [`BundleError::Plugin`].
    fn name(&self) -> &str;

    /// Runs over a module's source before edits are applied.
    fn pre_transform<'a>(&'a self, text: String, _module: &'a ModuleMeta<'a>) -> HookFuture<'a> {
        Box::pin(async move { Ok(text) })
    }

    /// Runs over a module's body after edits and trailing assignments.
    fn post_transform<'a>(&'a self, text: String, _module: &'a ModuleMeta<'a>) -> HookFuture<'a> {
        Box::pin(async move { Ok(text) })
    }

    /// Runs once over the fully assembled bundle text.
    fn bundle<'a>(&'a self, text: String) -> HookFuture<'a> {
        Box::pin(async move { Ok(text) })
    }
}

/// Applies each plugin's hook in configured order, feeding every plugin's
/// output to the next. The plugin list is fixed for the duration of one
/// bundle call.
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginHost {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    pub fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub async fn pre_transform(
        &self,
        mut text: String,
        module: &ModuleMeta<'_>,
    ) -> Result<String, BundleError> {
        for plugin in &self.plugins {
            text = plugin
                .pre_transform(text, module)
                .await
                .map_err(|reason| plugin_error(plugin.as_ref(), "preTransform", reason))?;
        }
        Ok(text)
    }

    pub async fn post_transform(
        &self,
        mut text: String,
        module: &ModuleMeta<'_>,
    ) -> Result<String, BundleError> {
        for plugin in &self.plugins {
            text = plugin
                .post_transform(text, module)
                .await
                .map_err(|reason| plugin_error(plugin.as_ref(), "postTransform", reason))?;
        }
        Ok(text)
    }

    pub async fn bundle(&self, mut text: String) -> Result<String, BundleError> {
        for plugin in &self.plugins {
            text = plugin
                .bundle(text)
                .await
                .map_err(|reason| plugin_error(plugin.as_ref(), "bundle", reason))?;
        }
        Ok(text)
    }
}

fn plugin_error(plugin: &dyn Plugin, phase: &'static str, reason: String) -> BundleError {
    BundleError::Plugin {
        plugin: plugin.name().to_owned(),
        phase,
        reason,
    }
}
