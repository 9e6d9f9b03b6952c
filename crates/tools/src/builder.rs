//! Environment assembly for a build invocation.
//!
//! The [`Builder`] resolves every requested tool up front, then drives each
//! through its lifecycle in request order and folds the results into a
//! [`ToolEnvironment`]: the PATH segments to place ahead of and behind the
//! inherited search path, plus one build-wide change flag.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use toolstage_core::{BuildContext, BuildOptions, Result};
use toolstage_extract::Extractor;

use crate::registry::ToolRegistry;
use crate::tool::PathContribution;

/// The assembled result of one acquisition run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolEnvironment {
    prepend: Vec<PathBuf>,
    append: Vec<PathBuf>,
    changed: bool,
}

impl ToolEnvironment {
    /// Directories to place ahead of the inherited search path, in tool
    /// request order.
    #[must_use]
    pub fn prepend_paths(&self) -> &[PathBuf] {
        &self.prepend
    }

    /// Directories forced behind the inherited search path.
    #[must_use]
    pub fn append_paths(&self) -> &[PathBuf] {
        &self.append
    }

    /// Whether any tool performed new acquisition work this run.
    ///
    /// Opaque to callers beyond its boolean meaning; the build engine uses
    /// it to decide whether downstream state can be trusted.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Compose the final search path: prepended segments, then the inherited
    /// path, then appended segments.
    pub fn compose_path(&self, inherited: Option<&OsStr>) -> Result<OsString> {
        let mut segments = self.prepend.clone();
        if let Some(path) = inherited {
            segments.extend(env::split_paths(path));
        }
        segments.extend(self.append.iter().cloned());
        env::join_paths(segments)
            .map_err(|e| toolstage_core::Error::configuration(format!("invalid PATH segment: {e}")))
    }
}

/// Drives tool acquisition for one build invocation.
#[derive(Debug)]
pub struct Builder {
    ctx: BuildContext,
}

impl Builder {
    /// Create a builder over fresh orchestrator state.
    #[must_use]
    pub fn new(opts: BuildOptions) -> Self {
        Self {
            ctx: BuildContext::new(opts),
        }
    }

    /// Shared orchestrator state, including paths tools published.
    #[must_use]
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Acquire every named tool in order and assemble the environment.
    ///
    /// All names are resolved against the registry before any tool is bound
    /// or any disk or network work starts, so a misspelled name fails the
    /// run immediately. Tools are then processed strictly sequentially in
    /// the order given.
    pub fn assemble(
        &mut self,
        registry: &ToolRegistry,
        names: &[&str],
        extractor: &dyn Extractor,
    ) -> Result<ToolEnvironment> {
        let mut tools = Vec::with_capacity(names.len());
        for name in names {
            tools.push(registry.create(name)?);
        }

        let mut env = ToolEnvironment::default();
        for tool in &mut tools {
            debug!(tool = tool.name(), "Acquiring tool");
            tool.bind(&mut self.ctx)?;
            tool.materialize(extractor)?;
            if tool.changed() {
                info!(tool = tool.name(), "Tool staged anew");
                env.changed = true;
            }
            match tool.path_contribution() {
                PathContribution::None => {}
                PathContribution::Prepend(dir) => env.prepend.push(dir),
                PathContribution::Append(dir) => env.append.push(dir),
            }
        }

        info!(
            tools = names.len(),
            changed = env.changed,
            "Tool environment assembled"
        );
        Ok(env)
    }
}
