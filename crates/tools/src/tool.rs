//! The tool lifecycle contract.
//!
//! Every tool, whatever its acquisition mechanics, goes through the same
//! three stages in order: bind defaults (pure path computation), materialize
//! (idempotent on-disk staging), report its PATH contribution. The
//! orchestrator in [`crate::builder`] drives the stages and never looks
//! inside a tool beyond this trait.

use std::path::PathBuf;

use toolstage_core::{BuildContext, BuildOptions, Error, Result};
use toolstage_extract::{ExtractRequest, Extractor};

use crate::descriptor::ToolDescriptor;

/// How a tool's executable directory affects the composed PATH.
///
/// Modeled as an explicit three-case result so the orchestrator's
/// aggregation stays exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathContribution {
    /// Nothing: the tool's exact executable path was published directly for
    /// point-use instead.
    None,
    /// A directory placed in normal (prepended) priority.
    Prepend(PathBuf),
    /// A directory forced to the end of the composed PATH, for tools whose
    /// binaries would shadow other required executables.
    Append(PathBuf),
}

/// One tool for one build run.
///
/// Instances are created from the registry per invocation and carry no
/// identity beyond it; persistence lives entirely on disk and is re-derived
/// next run.
pub trait Tool: std::fmt::Debug {
    /// The tool's immutable acquisition facts.
    fn descriptor(&self) -> &ToolDescriptor;

    /// The registry key.
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Compute this tool's concrete on-disk locations from the orchestrator
    /// context, publishing derived paths other tools or the build engine
    /// read verbatim.
    ///
    /// Pure path computation: must be safe to call even when the tool ends
    /// up needing no acquisition, and never fails because a file is missing.
    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()>;

    /// Ensure the tool's expected on-disk layout exists and is verified,
    /// recording whether any new work was performed.
    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()>;

    /// Whether this run performed new acquisition work for the tool.
    fn changed(&self) -> bool;

    /// How this tool affects the composed PATH.
    fn path_contribution(&self) -> PathContribution;
}

/// Bound staging state shared by every tool implementation.
///
/// Filled in during bind from the descriptor plus orchestrator options;
/// `changed` is set by materialize.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    /// This tool's staging directory.
    pub build_dir: PathBuf,
    /// The shared staging root.
    pub tools_root: PathBuf,
    /// Cached archive location, when the tool has an archive.
    pub archive_file: Option<PathBuf>,
    /// Trust existing markers without re-verifying (fast build).
    pub trust_existing: bool,
    /// Set by materialize: new work was performed this run.
    pub changed: bool,
}

impl Stage {
    /// Bind default locations for a descriptor.
    #[must_use]
    pub fn bind(desc: &ToolDescriptor, opts: &BuildOptions) -> Self {
        Self {
            build_dir: desc.build_dir(opts),
            tools_root: opts.tools_root_dir.clone(),
            archive_file: desc.archive_path(opts),
            trust_existing: opts.fast_build,
            changed: false,
        }
    }

    /// Request extracting into the shared staging root, expanding to the
    /// descriptor's directory part. Used by archives that carry their own
    /// top-level directory.
    pub fn root_request(&self, desc: &ToolDescriptor, check_file: PathBuf) -> Result<ExtractRequest> {
        let mut req = self.request(desc, self.tools_root.clone(), check_file)?;
        if let Some(dir_part) = desc.dir_part {
            req = req.with_dir_part(dir_part);
        }
        Ok(req)
    }

    /// Request extracting directly into this tool's staging directory. Used
    /// by archives without a top-level directory and single-file payloads.
    pub fn dir_request(&self, desc: &ToolDescriptor, check_file: PathBuf) -> Result<ExtractRequest> {
        self.request(desc, self.build_dir.clone(), check_file)
    }

    fn request(
        &self,
        desc: &ToolDescriptor,
        dest_root: PathBuf,
        check_file: PathBuf,
    ) -> Result<ExtractRequest> {
        let archive = self.archive_file.clone().ok_or_else(|| {
            Error::configuration(format!("tool '{}' has no archive configured", desc.name))
        })?;

        let mut req = ExtractRequest::new(archive, dest_root, check_file)
            .with_trust_existing(self.trust_existing);
        if let Some(url) = desc.archive_url {
            req = req.with_url(url);
        }
        if let Some(sha256) = desc.sha256 {
            req = req.with_sha256(sha256);
        }
        Ok(req)
    }

    /// Ensure the staging directory exists for tools with no archive.
    ///
    /// Creating it counts as new work; existence is a no-op. The directory
    /// is the marker fast builds key off.
    pub fn ensure_marker_dir(&mut self) -> Result<()> {
        if !self.build_dir.exists() {
            std::fs::create_dir_all(&self.build_dir)?;
            self.changed = true;
        }
        Ok(())
    }
}
