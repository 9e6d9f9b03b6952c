//! End-to-end acquisition runs over the built-in tool set, with the
//! extraction service replaced by a recorder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use toolstage_core::{BuildOptions, Error, Result};
use toolstage_extract::{ExtractRequest, Extractor};
use toolstage_tools::{Builder, ToolRegistry};

/// Records every request and answers with a per-archive canned result.
#[derive(Default)]
struct MockExtractor {
    requests: RefCell<Vec<ExtractRequest>>,
    changed_archives: Vec<&'static str>,
}

impl MockExtractor {
    fn reporting_changed(archives: &[&'static str]) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            changed_archives: archives.to_vec(),
        }
    }

    fn requests(&self) -> Vec<ExtractRequest> {
        self.requests.borrow().clone()
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, req: &ExtractRequest) -> Result<bool> {
        self.requests.borrow_mut().push(req.clone());
        Ok(self
            .changed_archives
            .iter()
            .any(|name| *name == req.archive_file_name()))
    }
}

struct Host {
    _temp: TempDir,
    opts: BuildOptions,
}

/// A workspace with msys and interpreter roots provisioned, so the
/// host-provided tools pass their existence checks.
fn provisioned_host() -> Host {
    let temp = TempDir::new().unwrap();
    let msys = temp.path().join("msys64");
    fs::create_dir_all(msys.join("usr").join("bin")).unwrap();
    let python = temp.path().join("python37");
    fs::create_dir_all(&python).unwrap();

    let opts = BuildOptions::new(temp.path().join("work"))
        .with_msys_dir(msys)
        .with_python_dir(python);
    Host { _temp: temp, opts }
}

const ALL_TOOLS: [&str; 10] = [
    "cmake", "meson", "msys2", "nasm", "ninja", "nuget", "perl", "python", "yasm", "go",
];

#[test]
fn test_unknown_tool_fails_before_any_extraction() {
    let host = provisioned_host();
    let extractor = MockExtractor::default();
    let mut builder = Builder::new(host.opts);

    let err = builder
        .assemble(
            &ToolRegistry::builtin(),
            &["cmake", "gperf", "ninja"],
            &extractor,
        )
        .unwrap_err();

    assert!(matches!(err, Error::UnknownTool(name) if name == "gperf"));
    assert!(
        extractor.requests().is_empty(),
        "lookup failure must precede acquisition"
    );
}

#[test]
fn test_full_run_publishes_paths_and_orders_search_path() {
    let host = provisioned_host();
    let work = host.opts.tools_root_dir.parent().unwrap().to_path_buf();
    let extractor = MockExtractor::default();
    let mut builder = Builder::new(host.opts.clone());

    let env = builder
        .assemble(&ToolRegistry::builtin(), &ALL_TOOLS, &extractor)
        .unwrap();

    // Tools invoked by exact path get published on the context.
    let ctx = builder.context();
    assert_eq!(
        ctx.meson,
        Some(work.join("tools/meson-0.46.1/meson.py"))
    );
    assert_eq!(ctx.nuget, Some(work.join("tools/nuget/nuget.exe")));
    assert_eq!(ctx.perl_dir, Some(work.join("tools/perl/x64")));

    // Prepends come in request order; msys2 is the only append.
    assert_eq!(
        env.prepend_paths(),
        [
            work.join("tools/cmake-3.7.2-win64-x64/bin"),
            work.join("tools/nasm-2.13.03"),
            work.join("tools/ninja"),
            work.join("tools/perl/x64/bin"),
            host.opts.python_dir.clone().unwrap(),
            work.join("tools/yasm"),
            work.join("tools/go/go/bin"),
        ]
    );
    assert_eq!(
        env.append_paths(),
        [host.opts.msys_dir.unwrap().join("usr/bin")]
    );

    // Only the eight downloadable tools reach the extraction service.
    assert_eq!(extractor.requests().len(), 8);
}

#[test]
fn test_composed_path_puts_shadowing_tool_last() {
    let host = provisioned_host();
    let extractor = MockExtractor::default();
    let mut builder = Builder::new(host.opts.clone());

    let env = builder
        .assemble(&ToolRegistry::builtin(), &["cmake", "msys2"], &extractor)
        .unwrap();

    let inherited = std::env::join_paths([PathBuf::from("/usr/bin")]).unwrap();
    let composed = env.compose_path(Some(inherited.as_os_str())).unwrap();
    let parts: Vec<PathBuf> = std::env::split_paths(&composed).collect();

    assert_eq!(parts[0], host.opts.tools_root_dir.join("cmake-3.7.2-win64-x64/bin"));
    assert_eq!(parts[1], PathBuf::from("/usr/bin"));
    assert_eq!(
        parts.last().unwrap(),
        &host.opts.msys_dir.unwrap().join("usr/bin")
    );
}

#[test]
fn test_change_flag_aggregates_across_run() {
    let host = provisioned_host();

    let quiet = MockExtractor::default();
    let mut builder = Builder::new(host.opts.clone());
    let env = builder
        .assemble(&ToolRegistry::builtin(), &["cmake", "ninja", "go"], &quiet)
        .unwrap();
    assert!(!env.changed(), "no new work anywhere means an unchanged run");

    let one_changed = MockExtractor::reporting_changed(&["ninja-win-1.8.2.zip"]);
    let mut builder = Builder::new(host.opts);
    let env = builder
        .assemble(
            &ToolRegistry::builtin(),
            &["cmake", "ninja", "go"],
            &one_changed,
        )
        .unwrap();
    assert!(env.changed(), "one restaged tool changes the run");
}

#[test]
fn test_marker_creation_counts_as_change() {
    let host = provisioned_host();
    let extractor = MockExtractor::default();

    let mut builder = Builder::new(host.opts.clone());
    let env = builder
        .assemble(&ToolRegistry::builtin(), &["msys2", "python"], &extractor)
        .unwrap();
    assert!(env.changed(), "first run creates the marker directories");

    let mut builder = Builder::new(host.opts);
    let env = builder
        .assemble(&ToolRegistry::builtin(), &["msys2", "python"], &extractor)
        .unwrap();
    assert!(!env.changed(), "markers already exist on the second run");
}

#[test]
fn test_msys2_without_configured_root_fails() {
    let temp = TempDir::new().unwrap();
    let opts = BuildOptions::new(temp.path().join("work"));
    let mut builder = Builder::new(opts);

    let err = builder
        .assemble(&ToolRegistry::builtin(), &["msys2"], &MockExtractor::default())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_msys2_with_missing_root_fails() {
    let temp = TempDir::new().unwrap();
    let opts = BuildOptions::new(temp.path().join("work"))
        .with_msys_dir(temp.path().join("nonexistent"));
    let mut builder = Builder::new(opts);

    let err = builder
        .assemble(&ToolRegistry::builtin(), &["msys2"], &MockExtractor::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingResource { tool, .. } if tool == "msys2"));
}

#[test]
fn test_python_override_must_exist() {
    let temp = TempDir::new().unwrap();
    let opts = BuildOptions::new(temp.path().join("work"))
        .with_python_dir(temp.path().join("nonexistent"));
    let mut builder = Builder::new(opts);

    let err = builder
        .assemble(&ToolRegistry::builtin(), &["python"], &MockExtractor::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingResource { tool, .. } if tool == "python"));
}

#[test]
fn test_fast_build_marks_requests_trusted() {
    let host = provisioned_host();
    let opts = host.opts.with_fast_build(true);
    let extractor = MockExtractor::default();
    let mut builder = Builder::new(opts);

    builder
        .assemble(&ToolRegistry::builtin(), &["cmake", "nuget"], &extractor)
        .unwrap();

    let requests = extractor.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|req| req.trust_existing));
}

#[test]
fn test_requests_carry_descriptor_facts() {
    let host = provisioned_host();
    let work = host.opts.tools_root_dir.parent().unwrap().to_path_buf();
    let extractor = MockExtractor::default();
    let mut builder = Builder::new(host.opts);

    builder
        .assemble(
            &ToolRegistry::builtin(),
            &["cmake", "ninja", "nuget", "yasm"],
            &extractor,
        )
        .unwrap();

    let by_name: HashMap<String, ExtractRequest> = extractor
        .requests()
        .into_iter()
        .map(|req| (req.archive_file_name().to_string(), req))
        .collect();

    let cmake = &by_name["cmake-3.7.2-win64-x64.zip"];
    assert_eq!(
        cmake.url.as_deref(),
        Some("https://cmake.org/files/v3.7/cmake-3.7.2-win64-x64.zip")
    );
    assert_eq!(
        cmake.expected_sha256.as_deref(),
        Some("def3bb81dfd922ce1ea2a0647645eefb60e128d520c8ca707c5996c331bc8b48")
    );
    assert_eq!(cmake.dir_part(), Some("cmake-3.7.2-win64-x64"));
    assert_eq!(cmake.dest_root, work.join("tools"));
    assert_eq!(
        cmake.check_file(),
        work.join("tools/cmake-3.7.2-win64-x64/bin/cmake.exe")
    );

    // Renamed cache file and extraction straight into the staging directory.
    let ninja = &by_name["ninja-win-1.8.2.zip"];
    assert_eq!(ninja.dest_root, work.join("tools/ninja"));
    assert!(ninja.dir_part().is_none());

    // Bare executables land at an exact destination.
    let nuget = &by_name["nuget-4.3.0.exe"];
    assert_eq!(
        nuget.force_dest.as_deref(),
        Some(work.join("tools/nuget/nuget.exe").as_path())
    );
    let yasm = &by_name["yasm-1.3.0-win64.exe"];
    assert_eq!(
        yasm.force_dest.as_deref(),
        Some(work.join("tools/yasm/yasm.exe").as_path())
    );
}
