//! The built-in tool set.
//!
//! Each tool binds its staging locations from the orchestrator context,
//! materializes through the extraction service (or by marker directory for
//! host-provided tools), and reports how it wants to appear on the composed
//! PATH. URLs, checksums and directory names here are configuration data;
//! the lifecycle mechanics live in [`crate::tool`].

use std::path::PathBuf;
use tracing::debug;

use toolstage_core::{BuildContext, Error, Result};
use toolstage_extract::Extractor;

use crate::descriptor::ToolDescriptor;
use crate::tool::{PathContribution, Stage, Tool};

/// CMake build-file generator.
#[derive(Debug, Default)]
pub struct Cmake {
    stage: Stage,
}

impl Cmake {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("cmake")
        .with_url("https://cmake.org/files/v3.7/cmake-3.7.2-win64-x64.zip")
        .with_sha256("def3bb81dfd922ce1ea2a0647645eefb60e128d520c8ca707c5996c331bc8b48")
        .with_dir_part("cmake-3.7.2-win64-x64");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Cmake {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let check_file = self.stage.build_dir.join("bin").join("cmake.exe");
        let req = self.stage.root_request(&Self::DESCRIPTOR, check_file)?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.stage.build_dir.join("bin"))
    }
}

/// Meson build-file generator. Invoked as a script through its exact path,
/// which bind publishes on the context, so it contributes nothing to PATH.
#[derive(Debug, Default)]
pub struct Meson {
    stage: Stage,
    script: PathBuf,
}

impl Meson {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("meson")
        .with_url("https://github.com/mesonbuild/meson/archive/0.46.1.zip")
        .with_archive_file_name("meson-0.46.1.zip")
        .with_sha256("9a4eb0636241298b7ef5bb401856bd4a496251e3438e98b906395c8d5d1f72c4")
        .with_dir_part("meson-0.46.1");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Meson {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        self.script = self.stage.build_dir.join("meson.py");
        ctx.meson = Some(self.script.clone());
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let req = self
            .stage
            .root_request(&Self::DESCRIPTOR, self.script.clone())?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::None
    }
}

/// Pre-installed msys2 shell environment. Nothing is downloaded; the staging
/// directory only serves as the fast-build marker. Its binaries shadow
/// same-named executables from other tools, so it always goes to the end of
/// the composed PATH.
#[derive(Debug, Default)]
pub struct Msys2 {
    stage: Stage,
    msys_bin: Option<PathBuf>,
}

impl Msys2 {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("msys2");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Msys2 {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        self.msys_bin = ctx
            .opts
            .msys_dir
            .as_ref()
            .map(|dir| dir.join("usr").join("bin"));
        Ok(())
    }

    fn materialize(&mut self, _extractor: &dyn Extractor) -> Result<()> {
        let msys_bin = self
            .msys_bin
            .as_ref()
            .ok_or_else(|| Error::configuration("msys2 requires the msys root option"))?;
        if !msys_bin.is_dir() {
            return Err(Error::missing_resource("msys2", msys_bin.clone()));
        }
        self.stage.ensure_marker_dir()
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        match &self.msys_bin {
            Some(bin) => PathContribution::Append(bin.clone()),
            None => PathContribution::None,
        }
    }
}

/// Netwide assembler, shipped as a zip expanding to a versioned directory.
#[derive(Debug, Default)]
pub struct Nasm {
    stage: Stage,
}

impl Nasm {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("nasm")
        .with_url("https://www.nasm.us/pub/nasm/releasebuilds/2.13.03/win64/nasm-2.13.03-win64.zip")
        .with_sha256("b3a1f896b53d07854884c2e0d6be7defba7ebd09b864bbb9e6d69ada1c3e989f")
        .with_dir_part("nasm-2.13.03");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Nasm {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let check_file = self.stage.build_dir.join("nasm.exe");
        let req = self.stage.root_request(&Self::DESCRIPTOR, check_file)?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.stage.build_dir.clone())
    }
}

/// Ninja build executor. The zip has no top-level directory, so it expands
/// directly into the staging directory.
#[derive(Debug, Default)]
pub struct Ninja {
    stage: Stage,
}

impl Ninja {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("ninja")
        .with_url("https://github.com/ninja-build/ninja/releases/download/v1.8.2/ninja-win.zip")
        .with_archive_file_name("ninja-win-1.8.2.zip")
        .with_sha256("c80313e6c26c0b9e0c241504718e2d8bbc2798b73429933adf03fdc6d84f0e70");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Ninja {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let check_file = self.stage.build_dir.join("ninja.exe");
        let req = self.stage.dir_request(&Self::DESCRIPTOR, check_file)?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.stage.build_dir.clone())
    }
}

/// NuGet package fetcher, downloaded as a bare executable. The build engine
/// invokes it by the exact path bind publishes, so no PATH contribution.
#[derive(Debug, Default)]
pub struct Nuget {
    stage: Stage,
    exe: PathBuf,
}

impl Nuget {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("nuget")
        .with_url("https://dist.nuget.org/win-x86-commandline/v4.3.0/nuget.exe")
        .with_archive_file_name("nuget-4.3.0.exe")
        .with_sha256("386da77a8cf2b63d1260b7020feeedabfe3b65ab31d20e6a313a530865972f3a");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Nuget {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        self.exe = self.stage.build_dir.join("nuget.exe");
        ctx.nuget = Some(self.exe.clone());
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let req = self
            .stage
            .dir_request(&Self::DESCRIPTOR, self.exe.clone())?
            .with_force_dest(self.exe.clone());
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::None
    }
}

/// Perl interpreter, shipped as tar.xz expanding to an `x64` tree. Makefiles
/// need the version-qualified root verbatim, so bind publishes it.
#[derive(Debug, Default)]
pub struct Perl {
    stage: Stage,
    perl_bin: PathBuf,
}

impl Perl {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("perl")
        .with_url(
            "https://github.com/wingtk/gtk-win32/releases/download/Perl-5.20/perl-5.20.0-x64.tar.xz",
        )
        .with_sha256("05e01cf30bb47d3938db6169299ed49271f91c1615aeee5649174f48ff418c55");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Perl {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        let perl_dir = self.stage.build_dir.join("x64");
        self.perl_bin = perl_dir.join("bin");
        ctx.perl_dir = Some(perl_dir);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let check_file = self.perl_bin.join("perl.exe");
        let req = self.stage.dir_request(&Self::DESCRIPTOR, check_file)?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.perl_bin.clone())
    }
}

/// Python interpreter: either an externally supplied location or the
/// directory of the running executable. Never downloaded; the staging
/// directory only serves as the fast-build marker.
#[derive(Debug, Default)]
pub struct Python {
    stage: Stage,
    python_dir: PathBuf,
    from_override: bool,
}

impl Python {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("python");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Python {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        if let Some(dir) = &ctx.opts.python_dir {
            self.python_dir = dir.clone();
            self.from_override = true;
        } else {
            let exe = std::env::current_exe()?;
            self.python_dir = exe
                .parent()
                .map(PathBuf::from)
                .ok_or_else(|| Error::configuration("cannot locate the running executable"))?;
            self.from_override = false;
        }
        debug!(dir = %self.python_dir.display(), "Resolved interpreter directory");
        Ok(())
    }

    fn materialize(&mut self, _extractor: &dyn Extractor) -> Result<()> {
        if self.from_override && !self.python_dir.is_dir() {
            return Err(Error::missing_resource("python", self.python_dir.clone()));
        }
        self.stage.ensure_marker_dir()
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.python_dir.clone())
    }
}

/// Yasm assembler, downloaded as a bare executable and copied under its
/// plain name.
#[derive(Debug, Default)]
pub struct Yasm {
    stage: Stage,
}

impl Yasm {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("yasm")
        .with_url("http://www.tortall.net/projects/yasm/releases/yasm-1.3.0-win64.exe")
        .with_sha256("d160b1d97266f3f28a71b4420a0ad2cd088a7977c2dd3b25af155652d8d8d91f");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }
}

impl Tool for Yasm {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let dest = self.stage.build_dir.join("yasm.exe");
        let req = self
            .stage
            .dir_request(&Self::DESCRIPTOR, dest.clone())?
            .with_force_dest(dest);
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.stage.build_dir.clone())
    }
}

/// Go toolchain, shipped as a zip expanding to a `go/` tree inside the
/// staging directory.
#[derive(Debug, Default)]
pub struct Go {
    stage: Stage,
}

impl Go {
    const DESCRIPTOR: ToolDescriptor = ToolDescriptor::new("go")
        .with_url("https://dl.google.com/go/go1.10.windows-amd64.zip")
        .with_sha256("210b223031c254a6eb8fa138c3782b23af710a9959d64b551fa81edd762ea167");

    pub(crate) fn create() -> Box<dyn Tool> {
        Box::<Self>::default()
    }

    fn go_bin(&self) -> PathBuf {
        self.stage.build_dir.join("go").join("bin")
    }
}

impl Tool for Go {
    fn descriptor(&self) -> &ToolDescriptor {
        &Self::DESCRIPTOR
    }

    fn bind(&mut self, ctx: &mut BuildContext) -> Result<()> {
        self.stage = Stage::bind(&Self::DESCRIPTOR, &ctx.opts);
        Ok(())
    }

    fn materialize(&mut self, extractor: &dyn Extractor) -> Result<()> {
        let check_file = self.go_bin().join("go.exe");
        let req = self.stage.dir_request(&Self::DESCRIPTOR, check_file)?;
        self.stage.changed = extractor.extract(&req)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.stage.changed
    }

    fn path_contribution(&self) -> PathContribution {
        PathContribution::Prepend(self.go_bin())
    }
}
