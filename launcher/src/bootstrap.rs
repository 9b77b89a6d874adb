//! Startup sequence: command line, directories, parameters, verbosity.
//!
//! [`RunContext`] is the one object built here and handed to everything that
//! runs afterwards. Nothing in this module exits the process; failures come
//! back as [`Failure`] for `main` to act on.

use std::ffi::OsString;

use tracing::{debug, info, instrument};

use crate::cli::{CliExit, parse_run_arguments};
use crate::core::paths::RunPaths;
use crate::core::role::ProcessRole;
use crate::core::verbosity::{VerboseLevel, Verbosity};
use crate::error::{Error, Result};
use crate::io::channel::{OutputChannel, channel_for};
use crate::io::dirs::{Provisioned, verify_and_provision};
use crate::io::inparam::{ADVANCED_PARAMETERS, ParameterSource, TomlParameters};
use crate::report;

/// Channel name that keeps output on the console.
pub const STDOUT_CHANNEL: &str = "STDOUT";

pub const KEY_CHANNEL: &str = "verbose:channel";
pub const KEY_LEVEL: &str = "verbose:level";
pub const KEY_WARNINGS: &str = "verbose:warnings";

/// Run-wide state: who we are, where files live, how much to say, where to say it.
pub struct RunContext {
    role: ProcessRole,
    paths: RunPaths,
    verbosity: Verbosity,
    channel: Box<dyn OutputChannel>,
}

impl RunContext {
    /// Context with the channel chosen from `role` and default verbosity.
    pub fn new(role: ProcessRole, paths: RunPaths) -> Self {
        let channel = channel_for(&role);
        Self::with_channel(role, paths, channel)
    }

    pub fn with_channel(
        role: ProcessRole,
        paths: RunPaths,
        channel: Box<dyn OutputChannel>,
    ) -> Self {
        Self {
            role,
            paths,
            verbosity: Verbosity::default(),
            channel,
        }
    }

    pub fn role(&self) -> &ProcessRole {
        &self.role
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    pub fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    pub fn channel(&self) -> &dyn OutputChannel {
        self.channel.as_ref()
    }

    /// Write `text` if the configured level admits `level`.
    pub fn say(&mut self, level: VerboseLevel, text: &str) -> Result<()> {
        if !self.verbosity.allows(level) {
            return Ok(());
        }
        self.channel.write_text(text)
    }

    /// Write a framed warning if warnings are enabled.
    pub fn warn(&mut self, message: &str) -> Result<()> {
        if !self.verbosity.shows_warnings() {
            return Ok(());
        }
        self.channel.write_text(&report::warning_box(message))
    }
}

/// Apply `verbose:channel`, `verbose:level` and `verbose:warnings`.
///
/// All three values are read and validated before anything changes, so a bad
/// level never leaves a half-redirected channel behind. A channel other than
/// `STDOUT` names a file inside the output directory.
#[instrument(skip_all, fields(rank = ctx.role.rank()))]
pub fn configure_verbosity(ctx: &mut RunContext, source: &dyn ParameterSource) -> Result<()> {
    let channel = source.get_str(KEY_CHANNEL)?;
    let level: VerboseLevel = source.get_str(KEY_LEVEL)?.parse()?;
    let warnings = source.get_bool(KEY_WARNINGS)?;

    if channel != STDOUT_CHANNEL {
        let target = ctx.paths.output_file(&channel);
        ctx.channel.redirect_to_file(&target)?;
    }
    ctx.verbosity = Verbosity { level, warnings };
    debug!(%channel, %level, warnings, "verbosity configured");
    Ok(())
}

/// Why startup did not produce a [`RunContext`].
#[derive(Debug)]
pub enum Failure {
    /// Help, version, or a usage error; carries its own exit code.
    Exit(CliExit),
    /// Environment or configuration error; the process group must stop.
    Fatal(Error),
}

impl From<CliExit> for Failure {
    fn from(exit: CliExit) -> Self {
        Failure::Exit(exit)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Fatal(err)
    }
}

/// Result of a successful startup.
pub struct Startup {
    pub context: RunContext,
    pub provisioned: Provisioned,
}

/// Run the startup sequence for this process.
///
/// Order: parse `args` → verify input and provision output (root only) →
/// load `<input>/inparam.advanced.toml` → configure verbosity → write the
/// banner, IO summary and any backup warning through the channel.
pub fn bootstrap<I, T>(args: I, role: ProcessRole) -> std::result::Result<Startup, Failure>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let paths = parse_run_arguments(args)?;
    let provisioned = verify_and_provision(&paths, &role)?;

    let parameters = TomlParameters::load(&paths.resolve_input_path(ADVANCED_PARAMETERS))?;
    let mut context = RunContext::new(role, paths);
    configure_verbosity(&mut context, &parameters)?;

    announce(&mut context, &provisioned)?;
    info!(rank = role.rank(), "startup complete");
    Ok(Startup {
        context,
        provisioned,
    })
}

fn announce(context: &mut RunContext, provisioned: &Provisioned) -> Result<()> {
    context.say(
        VerboseLevel::Essential,
        &report::welcome(env!("CARGO_PKG_VERSION")),
    )?;
    let summary = report::io_summary(context.paths(), context.verbosity());
    context.say(VerboseLevel::Essential, &summary)?;
    context.warn(&provisioned.warning())
}
