//! Restore and publish through the .NET SDK
//!
//! [`DotnetHelper`] holds no mutable state. Build one at startup and pass it to
//! whatever needs to run the SDK.

use crate::config::Config;
use crate::constants::{DEFAULT_FRAMEWORK, PUBLISH_TIMEOUT, RESTORE_TIMEOUT};
use crate::invoke::{Invocation, InvocationOutcome};
use crate::locate::{is_bare_command, DotnetLocator};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};


pub struct DotnetHelper {
    locator: DotnetLocator,
    default_framework: String,
    restore_timeout: Duration,
    publish_timeout: Duration,
}

impl Default for DotnetHelper {
    fn default() -> Self {
        Self::new(DotnetLocator::new())
    }
}

impl DotnetHelper {
    pub fn new(locator: DotnetLocator) -> Self {
        Self {
            locator,
            default_framework: DEFAULT_FRAMEWORK.to_string(),
            restore_timeout: RESTORE_TIMEOUT,
            publish_timeout: PUBLISH_TIMEOUT,
        }
    }

    pub fn from_config(locator: DotnetLocator, config: &Config) -> Self {
        Self::new(locator)
            .with_default_framework(config.framework())
            .with_timeouts(config.restore_timeout(), config.publish_timeout())
    }

    /// Framework used by publish when the caller passes none. Empty keeps the
    /// current default.
    pub fn with_default_framework(mut self, framework: impl Into<String>) -> Self {
        let framework = framework.into();
        if !framework.is_empty() {
            self.default_framework = framework;
        }
        self
    }

    pub fn with_timeouts(mut self, restore: Duration, publish: Duration) -> Self {
        self.restore_timeout = restore;
        self.publish_timeout = publish;
        self
    }

    /// SDK install directory, if one of the conventional locations exists
    pub fn dotnet_path(&self) -> Option<PathBuf> {
        self.locator.dotnet_path()
    }

    /// Resolved executable, or the bare `dotnet` command
    pub fn dotnet_executable(&self) -> PathBuf {
        self.locator.dotnet_executable()
    }

    /// Start configuration for an arbitrary argument string.
    ///
    /// Shell execution is enabled only when the executable fell back to the bare
    /// command name, so the host search path gets to resolve it.
    pub fn build_start_info(&self, app_base_path: impl AsRef<Path>, argument: &str) -> Invocation {
        let dotnet = self.dotnet_executable();
        let use_shell = is_bare_command(&dotnet);
        Invocation::new(dotnet, app_base_path, argument).with_shell(use_shell)
    }

    pub fn restore_invocation(
        &self,
        working_dir: impl AsRef<Path>,
        quiet: bool,
        use_shell: bool,
    ) -> Invocation {
        let arguments = if quiet {
            "restore --verbosity minimal"
        } else {
            "restore"
        };
        Invocation::new(self.dotnet_executable(), working_dir, arguments).with_shell(use_shell)
    }

    pub fn publish_invocation(
        &self,
        working_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        framework: &str,
        use_shell: bool,
    ) -> Invocation {
        // Multi-target projects require an explicit framework
        let framework = if framework.is_empty() {
            self.default_framework.as_str()
        } else {
            framework
        };
        let arguments = format!(
            "publish --output \"{}\" --framework {}",
            output_dir.as_ref().display(),
            framework
        );
        Invocation::new(self.dotnet_executable(), working_dir, arguments).with_shell(use_shell)
    }

    /// Run `dotnet restore`, reporting how it ended
    pub fn run_restore(
        &self,
        working_dir: impl AsRef<Path>,
        quiet: bool,
        use_shell: bool,
    ) -> InvocationOutcome {
        info!("Restoring packages in {}", working_dir.as_ref().display());
        let outcome = self
            .restore_invocation(working_dir, quiet, use_shell)
            .execute(self.restore_timeout);
        report("restore", &outcome);
        outcome
    }

    /// Run `dotnet restore`; true only for a zero exit within the timeout
    pub fn restore(&self, working_dir: impl AsRef<Path>, quiet: bool, use_shell: bool) -> bool {
        self.run_restore(working_dir, quiet, use_shell).success()
    }

    /// Run `dotnet publish`, reporting how it ended.
    /// An empty `framework` selects the default target framework.
    pub fn run_publish(
        &self,
        working_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        framework: &str,
        use_shell: bool,
    ) -> InvocationOutcome {
        info!(
            "Publishing {} to {}",
            working_dir.as_ref().display(),
            output_dir.as_ref().display()
        );
        let outcome = self
            .publish_invocation(working_dir, output_dir, framework, use_shell)
            .execute(self.publish_timeout);
        report("publish", &outcome);
        outcome
    }

    /// Run `dotnet publish` for a specific framework
    pub fn publish_with_framework(
        &self,
        working_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        framework: &str,
        use_shell: bool,
    ) -> bool {
        self.run_publish(working_dir, output_dir, framework, use_shell)
            .success()
    }

    /// Run `dotnet publish` for the default framework without a shell
    pub fn publish(&self, working_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> bool {
        self.publish_with_framework(working_dir, output_dir, "", false)
    }
}

fn report(operation: &str, outcome: &InvocationOutcome) {
    if outcome.success() {
        info!("dotnet {} succeeded", operation);
    } else {
        error!("dotnet {} failed: {}", operation, outcome);
    }
}
