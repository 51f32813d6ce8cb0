use std::time::Duration;

/// Name of the SDK command-line entry point
pub const DOTNET_APP_NAME: &str = "dotnet";

/// Environment variables consulted when locating the SDK
pub mod env {
    /// Explicit install directory
    pub const INSTALL_DIR: &str = "DOTNET_INSTALL_DIR";

    /// Per-user home directory, searched for `.dotnet`
    pub const HOME: &str = "HOME";

    /// Per-user local application data, searched for `Microsoft/dotnet`
    pub const LOCAL_APP_DATA: &str = "LocalAppData";
}

/// Relative install locations under the per-user directories
pub mod install {
    /// Directory under the home directory
    pub const HOME_SUBDIR: &str = ".dotnet";

    /// Vendor directory under local application data
    pub const VENDOR: &str = "Microsoft";

    /// Tool directory under the vendor directory
    pub const TOOL: &str = "dotnet";
}

/// Target framework used by publish when none is given.
/// Every test site supports .NET Core App on every platform.
pub const DEFAULT_FRAMEWORK: &str = "netcoreapp1.1";

/// Upper bound on a restore run
pub const RESTORE_TIMEOUT: Duration = Duration::from_secs(300);

/// Upper bound on a publish run
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How often a running child is polled for exit
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
