//! Locating the .NET SDK executable
//!
//! The SDK is looked up in three conventional install directories, in order:
//! an explicit `DOTNET_INSTALL_DIR`, `$HOME/.dotnet`, and
//! `$LocalAppData/Microsoft/dotnet`. When none of them exists the bare command
//! name is returned and left to the OS search path.

use crate::constants::{env, install, DOTNET_APP_NAME};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;


/// Source of environment variables consulted during resolution
pub trait Environment: Send + Sync {
    /// Look up a variable, returning `None` when it is unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolves the SDK install directory and executable.
///
/// Nothing is cached: every query re-reads the environment and the filesystem.
pub struct DotnetLocator {
    env: Box<dyn Environment>,
}

impl Default for DotnetLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DotnetLocator {
    /// Create a locator backed by the process environment
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }

    /// Create a locator backed by a custom environment
    pub fn with_environment(env: impl Environment + 'static) -> Self {
        Self { env: Box::new(env) }
    }

    /// First existing install directory, if any, as an absolute path
    pub fn dotnet_path(&self) -> Option<PathBuf> {
        if let Some(dir) = self.env.var(env::INSTALL_DIR) {
            let path = PathBuf::from(expand_env_vars(&dir, &*self.env));
            if let Some(path) = existing_dir(path) {
                debug!("Using {} at {}", env::INSTALL_DIR, path.display());
                return Some(path);
            }
        }

        if let Some(home) = self.env.var(env::HOME) {
            if let Some(path) = existing_dir(Path::new(&home).join(install::HOME_SUBDIR)) {
                debug!("Using per-user install at {}", path.display());
                return Some(path);
            }
        }

        if let Some(local_app_data) = self.env.var(env::LOCAL_APP_DATA) {
            let path = Path::new(&local_app_data)
                .join(install::VENDOR)
                .join(install::TOOL);
            if let Some(path) = existing_dir(path) {
                debug!("Using local app data install at {}", path.display());
                return Some(path);
            }
        }

        None
    }

    /// Full path to the executable, or the bare command name when no install
    /// directory was found
    pub fn dotnet_executable(&self) -> PathBuf {
        match self.dotnet_path() {
            Some(dir) => dir.join(DOTNET_APP_NAME),
            None => PathBuf::from(DOTNET_APP_NAME),
        }
    }
}

/// Whether `program` is the bare command name rather than a resolved path
pub fn is_bare_command(program: &Path) -> bool {
    program == Path::new(DOTNET_APP_NAME)
}

/// Anchor an existing directory to the current directory.
///
/// The child runs in its own working directory, so a relative program path
/// would otherwise be resolved against the wrong place.
fn existing_dir(path: PathBuf) -> Option<PathBuf> {
    if !path.is_dir() {
        return None;
    }
    match std::path::absolute(&path) {
        Ok(absolute) => Some(absolute),
        Err(e) => {
            debug!("Cannot make {} absolute: {}", path.display(), e);
            Some(path)
        }
    }
}

/// Expand `%NAME%` references, as Windows does for environment strings.
///
/// References to unset variables are kept as written. `$` has no meaning.
pub fn expand_env_vars(value: &str, env: &dyn Environment) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let body = &rest[start + 1..];

        let Some(end) = body.find('%') else {
            out.push('%');
            rest = body;
            continue;
        };

        let name = &body[..end];
        match env.var(name).filter(|_| !name.is_empty()) {
            Some(v) => {
                out.push_str(&v);
                rest = &body[end + 1..];
            }
            None => {
                // The closing % may open the next reference
                out.push('%');
                out.push_str(name);
                rest = &body[end..];
            }
        }
    }

    out.push_str(rest);
    out
}
