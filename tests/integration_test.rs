use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Run the binary with an isolated environment: no SDK install directories
// and a HOME without user config
fn helper_cmd(home: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("dotnet-helper")?;
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DOTNET_INSTALL_DIR")
        .env_remove("LocalAppData")
        .env_remove("DOTNET_HELPER_CONFIG");
    Ok(cmd)
}

#[test]
fn test_version_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("dotnet-helper")?;
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dotnet-helper 0.1.0"));
    Ok(())
}

#[test]
fn test_version_subcommand() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dotnet-helper 0.1.0"));
    Ok(())
}

#[test]
fn test_help_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("dotnet-helper")?;
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains(
        "Locate the .NET SDK and run restore/publish against a project",
    ));
    Ok(())
}

#[test]
fn test_publish_requires_output() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("publish");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
    Ok(())
}

#[test]
fn test_locate_falls_back_to_bare_name() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("locate");
    cmd.assert().success().stdout("dotnet\n");
    Ok(())
}

#[test]
fn test_locate_uses_install_dir() -> Result<()> {
    let home = TempDir::new()?;
    let sdk = TempDir::new()?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("locate").env("DOTNET_INSTALL_DIR", sdk.path());

    let expected = format!("{}\n", sdk.path().join("dotnet").display());
    cmd.assert().success().stdout(expected);
    Ok(())
}

#[test]
fn test_locate_uses_home_dotnet() -> Result<()> {
    let home = TempDir::new()?;
    fs::create_dir(home.path().join(".dotnet"))?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("locate");

    let expected = format!("{}\n", home.path().join(".dotnet").join("dotnet").display());
    cmd.assert().success().stdout(expected);
    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let home = TempDir::new()?;
    let config = home.path().join("config.toml");
    fs::write(&config, "publish_timeout_secs = [")?;

    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("--config").arg(&config).arg("locate");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_restore_missing_sdk_fails() -> Result<()> {
    let home = TempDir::new()?;
    let sdk = TempDir::new()?;
    let mut cmd = helper_cmd(home.path())?;
    cmd.arg("restore")
        .arg(home.path())
        .env("DOTNET_INSTALL_DIR", sdk.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("dotnet restore failed: failed to start"));
    Ok(())
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_sdk(exit_code: i32) -> Result<TempDir> {
        let sdk = TempDir::new()?;
        let path = sdk.path().join("dotnet");
        let script = format!(
            "#!/bin/sh\necho \"$@\" > \"{}\"\nexit {}\n",
            sdk.path().join("args.txt").display(),
            exit_code
        );
        fs::write(&path, script)?;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
        Ok(sdk)
    }

    fn recorded_args(sdk: &TempDir) -> Result<String> {
        Ok(fs::read_to_string(sdk.path().join("args.txt"))?
            .trim()
            .to_string())
    }

    #[test]
    fn test_restore_quiet() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(0)?;
        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("restore")
            .arg("--quiet")
            .arg(home.path())
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert()
            .success()
            .stderr(predicate::str::contains("dotnet restore succeeded"));
        assert_eq!(recorded_args(&sdk)?, "restore --verbosity minimal");
        Ok(())
    }

    #[test]
    fn test_restore_failure_exit_code() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(1)?;
        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("restore")
            .arg(home.path())
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("exited with code 1"));
        Ok(())
    }

    #[test]
    fn test_publish_default_framework() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(0)?;
        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("publish")
            .arg(home.path())
            .arg("--output")
            .arg("/tmp/out")
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert().success();
        assert_eq!(
            recorded_args(&sdk)?,
            "publish --output /tmp/out --framework netcoreapp1.1"
        );
        Ok(())
    }

    #[test]
    fn test_publish_configured_framework() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(0)?;
        let config = home.path().join("config.toml");
        fs::write(&config, "default_framework = \"net8.0\"\n")?;

        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("--config")
            .arg(&config)
            .arg("publish")
            .arg(home.path())
            .arg("--output")
            .arg("/tmp/out")
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert().success();
        assert_eq!(
            recorded_args(&sdk)?,
            "publish --output /tmp/out --framework net8.0"
        );
        Ok(())
    }

    #[test]
    fn test_publish_explicit_framework() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(0)?;
        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("publish")
            .arg(home.path())
            .arg("-o")
            .arg("/tmp/out")
            .arg("--framework")
            .arg("net6.0")
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert().success();
        assert_eq!(
            recorded_args(&sdk)?,
            "publish --output /tmp/out --framework net6.0"
        );
        Ok(())
    }

    #[test]
    fn test_exec_passes_arguments() -> Result<()> {
        let home = TempDir::new()?;
        let sdk = fake_sdk(0)?;
        let mut cmd = helper_cmd(home.path())?;
        cmd.arg("exec")
            .arg("--dir")
            .arg(home.path())
            .arg("--")
            .arg("build")
            .arg("-c")
            .arg("Release")
            .env("DOTNET_INSTALL_DIR", sdk.path());

        cmd.assert().success();
        assert_eq!(recorded_args(&sdk)?, "build -c Release");
        Ok(())
    }
}
