// File-copy installation of the packaged application.
// Copies the built executable (a single file or a one-directory bundle) into an
// install directory, adds shortcuts and leaves an uninstaller script next to
// the copied files.

use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::libs::prompts::Prompter;
use crate::libs::shortcuts::{ShortcutSpec, create_shortcuts, shortcut_dirs};
use crate::libs::utilities::path_helpers::{expand_path, resolve_against};
use crate::libs::utilities::platform::Platform;
use crate::schemas::config::AppConfig;
use crate::{log_debug, log_info};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Deployment options that come from the command line.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub shortcuts: bool,
}

/// What a deployment left on disk.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub install_dir: PathBuf,
    /// The executable shortcuts point at.
    pub executable: PathBuf,
    pub files_copied: usize,
    pub shortcuts: Vec<PathBuf>,
    pub uninstaller: PathBuf,
}

/// Default install location when neither configuration nor the operator chose one.
///
/// * Windows: `%LOCALAPPDATA%\Programs\<App Name>`
/// * elsewhere: `~/.local/share/<app-name>`
pub fn default_install_dir(app: &AppConfig, platform: Platform) -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    if platform.is_windows() {
        base.join("Programs").join(&app.name)
    } else {
        base.join(app.name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-"))
    }
}

/// The build output to deploy, resolved against the project directory.
pub fn packaged_application(ctx: &BootstrapContext) -> PathBuf {
    resolve_against(&ctx.project_dir, &ctx.config.app.executable_path(ctx.platform))
}

/// Copies `source` into `install_dir` and returns the installed executable and
/// the number of files copied.
///
/// A file is copied as is. A directory bundle is copied recursively and the
/// executable is expected at `<install_dir>/<Package_Name><exe suffix>`.
pub fn copy_package(
    source: &Path,
    install_dir: &Path,
    app: &AppConfig,
    platform: Platform,
) -> Result<(PathBuf, usize)> {
    if !source.exists() {
        bail!(
            "Packaged application not found at {}. Run `fsae-bootstrap build` first",
            source.display()
        );
    }
    fs::create_dir_all(install_dir)
        .with_context(|| format!("Failed to create install directory {}", install_dir.display()))?;

    if source.is_file() {
        let file_name = source
            .file_name()
            .with_context(|| format!("{} has no file name", source.display()))?;
        let destination = install_dir.join(file_name);
        fs::copy(source, &destination)
            .with_context(|| format!("Failed to copy {} to {}", source.display(), destination.display()))?;
        return Ok((destination, 1));
    }

    // One-directory bundle: mirror the tree, counting files only
    let mut copied = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} escaped {}", entry.path().display(), source.display()))?;
        let destination = install_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create {}", destination.display()))?;
        } else {
            fs::copy(entry.path(), &destination).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), destination.display())
            })?;
            copied += 1;
        }
    }
    log_debug!("[Deploy] Copied {} files from {}", copied, source.display());

    let executable = install_dir.join(format!("{}{}", app.package_name(), platform.exe_suffix()));
    Ok((executable, copied))
}

/// Uninstaller that removes the shortcuts and the install directory.
pub fn render_uninstaller(app: &AppConfig, install_dir: &Path, shortcuts: &[PathBuf], platform: Platform) -> String {
    if platform.is_windows() {
        let mut lines = vec![
            "@echo off".to_string(),
            format!("REM Uninstaller for {} (generated by fsae-bootstrap)", app.name),
        ];
        for shortcut in shortcuts {
            lines.push(format!("if exist \"{0}\" del /F /Q \"{0}\"", shortcut.display()));
        }
        lines.push("cd /d \"%TEMP%\"".to_string());
        lines.push(format!("echo {} has been removed.", app.name));
        // Last line: the script deletes itself together with the directory.
        lines.push(format!("rmdir /S /Q \"{}\"", install_dir.display()));
        let mut script = lines.join("\r\n");
        script.push_str("\r\n");
        script
    } else {
        let mut script = format!(
            "#!/usr/bin/env sh\n# Uninstaller for {} (generated by fsae-bootstrap)\n",
            app.name
        );
        for shortcut in shortcuts {
            script.push_str(&format!("rm -f {}\n", sh_quote(&shortcut.display().to_string())));
        }
        script.push_str(&format!("rm -rf {}\n", sh_quote(&install_dir.display().to_string())));
        script.push_str(&format!("echo {}\n", sh_quote(&format!("{} has been removed.", app.name))));
        script
    }
}

/// Writes `uninstall.bat` or `uninstall.sh` into `install_dir`.
pub fn write_uninstaller(
    app: &AppConfig,
    install_dir: &Path,
    shortcuts: &[PathBuf],
    platform: Platform,
) -> Result<PathBuf> {
    let name = if platform.is_windows() { "uninstall.bat" } else { "uninstall.sh" };
    let path = install_dir.join(name);
    fs::write(&path, render_uninstaller(app, install_dir, shortcuts, platform))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    make_executable(&path)?;
    Ok(path)
}

/// Full deployment: install directory, copy, shortcuts, uninstaller.
pub fn deploy_application(
    ctx: &BootstrapContext,
    options: &DeployOptions,
    runner: &mut dyn CommandRunner,
    prompter: &mut dyn Prompter,
) -> Result<DeployReport> {
    let app = &ctx.config.app;
    let source = packaged_application(ctx);

    // 1. Resolve the install directory: configuration, then the platform default,
    //    then whatever the operator types at the prompt
    let default_dir = match &ctx.config.deploy.install_dir {
        Some(dir) => expand_path(dir),
        None => default_install_dir(app, ctx.platform),
    };
    let install_dir = prompter.install_dir(&default_dir);

    // 2. Copy the build output
    log_info!(
        "[Deploy] Installing {} to {}",
        app.name.bold(),
        install_dir.display().to_string().cyan()
    );
    let (executable, files_copied) = copy_package(&source, &install_dir, app, ctx.platform)?;
    log_info!("[Deploy] Copied {} file(s)", files_copied);

    // 3. Shortcuts are optional and a failed one only warns
    let shortcuts = if options.shortcuts {
        let spec = ShortcutSpec {
            name: ctx.config.deploy.shortcut_name.clone().unwrap_or_else(|| app.name.clone()),
            target: executable.clone(),
            working_dir: install_dir.clone(),
            icon: app.icon.as_deref().map(|icon| resolve_against(&ctx.project_dir, icon)),
            comment: format!("{} by {}", app.name, app.publisher),
        };
        create_shortcuts(&spec, &shortcut_dirs(ctx.platform), ctx.platform, runner)
    } else {
        log_info!("[Deploy] Skipping shortcuts");
        Vec::new()
    };

    // 4. The uninstaller needs the final shortcut list
    let uninstaller = write_uninstaller(app, &install_dir, &shortcuts, ctx.platform)?;
    log_info!(
        "[Deploy] Uninstall later with {}",
        uninstaller.display().to_string().cyan()
    );

    Ok(DeployReport {
        install_dir,
        executable,
        files_copied,
        shortcuts,
        uninstaller,
    })
}

fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::process::testing::{ScriptedRunner, ok};
    use crate::libs::prompts::EnvironmentChoice;
    use crate::libs::prompts::testing::ScriptedPrompter;
    use crate::stages::env_provisioner::tests::context;

    #[test]
    fn missing_package_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = AppConfig::default();
        let err = copy_package(&tmp.path().join("dist/nothing"), &tmp.path().join("out"), &app, Platform::Linux)
            .unwrap_err();
        assert!(err.to_string().contains("fsae-bootstrap build"));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn single_file_is_copied_into_the_install_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("FSAE_Signal_Analyzer");
        fs::write(&source, "binary").unwrap();

        let (exe, copied) =
            copy_package(&source, &tmp.path().join("out"), &AppConfig::default(), Platform::Linux).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(exe, tmp.path().join("out").join("FSAE_Signal_Analyzer"));
        assert_eq!(fs::read_to_string(exe).unwrap(), "binary");
    }

    #[test]
    fn bundle_directories_are_copied_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("dist").join("FSAE_Signal_Analyzer");
        fs::create_dir_all(bundle.join("_internal").join("customtkinter")).unwrap();
        fs::write(bundle.join("FSAE_Signal_Analyzer.exe"), "exe").unwrap();
        fs::write(bundle.join("_internal").join("customtkinter").join("theme.json"), "{}").unwrap();

        let out = tmp.path().join("out");
        let (exe, copied) = copy_package(&bundle, &out, &AppConfig::default(), Platform::Windows).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(exe, out.join("FSAE_Signal_Analyzer.exe"));
        assert!(out.join("_internal").join("customtkinter").join("theme.json").is_file());
    }

    #[test]
    fn shell_uninstaller_removes_shortcuts_then_the_install_dir() {
        let script = render_uninstaller(
            &AppConfig::default(),
            Path::new("/home/me/.local/share/fsae-signal-analyzer"),
            &[PathBuf::from("/home/me/Desktop/FSAE Signal Analyzer.desktop")],
            Platform::Linux,
        );
        let shortcut = script.find("rm -f '/home/me/Desktop/FSAE Signal Analyzer.desktop'").unwrap();
        let dir = script.find("rm -rf '/home/me/.local/share/fsae-signal-analyzer'").unwrap();
        assert!(shortcut < dir);
        assert!(script.starts_with("#!/usr/bin/env sh\n"));
    }

    #[test]
    fn batch_uninstaller_uses_crlf_and_removes_the_directory_last() {
        let script = render_uninstaller(
            &AppConfig::default(),
            Path::new(r"C:\Apps\FSAE"),
            &[PathBuf::from(r"C:\Menu\FSAE Signal Analyzer.lnk")],
            Platform::Windows,
        );
        assert!(script.contains("del /F /Q \"C:\\Menu\\FSAE Signal Analyzer.lnk\"\r\n"));
        assert!(script.ends_with("rmdir /S /Q \"C:\\Apps\\FSAE\"\r\n"));
    }

    #[test]
    fn sh_quote_escapes_single_quotes() {
        assert_eq!(sh_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn deploy_without_shortcuts_copies_and_writes_the_uninstaller() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = context(tmp.path());
        ctx.platform = Platform::Linux;
        let dist = tmp.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("FSAE_Signal_Analyzer"), "binary").unwrap();

        let mut runner = ScriptedRunner::new(|_| ok(""));
        let mut prompter = ScriptedPrompter::new(EnvironmentChoice::Reuse, false);
        prompter.install_dir = Some(tmp.path().join("installed"));

        let report = deploy_application(&ctx, &DeployOptions { shortcuts: false }, &mut runner, &mut prompter)
            .unwrap();

        assert_eq!(report.install_dir, tmp.path().join("installed"));
        assert!(report.executable.is_file());
        assert!(report.shortcuts.is_empty());
        assert_eq!(report.uninstaller, tmp.path().join("installed").join("uninstall.sh"));
        assert!(report.uninstaller.is_file());
        assert_eq!(prompter.asked, vec!["install_dir"]);
    }

    #[test]
    fn default_install_dir_is_per_platform() {
        let app = AppConfig::default();
        assert!(default_install_dir(&app, Platform::Windows).ends_with("Programs/FSAE Signal Analyzer"));
        assert!(default_install_dir(&app, Platform::Linux).ends_with("fsae-signal-analyzer"));
    }
}
