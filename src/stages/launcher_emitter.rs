// Launcher Emitter.
// Writes small platform-native scripts that change to the project directory,
// activate the environment when it exists (otherwise fall back to the ambient
// runtime) and start the entry module. The scripts depend only on the
// configuration and the selected runtime command, so regenerating them is
// byte-identical. Existing launchers are always overwritten.

use crate::errors::{BootstrapError, Stage};
use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::libs::utilities::path_helpers::relative_display;
use crate::schemas::runtime::CommandSpec;
use crate::{log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The inputs a launcher script is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSpec {
    pub app_name: String,
    pub entry_module: String,
    /// Environment directory as written in the script (project-relative when possible).
    pub env_dir: String,
    /// The environment lives outside the project, so `env_dir` is written as is.
    pub env_is_absolute: bool,
    /// Command used when the environment is missing.
    pub ambient: CommandSpec,
}

impl LauncherSpec {
    pub fn from_context(ctx: &BootstrapContext, ambient: &CommandSpec) -> Self {
        LauncherSpec {
            app_name: ctx.config.app.name.clone(),
            entry_module: ctx.config.app.entry_module.clone(),
            env_dir: relative_display(&ctx.project_dir, &ctx.env_dir),
            env_is_absolute: ctx.env_dir.strip_prefix(&ctx.project_dir).is_err(),
            ambient: ambient.clone(),
        }
    }

    fn windows_env_dir(&self) -> String {
        self.env_dir.replace('/', "\\")
    }

    fn posix_env_dir(&self) -> String {
        self.env_dir.replace('\\', "/")
    }
}

/// `cmd.exe` launcher. Uses CRLF line endings.
pub fn render_batch(spec: &LauncherSpec) -> String {
    let env = spec.windows_env_dir();
    let lines = [
        "@echo off".to_string(),
        format!("REM Launcher for {} (generated by fsae-bootstrap)", spec.app_name),
        "cd /d \"%~dp0\"".to_string(),
        format!("if exist \"{env}\\Scripts\\activate.bat\" ("),
        format!("    call \"{env}\\Scripts\\activate.bat\""),
        format!("    python -m {} %*", spec.entry_module),
        ") else (".to_string(),
        format!("    {} -m {} %*", spec.ambient.command_line(), spec.entry_module),
        ")".to_string(),
    ];
    let mut script = lines.join("\r\n");
    script.push_str("\r\n");
    script
}

/// PowerShell launcher.
pub fn render_powershell(spec: &LauncherSpec) -> String {
    let env = spec.windows_env_dir();
    // Project-relative environments resolve against the script's own folder.
    let activate = if spec.env_is_absolute {
        format!("'{env}\\Scripts\\Activate.ps1'")
    } else {
        format!("Join-Path $PSScriptRoot '{env}\\Scripts\\Activate.ps1'")
    };
    let ambient_args = spec
        .ambient
        .args
        .iter()
        .map(|arg| format!(" {arg}"))
        .collect::<String>();
    format!(
        "# Launcher for {name} (generated by fsae-bootstrap)\n\
         Set-Location -Path $PSScriptRoot\n\
         $activate = {activate}\n\
         if (Test-Path $activate) {{\n\
         \x20   . $activate\n\
         \x20   python -m {module} @args\n\
         }} else {{\n\
         \x20   & '{program}'{ambient_args} -m {module} @args\n\
         }}\n",
        name = spec.app_name,
        module = spec.entry_module,
        program = spec.ambient.program.replace('\'', "''"),
    )
}

/// POSIX `sh` launcher.
pub fn render_shell(spec: &LauncherSpec) -> String {
    let env = spec.posix_env_dir();
    format!(
        "#!/usr/bin/env sh\n\
         # Launcher for {name} (generated by fsae-bootstrap)\n\
         cd \"$(dirname \"$0\")\" || exit 1\n\
         if [ -f \"{env}/bin/activate\" ]; then\n\
         \x20   . \"{env}/bin/activate\"\n\
         \x20   exec python -m {module} \"$@\"\n\
         else\n\
         \x20   exec {ambient} -m {module} \"$@\"\n\
         fi\n",
        name = spec.app_name,
        module = spec.entry_module,
        ambient = spec.ambient.command_line(),
    )
}

/// Renders the script for `path` based on its extension.
fn render_for(path: &Path, spec: &LauncherSpec) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("bat") => render_batch(spec),
        Some("ps1") => render_powershell(spec),
        _ => render_shell(spec),
    }
}

/// Writes this platform's launchers into the project directory.
///
/// # Errors
/// * `LauncherWriteFailed` for the first launcher that cannot be written.
pub fn emit_launchers(ctx: &BootstrapContext, ambient: &CommandSpec) -> Result<Vec<PathBuf>, BootstrapError> {
    let spec = LauncherSpec::from_context(ctx, ambient);
    let paths = ctx.launcher_paths();

    for path in &paths {
        write_launcher(path, &render_for(path, &spec))?;
        log_info!(
            "{} Wrote {}",
            Stage::Launcher,
            path.display().to_string().cyan()
        );
    }
    Ok(paths)
}

fn write_launcher(path: &Path, contents: &str) -> Result<(), BootstrapError> {
    let to_error = |source| BootstrapError::LauncherWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, contents).map_err(to_error)?;
    make_executable(path).map_err(to_error)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// The command that runs a generated launcher.
pub fn launch_command(launcher: &Path) -> Command {
    match launcher.extension().and_then(|ext| ext.to_str()) {
        Some("bat") => {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(launcher);
            command
        }
        Some("ps1") => {
            let mut command = Command::new("powershell");
            command
                .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"])
                .arg(launcher);
            command
        }
        _ => {
            let mut command = Command::new("sh");
            command.arg(launcher);
            command
        }
    }
}

/// Starts the application through the first launcher without waiting for it.
/// Returns whether the launch was started; a failure only warns.
pub fn launch(launchers: &[PathBuf], runner: &mut dyn CommandRunner) -> bool {
    let Some(launcher) = launchers.first() else {
        return false;
    };
    log_info!(
        "{} Starting {}...",
        Stage::Launcher,
        launcher.display().to_string().bold()
    );
    match runner.spawn_detached(&mut launch_command(launcher)) {
        Ok(()) => true,
        Err(e) => {
            log_warn!(
                "{} Could not start {}: {}. Run it by hand.",
                Stage::Launcher,
                launcher.display(),
                e
            );
            false
        }
    }
}
