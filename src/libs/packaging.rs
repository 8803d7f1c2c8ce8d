// Packaging: a standalone executable through PyInstaller and an InnoSetup
// script that turns it into a Windows installer.

use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::schemas::config::AppConfig;
use crate::schemas::dependency::Dependency;
use crate::stages::env_provisioner::PythonTarget;
use crate::{log_debug, log_info, log_warn};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the generated InnoSetup script.
pub const INSTALLER_SCRIPT: &str = "installer_script.iss";

/// Packages whose data files (themes, images) PyInstaller must bundle.
const COLLECT_ALL: &[&str] = &["customtkinter", "CTkMessagebox"];

/// Arguments after `python -m PyInstaller`.
/// Every verified module becomes a hidden import, in dependency order,
/// followed by the configured extra submodules.
pub fn pyinstaller_args(app: &AppConfig, dependencies: &[Dependency]) -> Vec<String> {
    let mut args = vec![
        format!("--name={}", app.package_name()),
        "--onefile".to_string(),
        "--windowed".to_string(),
        "--clean".to_string(),
        "--noconfirm".to_string(),
    ];
    if let Some(icon) = &app.icon {
        args.push(format!("--icon={icon}"));
    }

    let mut seen: Vec<String> = Vec::new();
    let modules = dependencies
        .iter()
        .map(Dependency::module_name)
        .chain(app.hidden_imports.iter().cloned());
    for module in modules {
        if !seen.contains(&module) {
            args.push(format!("--hidden-import={module}"));
            seen.push(module);
        }
    }
    args.extend(COLLECT_ALL.iter().map(|package| format!("--collect-all={package}")));
    args.push(app.entry_script.clone());
    args
}

/// Makes sure `import PyInstaller` works in `target`, installing it with pip otherwise.
pub fn ensure_pyinstaller(target: &PythonTarget, runner: &mut dyn CommandRunner) -> Result<()> {
    let mut check = target.interpreter.command();
    check.args(["-c", "import PyInstaller; print(PyInstaller.__version__)"]);
    if let Ok(output) = runner.capture(&mut check) {
        if output.succeeded() {
            log_info!("[Build] PyInstaller {} found", output.stdout.trim().green());
            return Ok(());
        }
    }

    log_warn!("[Build] PyInstaller not found. Installing...");
    let mut install = target.interpreter.command();
    install.args(["-m", "pip", "install", "pyinstaller"]);
    let output = runner
        .stream(&mut install)
        .with_context(|| format!("Failed to run '{}'", target.interpreter))?;
    if !output.succeeded() {
        bail!("pip install pyinstaller failed with {}", output.describe_exit());
    }
    Ok(())
}

/// Removes `build/`, `dist/` and a stale `<Package_Name>.spec` from the project.
pub fn clean_previous_build(project_dir: &Path, app: &AppConfig) -> Result<()> {
    for folder in ["build", "dist"] {
        let path = project_dir.join(folder);
        if path.exists() {
            log_info!("[Build] Cleaning {}/...", folder);
            fs::remove_dir_all(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }
    let spec = project_dir.join(format!("{}.spec", app.package_name()));
    if spec.exists() {
        log_debug!("[Build] Removing {}", spec.display());
        fs::remove_file(&spec).with_context(|| format!("Failed to remove {}", spec.display()))?;
    }
    Ok(())
}

/// Builds the standalone executable and returns its path.
pub fn build_executable(
    ctx: &BootstrapContext,
    target: &PythonTarget,
    dependencies: &[Dependency],
    runner: &mut dyn CommandRunner,
) -> Result<PathBuf> {
    let app = &ctx.config.app;

    // 1. PyInstaller must be importable from the same interpreter as the app
    ensure_pyinstaller(target, runner)?;

    // 2. Start from empty build/ and dist/
    clean_previous_build(&ctx.project_dir, app)?;

    // 3. Run PyInstaller from the project directory
    log_info!("[Build] Building executable (this may take a few minutes)...");
    let mut command = target.interpreter.command();
    command
        .args(["-m", "PyInstaller"])
        .args(pyinstaller_args(app, dependencies))
        .current_dir(&ctx.project_dir);
    let output = runner
        .stream(&mut command)
        .with_context(|| format!("Failed to run PyInstaller with '{}'", target.interpreter))?;
    if !output.succeeded() {
        bail!("PyInstaller failed with {}", output.describe_exit());
    }

    // 4. A zero exit is not trusted until the executable is on disk
    let executable = ctx
        .project_dir
        .join("dist")
        .join(format!("{}{}", app.package_name(), ctx.platform.exe_suffix()));
    let metadata = fs::metadata(&executable)
        .with_context(|| format!("Executable not found after build: {}", executable.display()))?;

    log_info!(
        "[Build] {} Executable: {} ({:.1} MB)",
        "BUILD SUCCESSFUL.".bold().green(),
        executable.display().to_string().cyan(),
        metadata.len() as f64 / (1024.0 * 1024.0)
    );
    Ok(executable)
}

/// InnoSetup script for the executable at `dist\<Package_Name>.exe`.
pub fn render_installer_script(app: &AppConfig) -> String {
    let package = app.package_name();
    let exe = format!("{package}.exe");
    let name = &app.name;
    let icon = match &app.icon {
        Some(icon) => format!("SetupIconFile={}\n", icon.replace('/', "\\")),
        None => String::new(),
    };
    format!(
        "; {name}\n\
         ; InnoSetup installer script (generated by fsae-bootstrap)\n\
         ;\n\
         ; To use: open this file in InnoSetup (https://jrsoftware.org/isinfo.php) and compile it.\n\
         \n\
         [Setup]\n\
         AppName={name}\n\
         AppVersion={version}\n\
         AppPublisher={publisher}\n\
         DefaultDirName={{autopf}}\\{name}\n\
         DefaultGroupName={publisher}\n\
         OutputDir=installer\n\
         OutputBaseFilename={package}_Setup\n\
         Compression=lzma\n\
         SolidCompression=yes\n\
         WizardStyle=modern\n\
         {icon}\
         \n\
         [Languages]\n\
         Name: \"english\"; MessagesFile: \"compiler:Default.isl\"\n\
         \n\
         [Tasks]\n\
         Name: \"desktopicon\"; Description: \"{{cm:CreateDesktopIcon}}\"; GroupDescription: \"{{cm:AdditionalIcons}}\"; Flags: unchecked\n\
         \n\
         [Files]\n\
         Source: \"dist\\{exe}\"; DestDir: \"{{app}}\"; Flags: ignoreversion\n\
         \n\
         [Icons]\n\
         Name: \"{{group}}\\{name}\"; Filename: \"{{app}}\\{exe}\"\n\
         Name: \"{{group}}\\{{cm:UninstallProgram,{name}}}\"; Filename: \"{{uninstallexe}}\"\n\
         Name: \"{{autodesktop}}\\{name}\"; Filename: \"{{app}}\\{exe}\"; Tasks: desktopicon\n\
         \n\
         [Run]\n\
         Filename: \"{{app}}\\{exe}\"; Description: \"{{cm:LaunchProgram,{name}}}\"; Flags: nowait postinstall skipifsilent\n",
        version = app.version,
        publisher = app.publisher,
    )
}

/// Writes `installer_script.iss` into the project directory.
pub fn write_installer_script(ctx: &BootstrapContext) -> Result<PathBuf> {
    let path = ctx.project_dir.join(INSTALLER_SCRIPT);
    fs::write(&path, render_installer_script(&ctx.config.app))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log_info!("[Build] Created {}", path.display().to_string().cyan());
    log_info!("[Build] Download InnoSetup from: https://jrsoftware.org/isinfo.php");
    Ok(path)
}
