// Desktop and Start Menu shortcuts for a deployed application.
// Windows shortcuts are `.lnk` files created through PowerShell's WScript.Shell
// automation object; Linux gets freedesktop `.desktop` entries. macOS has no
// equivalent we can write safely, so shortcuts are skipped there.

use crate::libs::process::CommandRunner;
use crate::libs::utilities::platform::Platform;
use crate::{log_debug, log_info, log_warn};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// What a shortcut points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    pub name: String,
    pub target: PathBuf,
    pub working_dir: PathBuf,
    pub icon: Option<PathBuf>,
    pub comment: String,
}

/// Directories shortcuts are placed in: the application menu first, then the desktop.
/// The desktop is only included when it already exists.
pub fn shortcut_dirs(platform: Platform) -> Vec<PathBuf> {
    let menu = match platform {
        Platform::Windows => dirs::data_dir().map(|appdata| {
            appdata
                .join("Microsoft")
                .join("Windows")
                .join("Start Menu")
                .join("Programs")
        }),
        Platform::Linux => dirs::data_dir().map(|data| data.join("applications")),
        Platform::MacOs => None,
    };
    let desktop = match platform {
        Platform::MacOs => None,
        _ => dirs::desktop_dir().filter(|dir| dir.is_dir()),
    };
    menu.into_iter().chain(desktop).collect()
}

/// `<dir>/<name>.lnk` on Windows, `<dir>/<name>.desktop` elsewhere.
pub fn shortcut_path(dir: &Path, name: &str, platform: Platform) -> Result<PathBuf> {
    if name.trim().is_empty() {
        bail!("shortcut name is empty");
    }
    let extension = if platform.is_windows() { "lnk" } else { "desktop" };
    Ok(dir.join(format!("{name}.{extension}")))
}

/// PowerShell program that writes one `.lnk` file.
pub fn powershell_shortcut_script(lnk: &Path, spec: &ShortcutSpec) -> String {
    let mut script = format!(
        "$WshShell = New-Object -ComObject WScript.Shell; \
         $Shortcut = $WshShell.CreateShortcut({lnk}); \
         $Shortcut.TargetPath = {target}; \
         $Shortcut.WorkingDirectory = {workdir}; \
         $Shortcut.Description = {comment}; ",
        lnk = ps_quote(&lnk.display().to_string()),
        target = ps_quote(&spec.target.display().to_string()),
        workdir = ps_quote(&spec.working_dir.display().to_string()),
        comment = ps_quote(&spec.comment),
    );
    if let Some(icon) = &spec.icon {
        script.push_str(&format!(
            "$Shortcut.IconLocation = {}; ",
            ps_quote(&icon.display().to_string())
        ));
    }
    script.push_str("$Shortcut.Save();");
    script
}

/// freedesktop desktop entry.
pub fn render_desktop_entry(spec: &ShortcutSpec) -> String {
    let mut entry = format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={name}\n\
         Comment={comment}\n\
         Exec=\"{exec}\"\n\
         Path={path}\n\
         Terminal=false\n\
         Categories=Science;Engineering;\n",
        name = spec.name,
        comment = spec.comment,
        exec = spec.target.display(),
        path = spec.working_dir.display(),
    );
    if let Some(icon) = &spec.icon {
        entry.push_str(&format!("Icon={}\n", icon.display()));
    }
    entry
}

/// Creates one shortcut per directory in `dirs`.
///
/// A shortcut that cannot be created is reported and skipped; the returned list
/// holds the ones that exist afterwards.
pub fn create_shortcuts(
    spec: &ShortcutSpec,
    dirs: &[PathBuf],
    platform: Platform,
    runner: &mut dyn CommandRunner,
) -> Vec<PathBuf> {
    if platform == Platform::MacOs {
        log_warn!("[Shortcuts] Shortcuts are not supported on macOS, skipping");
        return Vec::new();
    }

    let mut created = Vec::new();
    for dir in dirs {
        match create_one(spec, dir, platform, runner) {
            Ok(path) => {
                log_info!("[Shortcuts] Created {}", path.display().to_string().cyan());
                created.push(path);
            }
            Err(e) => log_warn!(
                "[Shortcuts] Could not create a shortcut in {}: {:#}",
                dir.display(),
                e
            ),
        }
    }
    created
}

fn create_one(
    spec: &ShortcutSpec,
    dir: &Path,
    platform: Platform,
    runner: &mut dyn CommandRunner,
) -> Result<PathBuf> {
    let path = shortcut_path(dir, &spec.name, platform)?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    if platform.is_windows() {
        let mut command = std::process::Command::new("powershell");
        command
            .arg("-NoProfile")
            .arg("-Command")
            .arg(powershell_shortcut_script(&path, spec));
        let output = runner.capture(&mut command).context("run powershell")?;
        if !output.succeeded() {
            bail!(
                "powershell failed with {}: {}",
                output.describe_exit(),
                output.stderr.trim()
            );
        }
    } else {
        fs::write(&path, render_desktop_entry(spec))
            .with_context(|| format!("write {}", path.display()))?;
        mark_trusted(&path)?;
    }
    log_debug!("[Shortcuts] {} -> {}", path.display(), spec.target.display());
    Ok(path)
}

// Desktop environments refuse to run `.desktop` files that are not executable.
#[cfg(unix)]
fn mark_trusted(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {}", path.display()))
}

#[cfg(not(unix))]
fn mark_trusted(_path: &Path) -> Result<()> {
    Ok(())
}

/// Single-quoted PowerShell string literal.
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::process::testing::{ScriptedRunner, exit, ok};

    fn spec() -> ShortcutSpec {
        ShortcutSpec {
            name: "FSAE Signal Analyzer".to_string(),
            target: PathBuf::from("/opt/fsae/FSAE_Signal_Analyzer"),
            working_dir: PathBuf::from("/opt/fsae"),
            icon: None,
            comment: "ITU Racing's signal analyzer".to_string(),
        }
    }

    #[test]
    fn shortcut_path_picks_the_platform_extension() {
        let base = PathBuf::from("menu");
        assert_eq!(
            shortcut_path(&base, "MyApp", Platform::Windows).unwrap(),
            base.join("MyApp.lnk")
        );
        assert_eq!(
            shortcut_path(&base, "MyApp", Platform::Linux).unwrap(),
            base.join("MyApp.desktop")
        );
    }

    #[test]
    fn shortcut_path_rejects_empty_name() {
        let err = shortcut_path(Path::new("menu"), " ", Platform::Linux).unwrap_err();
        assert!(err.to_string().contains("shortcut name is empty"));
    }

    #[test]
    fn powershell_script_escapes_single_quotes() {
        let script = powershell_shortcut_script(Path::new("C:/Menu/App.lnk"), &spec());
        assert!(script.contains("$Shortcut.Description = 'ITU Racing''s signal analyzer';"));
        assert!(script.ends_with("$Shortcut.Save();"));
        assert!(!script.contains("IconLocation"));
    }

    #[test]
    fn desktop_entry_includes_icon_when_configured() {
        let mut with_icon = spec();
        with_icon.icon = Some(PathBuf::from("/opt/fsae/icon.png"));
        let entry = render_desktop_entry(&with_icon);
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=\"/opt/fsae/FSAE_Signal_Analyzer\"\n"));
        assert!(entry.ends_with("Icon=/opt/fsae/icon.png\n"));
    }

    #[test]
    fn linux_shortcuts_are_written_to_every_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = vec![tmp.path().join("applications"), tmp.path().join("Desktop")];
        let mut runner = ScriptedRunner::new(|_| ok(""));

        let created = create_shortcuts(&spec(), &dirs, Platform::Linux, &mut runner);

        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|p| p.is_file()));
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn windows_shortcuts_go_through_powershell() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = vec![tmp.path().join("Programs")];
        let mut runner = ScriptedRunner::new(|_| ok(""));

        let created = create_shortcuts(&spec(), &dirs, Platform::Windows, &mut runner);

        assert_eq!(created, vec![tmp.path().join("Programs").join("FSAE Signal Analyzer.lnk")]);
        assert_eq!(runner.calls[0][0], "powershell");
        assert!(runner.calls[0][3].contains("WScript.Shell"));
    }

    #[test]
    fn failed_powershell_skips_that_shortcut() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = vec![tmp.path().join("Programs")];
        let mut runner = ScriptedRunner::new(|_| exit(1, "COM error"));

        assert!(create_shortcuts(&spec(), &dirs, Platform::Windows, &mut runner).is_empty());
    }

    #[test]
    fn macos_skips_shortcuts() {
        let mut runner = ScriptedRunner::new(|_| ok(""));
        let dirs = vec![PathBuf::from("/nonexistent")];
        assert!(create_shortcuts(&spec(), &dirs, Platform::MacOs, &mut runner).is_empty());
        assert!(runner.calls.is_empty());
    }
}
