use std::path::{Path, PathBuf};

use rmcp::model::CallToolResult;
use tokio::process::Command;

use super::{error_text, result_text};
use crate::config::{marker_path_in, Platform};

const APP_NAME: &str = "WayStation";
const DEFAULT_LOCAL_APP_DATA: &str = r"C:\Users\Default\AppData\Local";
const ACTIVATE_SCRIPT: &str = r#"tell application "WayStation" to activate"#;
const OPENED: &str = "WayStation app opened. Connect your apps there, then come back to use them here.";

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("Cannot prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: std::process::ExitStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Builds the command that brings the desktop app to the front.
pub fn launch_command(platform: &Platform, local_app_data: Option<PathBuf>) -> Result<LaunchCommand, LaunchError> {
    match platform {
        Platform::Windows => {
            let base = local_app_data.unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_APP_DATA));
            let exe = windows_exe_path(&base);
            Ok(LaunchCommand {
                program: "cmd".into(),
                args: vec!["/C".into(), "start".into(), String::new(), exe],
            })
        }
        Platform::MacOs => {
            let escaped = ACTIVATE_SCRIPT.replace('"', "\\\"");
            Ok(LaunchCommand {
                program: "sh".into(),
                args: vec!["-c".into(), format!("osascript -e \"{escaped}\"")],
            })
        }
        Platform::Unsupported(os) => Err(LaunchError::UnsupportedPlatform(os.clone())),
    }
}

// Joined with '\' explicitly so the path is right regardless of the build host
fn windows_exe_path(base: &Path) -> String {
    let base = base.to_string_lossy();
    format!(
        r"{}\Programs\{APP_NAME}\{APP_NAME}.exe",
        base.trim_end_matches(['\\', '/'])
    )
}

/// Creates the config dir and writes the onboarding marker once.
/// Returns true when the marker was written by this call.
pub fn ensure_onboarded(config_dir: &Path) -> Result<bool, LaunchError> {
    std::fs::create_dir_all(config_dir).map_err(|source| LaunchError::Io {
        path: config_dir.to_path_buf(),
        source,
    })?;

    let marker = marker_path_in(config_dir);
    if marker.exists() {
        return Ok(false);
    }
    std::fs::write(&marker, "true").map_err(|source| LaunchError::Io { path: marker.clone(), source })?;
    tracing::info!(path = %marker.display(), "Onboarding marker written");
    Ok(true)
}

async fn run(cmd: LaunchCommand) -> Result<(), LaunchError> {
    tracing::info!(program = %cmd.program, args = ?cmd.args, "Activating WayStation app");
    let status = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .status()
        .await
        .map_err(|source| LaunchError::Spawn { program: cmd.program.clone(), source })?;

    if !status.success() {
        return Err(LaunchError::ExitStatus { program: cmd.program, status });
    }
    Ok(())
}

async fn try_open(config_dir: &Path, platform: &Platform) -> Result<(), LaunchError> {
    ensure_onboarded(config_dir)?;
    // The marker is informational: the app is activated on every call
    let local_app_data = std::env::var_os("LOCALAPPDATA").map(PathBuf::from);
    run(launch_command(platform, local_app_data)?).await
}

pub async fn open_way_station(config_dir: &Path, platform: &Platform) -> CallToolResult {
    match try_open(config_dir, platform).await {
        Ok(()) => result_text(OPENED),
        Err(e) => {
            tracing::warn!(error = %e, "openWayStation failed");
            error_text(e.to_string())
        }
    }
}
