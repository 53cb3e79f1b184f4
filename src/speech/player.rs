//! 本地音频播放
//!
//! 调用平台播放器子进程并等待其退出（块与块之间不重叠）。

use std::path::Path;

use tokio::process::Command;

/// 平台默认播放器命令
pub fn default_player() -> &'static str {
    if cfg!(target_os = "macos") {
        "afplay"
    } else {
        "mpg123"
    }
}

/// 播放单个音频文件，等待播放器进程退出
pub async fn play_file(player: &str, path: &Path) -> Result<(), String> {
    let status = Command::new(player)
        .arg(path)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|e| format!("Failed to start audio player '{}': {}", player, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("Audio player '{}' exited with {}", player, status))
    }
}
