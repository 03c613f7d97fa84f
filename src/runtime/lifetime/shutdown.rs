use tokio::signal;
use tracing::warn;

/// 等待停机信号（Ctrl+C 或 SIGTERM）
///
/// 容器编排环境通过 SIGTERM 触发滚动更新，须与交互式 Ctrl+C 同等对待。
pub async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM");
        tokio::select! {
            _ = signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
    }

    warn!("Shutdown signal received, initiating graceful shutdown...");
}
