use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::warn;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 启动恢复：清理僵死的计算批次
///
/// 上次进程崩溃可能留下永远 running 的批次，挡住后续所有计算。
/// 超过配置时限的批次统一判 failed；已写入的草稿行保持原样。
async fn recover_stale_computations(storage: &Arc<dyn Storage>) {
    let stale_secs = AppConfig::get().grading.stale_computation_secs;
    match storage.fail_stale_computations(stale_secs).await {
        Ok(0) => {}
        Ok(count) => {
            warn!(
                "Marked {} stale computation(s) as failed (running > {}s)",
                count, stale_secs
            );
        }
        Err(e) => {
            warn!("Failed to recover stale computations: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储初始化与启动恢复
pub async fn prepare_server_startup() -> StartupContext {
    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 启动恢复
    recover_stale_computations(&storage).await;

    StartupContext { storage }
}
