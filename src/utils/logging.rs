/// 日志工具模块
///
/// 初始化 tracing 订阅者，并提供批量导入时的日志输出辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时默认 `info`，`verbose` 为真时为 `debug`。
/// 重复调用不会报错（测试中会多次初始化）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 菜谱笔记客户端启动");
    info!("🌐 后端地址: {}", config.base_url);
    info!(
        "📮 接口风格: {:?} / 图片提交: {:?} / CSRF: {}",
        config.endpoint_style,
        config.image_mode,
        if config.csrf_enabled { "启用" } else { "停用" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录草稿加载信息
///
/// # 参数
/// - `total`: 草稿总数
/// - `max_concurrent`: 每批数量
pub fn log_drafts_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待导入的菜谱草稿", total);
    info!("📋 将以每批 {} 个的方式提交", max_concurrent);
}

pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始提交第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批草稿: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `rejected`: 校验未通过数量
/// - `failed`: 请求或读取失败数量
/// - `total`: 总数
pub fn print_final_stats(success: usize, rejected: usize, failed: usize, total: usize) {
    info!("{}", "=".repeat(60));
    info!("📊 导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("📝 校验未通过: {}", rejected);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
