/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅者
///
/// `RUST_LOG` 优先；未设置时默认 `info`，详细模式为 `debug`。
/// 日志写到 stderr，stdout 只留给结果输出（`--json` 可直接重定向）。
/// 重复初始化时静默忽略。
///
/// # 参数
/// - `verbose`: 是否输出详细日志
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 当前执行的子命令
/// - `model_name`: 使用的模型名称
pub fn log_startup(command: &str, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 SAT 数学题生成器启动 - {}", command);
    info!("🤖 模型: {}", model_name);
    info!(
        "🕐 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `chunk_num`: 批次编号（从 1 开始）
/// - `total_chunks`: 批次总数
/// - `chunk_size`: 本批题目数
/// - `total`: 请求的题目总数
pub fn log_chunk_start(chunk_num: usize, total_chunks: usize, chunk_size: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始生成第 {}/{} 批", chunk_num, total_chunks);
    info!("📄 本批 {} 道题 / 共 {} 道", chunk_size, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_chunk_complete(chunk_num: usize, produced: usize, requested: usize) {
    info!("✓ 第 {} 批完成: 生成 {}/{}", chunk_num, produced, requested);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("方程求解", 2), "方程...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
