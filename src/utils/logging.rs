/// 日志工具模块
///
/// 提供 tracing 初始化、审计报告文件输出和日志格式化的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::SessionState;

/// 初始化 tracing
///
/// 默认级别为 info（`verbose` 时为 debug），可通过 `RUST_LOG` 覆盖。
/// 重复调用是安全的（测试中多次初始化时忽略错误）。
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
    info!("🚀 程序启动 - Quiz Forge");
    info!("🤖 LLM 模型: {}", config.llm_model_name);
    info!("📐 Embedding 模型: {}", config.embedding_model_name);
    info!("❓ 问题生成模型: {}", config.qg_model_name);
    info!("{}", "=".repeat(60));
}

/// 初始化审计报告文件（文件不存在时写入表头）
///
/// # 参数
/// - `log_file_path`: 报告文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    if fs::metadata(log_file_path).is_ok() {
        return Ok(());
    }
    let log_header = format!(
        "{}\n内容审计报告 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 追加一次流水线运行的最终报告
///
/// # 参数
/// - `log_file_path`: 报告文件路径
/// - `state`: 已完成的会话状态
pub fn append_report(log_file_path: &str, state: &SessionState) -> AppResult<()> {
    init_log_file(log_file_path)?;

    let quiz_json = serde_json::to_string_pretty(state.generated_quiz())?;
    let report = format!(
        "{}\n会话: {} ({})\n{}\n1. Keywords Identified: {}\n\n2. Analyst Summary:\n{}\n\n3. Generated Quiz (JSON):\n{}\n\n",
        "─".repeat(60),
        state.session_id(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "─".repeat(60),
        format_keywords(state.extracted_keywords()),
        state.analysis_report(),
        quiz_json
    );

    let mut file = OpenOptions::new().append(true).open(log_file_path)?;
    file.write_all(report.as_bytes())?;

    info!("📝 报告已追加至: {}", log_file_path);
    Ok(())
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
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

/// 关键词列表的展示形式：`['Chlorophyll', 'Oxygen']`
///
/// 用于追踪日志、prompt 和报告，保持同一种写法。
pub fn format_keywords(keywords: &[String]) -> String {
    let quoted: Vec<String> = keywords.iter().map(|k| format!("'{}'", k)).collect();
    format!("[{}]", quoted.join(", "))
}
