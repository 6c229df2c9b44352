use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use quiz_forge::api::{self, ApiResponse, AuditRequest, EvaluateRequest, GenerateRequest};
use quiz_forge::utils::logging;
use quiz_forge::{App, Config};

const SAMPLE_TEXT: &str = "
    Photosynthesis is a process used by plants and other organisms to convert light energy into chemical energy that,
    through cellular respiration, can later be released to fuel the organism's activities.
    The process creates Oxygen as a byproduct. Chlorophyll is the primary pigment involved.
";

#[derive(Debug, Parser)]
#[command(name = "quiz-forge", about = "Turn source text into a quiz and grade answers", version)]
struct Cli {
    /// TOML 配置文件（不指定时读取环境变量）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 运行完整审计流程：关键词 → 总结 → 测验
    Audit {
        /// 原文（与 --file 二选一，都不指定时使用示例文本）
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// 从文件读取原文
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// 会话 ID
        #[arg(long, default_value = "cli-session-1")]
        session_id: String,
    },
    /// 根据上下文生成一个问题
    Generate {
        #[arg(long)]
        context: String,
    },
    /// 评估学生答案
    Evaluate {
        #[arg(long)]
        student: String,
        #[arg(long)]
        reference: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config);

    let response = match cli.command {
        Commands::Audit {
            text,
            file,
            session_id,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("无法读取文件: {}", path.display()))?,
                (None, None) => SAMPLE_TEXT.to_string(),
            };
            run_audit(&app, text, session_id).await?
        }
        Commands::Generate { context } => {
            api::generate(&app, GenerateRequest { context: Some(context) }).await
        }
        Commands::Evaluate { student, reference } => {
            api::evaluate(
                &app,
                EvaluateRequest {
                    student_answer: Some(student),
                    reference_answer: Some(reference),
                },
            )
            .await
        }
    };

    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if !response.is_success() {
        anyhow::bail!("请求失败 (HTTP {})", response.status);
    }

    Ok(())
}

/// 运行审计流程，并把最终报告追加到报告文件
async fn run_audit(app: &App, text: String, session_id: String) -> Result<ApiResponse> {
    if text.trim().is_empty() {
        return Ok(api::audit(app, AuditRequest::default()).await);
    }

    let state = app.orchestrator().process_content(&session_id, &text).await;
    logging::append_report(&app.config().output_log_file, &state)?;

    info!("{}", "=".repeat(40));
    info!("FINAL REPORT");
    info!("1. Keywords Identified: {}", logging::format_keywords(state.extracted_keywords()));
    info!("2. Analyst Summary: {}", logging::truncate_text(state.analysis_report(), 200));
    info!("3. Generated Quiz: {} 条记录", state.generated_quiz().len());
    info!("{}", "=".repeat(40));

    Ok(api::audit_response(&state))
}
