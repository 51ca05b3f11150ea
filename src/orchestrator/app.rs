//! 应用主流程 - 编排层
//!
//! ## 职责
//!
//! 把命令行子命令落到具体流程上：
//!
//! 1. **generate**：分批生成，可选逐题评估
//! 2. **batch**：生成后逐题评估，单题评估失败只记录不中断
//! 3. **evaluate**：加载文件中的题目并逐题评估
//! 4. **authenticity**：真题与生成题混合后做真伪鉴别
//! 5. **extract**：从 PDF 目录抽取真题，写成 `authenticity --real` 可用的文件
//!
//! 输出统一两种去向：终端（文本或 JSON）和 JSON 文件。
//! 持有唯一的 [`LanguageModel`] 句柄，下层服务共享它。

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cli::Commands;
use crate::config::Config;
use crate::error::AppError;
use crate::models::evaluation::AuthenticityReport;
use crate::models::loaders::{find_pdf_files, load_question_records, load_questions, save_json};
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use crate::models::report::{QuestionEntry, QuestionsFile, ResultsFile, RunSummary};
use crate::orchestrator::authenticity_evaluator::AuthenticityEvaluator;
use crate::orchestrator::batch_generator::BatchGenerator;
use crate::orchestrator::real_question_collector::RealQuestionCollector;
use crate::services::{
    AccuracyEvaluator, AuthenticityJudge, LanguageModel, LlmService, PdfQuestionExtractor,
    QuestionGenerator,
};
use crate::utils::display;
use crate::utils::logging::log_startup;

/// 单题评估失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEvaluationError {
    /// 立即返回错误
    Abort,
    /// 记录日志，该题不带评估结论
    Skip,
}

/// 应用主结构
pub struct App {
    config: Config,
    llm: Arc<dyn LanguageModel>,
}

impl App {
    /// 使用真实模型客户端初始化
    pub fn initialize(config: Config) -> Self {
        let llm: Arc<dyn LanguageModel> = Arc::new(LlmService::new(&config));
        Self::with_llm(config, llm)
    }

    /// 使用给定模型初始化（测试时传入 `MockLlm`）
    pub fn with_llm(config: Config, llm: Arc<dyn LanguageModel>) -> Self {
        Self { config, llm }
    }

    /// 执行一个子命令，结果输出到 stdout
    pub async fn run(&self, command: Commands) -> Result<()> {
        self.run_with_output(command, &mut std::io::stdout()).await
    }

    /// 执行一个子命令，结果写到 `out`
    ///
    /// 只有结果进入 `out`；进度和日志走 tracing（stderr），
    /// 所以 `--json` 时 `out` 里是完整的 JSON 文档
    pub async fn run_with_output<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        log_startup(command.name(), self.llm.model_name());

        match command {
            Commands::Generate {
                count,
                evaluate,
                json,
                output,
            } => {
                let on_error = evaluate.then_some(OnEvaluationError::Abort);
                let file = self.generate(count, on_error).await?;
                emit_entries(out, &file.questions, &file.summary, json)?;
                save_if_requested(output.as_deref(), &file).await
            }
            Commands::Batch { count, output } => {
                let file = self.generate(count, Some(OnEvaluationError::Skip)).await?;
                emit_entries(out, &file.questions, &file.summary, false)?;
                save_if_requested(output.as_deref(), &file).await
            }
            Commands::Evaluate { file, json, output } => {
                let results = self.evaluate_file(&file).await?;
                emit_entries(out, &results.results, &results.summary, json)?;
                save_if_requested(output.as_deref(), &results).await
            }
            Commands::Authenticity {
                real,
                generated,
                seed,
                output,
            } => {
                let report = self.authenticity(&real, &generated, seed).await?;
                writeln!(out, "{}", display::render_authenticity_report(&report))?;
                save_if_requested(output.as_deref(), &report).await
            }
            Commands::Extract { dir, output, limit } => {
                let records = self.extract(&dir, limit).await?;
                writeln!(out, "{}", display::render_extracted(&records))?;
                save_if_requested(Some(output.as_path()), &records).await
            }
        }
    }

    /// 生成 `count` 道题，`on_error` 为 `Some` 时逐题评估
    ///
    /// 分批生成中途失败时保留已完成的题目继续后续流程；
    /// 一道都没有完成则返回错误
    pub async fn generate(
        &self,
        count: usize,
        on_error: Option<OnEvaluationError>,
    ) -> Result<QuestionsFile> {
        let questions = self.generate_questions(count).await?;

        let entries = match on_error {
            Some(mode) => self.evaluate_all(questions, mode).await?,
            None => questions
                .into_iter()
                .map(|q| QuestionEntry::new(q, None))
                .collect(),
        };

        Ok(QuestionsFile::new(entries, on_error.is_some()))
    }

    async fn generate_questions(&self, count: usize) -> Result<Vec<Question>> {
        let generator = BatchGenerator::new(QuestionGenerator::new(self.llm.clone(), &self.config));
        info!("📝 开始生成 {} 道 SAT 数学题", count);

        match generator.generate(count).await {
            Ok(questions) => {
                info!("✅ 生成完成: {}/{}", questions.len(), count);
                Ok(questions)
            }
            Err(AppError::ChunkFailed(failure)) if !failure.completed.is_empty() => {
                error!("❌ {}", failure);
                warn!(
                    "⚠️ 保留已完成的 {} 道题继续（请求 {} 道）",
                    failure.completed.len(),
                    count
                );
                Ok(failure.completed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 加载文件并逐题评估，任一题传输失败即返回错误
    pub async fn evaluate_file(&self, path: &Path) -> Result<ResultsFile> {
        let questions = load_questions(path).await?;
        if questions.is_empty() {
            bail!("{} 中没有题目", path.display());
        }
        let entries = self.evaluate_all(questions, OnEvaluationError::Abort).await?;
        Ok(ResultsFile::new(entries))
    }

    async fn evaluate_all(
        &self,
        questions: Vec<Question>,
        mode: OnEvaluationError,
    ) -> Result<Vec<QuestionEntry>> {
        let evaluator = AccuracyEvaluator::new(self.llm.clone(), &self.config);
        let total = questions.len();
        let mut entries = Vec::with_capacity(total);

        for (idx, question) in questions.into_iter().enumerate() {
            info!("🧪 评估第 {}/{} 道题", idx + 1, total);
            let evaluation = match evaluator.evaluate(&question).await {
                Ok(result) => Some(result),
                Err(e) if mode == OnEvaluationError::Skip => {
                    warn!("⚠️ 第 {} 道题评估失败，已跳过: {}", idx + 1, e);
                    None
                }
                Err(e) => return Err(AppError::from(e).into()),
            };
            entries.push(QuestionEntry::new(question, evaluation));
        }

        Ok(entries)
    }

    /// 真伪鉴别；给定 `seed` 时打乱顺序可复现
    pub async fn authenticity(
        &self,
        real_path: &Path,
        generated_path: &Path,
        seed: Option<u64>,
    ) -> Result<AuthenticityReport> {
        let real = load_question_records(real_path).await?;
        let generated = load_question_records(generated_path).await?;
        info!("📁 真题 {} 道，生成题 {} 道", real.len(), generated.len());

        let evaluator =
            AuthenticityEvaluator::new(AuthenticityJudge::new(self.llm.clone(), &self.config));

        let report = match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                evaluator.evaluate_with_rng(&real, &generated, &mut rng).await
            }
            None => evaluator.evaluate(&real, &generated).await,
        }
        .map_err(AppError::from)?;

        Ok(report)
    }

    /// 从目录下的 PDF 收集最多 `limit` 道真题
    ///
    /// 没有 PDF，或所有文件都没抽出题目时返回错误，不写出空文件
    pub async fn extract(&self, dir: &Path, limit: usize) -> Result<Vec<QuestionRecord>> {
        let files = find_pdf_files(dir).await?;
        if files.is_empty() {
            bail!("{} 中没有 PDF 文件", dir.display());
        }

        let collector = RealQuestionCollector::new(PdfQuestionExtractor::new(
            self.llm.clone(),
            &self.config,
        ))
        .with_limit(limit);

        let records = collector.collect(&files).await;
        if records.is_empty() {
            bail!("未能从 {} 的 {} 个 PDF 中抽取到题目", dir.display(), files.len());
        }
        info!("✅ 共收集 {} 道真题", records.len());

        Ok(records)
    }
}

fn emit_entries<W: Write>(
    out: &mut W,
    entries: &[QuestionEntry],
    summary: &RunSummary,
    json: bool,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(entries)?)?;
        return Ok(());
    }

    let total = entries.len();
    for (idx, entry) in entries.iter().enumerate() {
        writeln!(out, "{}\n", display::render_entry(entry, idx + 1, total))?;
    }
    writeln!(out, "{}", display::render_run_summary(summary))?;
    Ok(())
}

async fn save_if_requested<T: Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    if let Some(path) = output {
        save_json(path, value).await?;
        info!("💾 结果已保存至: {}", path.display());
    }
    Ok(())
}
