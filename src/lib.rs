//! # SAT Question Generator
//!
//! 用大模型生成 SAT 数学选择题，并评估其准确性和"像不像真题"
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 题目实体、输入记录、评估结论、输出文件结构
//! - `Question` - 构造即校验：四个选项 A–D，答案必须是其中之一
//! - `QuestionRecord` - 文件和模型输出的原始形状，兼容历史字段名
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每次只发起一次模型调用
//! - `LlmService` - OpenAI 兼容接口，实现 `LanguageModel`
//! - `DelimiterExtractor` - 从自由文本中提取 JSON
//! - `QuestionGenerator` / `AccuracyEvaluator` / `AuthenticityJudge`
//! - `PdfQuestionExtractor` - 把 PDF 作为文件附件发给模型，抽取真题
//!
//! ### ③ 提示词（Prompts）
//! - `prompts/` - 生成、评估与真题抽取的提示词模板和少样本示例
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_generator` - 超过单次上限时分批生成
//! - `orchestrator/authenticity_evaluator` - 真题与生成题混合鉴别
//! - `orchestrator/real_question_collector` - 从 PDF 目录收集真题
//! - `orchestrator/app` - 子命令调度和输出
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::question::Question;
pub use models::record::QuestionRecord;
pub use orchestrator::{App, AuthenticityEvaluator, BatchGenerator};
pub use services::{LanguageModel, LlmService, MockLlm};
