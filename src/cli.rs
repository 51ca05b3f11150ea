//! 命令行参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "satgen", version, about = "SAT math question generator and evaluator")]
pub struct Cli {
    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate new SAT math questions
    Generate {
        /// Number of questions to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Run accuracy evaluation on each generated question
        #[arg(long)]
        evaluate: bool,
        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Write the result to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate questions and evaluate every one of them
    Batch {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate the accuracy of questions stored in a JSON file
    Evaluate {
        file: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Measure how well the model tells real questions from generated ones
    Authenticity {
        /// JSON file with real SAT questions
        #[arg(long)]
        real: PathBuf,
        /// JSON file with generated questions
        #[arg(long)]
        generated: PathBuf,
        /// Seed for the shuffle, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract real SAT questions from a folder of practice PDFs
    Extract {
        /// Folder searched recursively for *.pdf files
        dir: PathBuf,
        /// Where to write the extracted questions
        #[arg(short, long, default_value = "data/real_questions.json")]
        output: PathBuf,
        /// Stop once this many questions have been collected
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Generate { .. } => "generate",
            Commands::Batch { .. } => "batch",
            Commands::Evaluate { .. } => "evaluate",
            Commands::Authenticity { .. } => "authenticity",
            Commands::Extract { .. } => "extract",
        }
    }
}
