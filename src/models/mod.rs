pub mod evaluation;
pub mod loaders;
pub mod question;
pub mod record;
pub mod report;

pub use evaluation::{
    AuthenticityPrediction, AuthenticityReport, AuthenticitySummary, EvaluationResult,
    SubsetSummary,
};
pub use loaders::{load_question_records, load_questions, save_json};
pub use question::{Question, CHOICE_LABELS};
pub use record::QuestionRecord;
pub use report::{QuestionEntry, QuestionsFile, ResultsFile, RunSummary};
