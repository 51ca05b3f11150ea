pub mod json_loader;
pub mod pdf_loader;

pub use json_loader::{load_question_records, load_questions, parse_question_records, save_json};
pub use pdf_loader::find_pdf_files;
