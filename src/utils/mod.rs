pub mod display;
pub mod logging;

pub use logging::truncate_text;
