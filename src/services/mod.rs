pub mod answer_parser;
pub mod bulk_prompt;
pub mod failure_writer;
pub mod llm_service;
pub mod report_formatter;
pub mod spreadsheet_writer;

pub use answer_parser::{extract_first_value, strip_code_fences};
pub use failure_writer::FailureWriter;
pub use llm_service::LlmService;
pub use report_formatter::{format_report, FormatSummary};
