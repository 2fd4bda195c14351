pub mod pitch_service;
pub mod report_writer;

pub use pitch_service::PitchService;
pub use report_writer::{sanitize_username, ReportWriter};
