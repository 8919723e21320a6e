//! Report Assembler: prompt composition, completion call and reply parsing

pub mod generator;
pub mod prompt;

pub use generator::{parse_report, PointAnalysis, ReportContent, ReportError, ReportGenerator};
