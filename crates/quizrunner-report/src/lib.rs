//! quizrunner-report: Result certificate rendering.
//!
//! Turns a finalized `ResultExport` into a self-contained HTML document.

pub mod html;

pub use html::{generate_html, write_html_report};
