//! Route modules for the PDF Summarizer

pub mod health;
pub mod summarize;
