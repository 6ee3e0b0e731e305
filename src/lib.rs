//! Core entry point for the report_composer crate.
//!
//! Collects report metadata from form input, previews it as MongoDB extended
//! JSON, renders a PDF report and submits the plain document to a service.

pub mod builder;
pub mod clipboard;
pub mod composer;
pub mod config;
pub mod datefmt;
pub mod document;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod form;
pub mod keywords;
pub mod model;
pub mod preview;
pub mod report_pdf;
pub mod richtext;
pub mod submit;

pub use composer::{Command, Composer, Notice};
pub use document::{ReportDocument, Responsible, RevisionEntry};
pub use error::{ComposerError, Result};
pub use form::FormState;
pub use keywords::KeywordSet;
