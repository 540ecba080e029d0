//! Data models for the visitor log

pub mod visitor;

// Re-export commonly used types
pub use visitor::{NewVisitor, Visitor, VisitorField, VisitorSummary};
