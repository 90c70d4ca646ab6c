//! Data models shared by the extraction and reconciliation stages.

pub mod config;
pub mod reference;
