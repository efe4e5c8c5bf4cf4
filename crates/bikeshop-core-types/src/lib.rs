//! Core types shared across the bikeshop crates
//!
//! - **Schema constants**: canonical field keys and event names used by the
//!   logging facility
//! - **Sensitive data**: `Sensitive<T>` marker for redacting personal data
//!   (owner phone numbers and emails) in logs

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
