//! Display formatting for terminal output
//!
//! Renders key material in several numeric bases and formats the results
//! as text or JSON.

pub mod base;
pub mod key;

pub use base::{parse_int_literal, render, BaseForm, RenderedForms, BASES};
pub use key::{format_byte_listing, format_key_report, KeyReport};
