//! Helpers shared by the HTML and Markdown formats.

pub mod css;
pub mod dom;
