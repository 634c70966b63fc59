//! Format implementations
//!
//! This module contains all format implementations that convert between
//! node trees and their text representations.

pub mod html;
pub mod icons;
pub mod json;
pub mod markdown;
pub mod text;
pub mod treeviz;

pub use html::{HtmlFormat, HtmlOptions};
pub use json::JsonFormat;
pub use markdown::{MarkdownFormat, MarkdownOptions};
pub use text::{TextFormat, TextOptions};
pub use treeviz::{TreevizFormat, TreevizOptions};
