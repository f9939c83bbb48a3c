//! `docdelta-core`: extraction pipeline and semantic diff engine.
//!
//! Pure engine crate: receives raw paragraphs and tables from a loader,
//! returns parsed documents and comparison results. No container or file IO.

pub mod anomaly;
pub mod assemble;
pub mod classify;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod patterns;
pub mod result;
pub mod semantic;
pub mod signature;
pub mod similarity;

pub use assemble::{compare, compare_using, compare_with, format_price_change};
pub use config::EngineConfig;
pub use document::build_document;
pub use error::CoreError;
pub use model::{ParsedDocument, PriceChange, RawDocument, Table};
pub use result::ComparisonResult;
