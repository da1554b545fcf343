//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`].

pub mod api;
pub mod markup;

pub use api::ApiProvider;
pub use markup::MarkupProvider;
