//! Anonymization data models

pub mod entity;

pub use entity::{Entity, EntityCategory};
