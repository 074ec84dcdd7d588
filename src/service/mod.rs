/// Remote inference service
///
/// This module handles:
/// - Multipart requests to the compose and segment endpoints (client.rs)
/// - Wire formats and their conversion into domain values (wire.rs)
/// - Base64 data URLs carrying images (data_url.rs)

pub mod client;
pub mod data_url;
pub mod wire;

pub use client::{DressRef, ServiceClient};
pub use wire::{BackgroundRemoval, CompositeResult};
