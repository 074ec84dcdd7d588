/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Upload intake and drop interpretation (intake.rs)
/// - Preview rendering for uploaded images (preview.rs)
/// - Dress catalog filtering, paging and scrolling (catalog.rs)
/// - The fitting session state machine (fitting.rs)
/// - Notification dialog and success marker (notice.rs)

pub mod catalog;
pub mod data;
pub mod fitting;
pub mod intake;
pub mod notice;
pub mod preview;
