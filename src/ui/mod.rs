/// User interface components
///
/// - Dress catalog panel with slider and category carousel (catalog.rs)
/// - Upload zones (intake.rs)
/// - Modal overlay and dialogs (modal.rs)
/// - Canvas-drawn success checkmark (checkmark.rs)
/// - Image handle cache shared by the views (images.rs)

pub mod catalog;
pub mod checkmark;
pub mod images;
pub mod intake;
pub mod modal;
