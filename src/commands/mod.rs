/// Command modules for tracksync
///
/// Each module parses its own arguments and renders results through the
/// `Output` trait; the logic lives in `core`.
pub mod sync;
