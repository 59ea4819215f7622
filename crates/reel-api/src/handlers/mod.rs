//! Request handlers.

pub mod health;
pub mod images;
pub mod metadata;
pub mod pdf;
pub mod story;
pub mod thumbnail;
pub mod translate;
pub mod tts;
pub mod videos;

pub use health::*;
pub use images::*;
pub use metadata::*;
pub use pdf::*;
pub use story::*;
pub use thumbnail::*;
pub use translate::*;
pub use tts::*;
pub use videos::*;

/// Fields that fall back to their defaults on a window request.
fn window_params(
    batch_index: Option<usize>,
    batch_size: Option<usize>,
    default_size: usize,
) -> (usize, usize) {
    (batch_index.unwrap_or(0), batch_size.unwrap_or(default_size))
}
