//! Text-level transforms applied around rendering.

mod jsx;
mod typographer;

pub use jsx::html_to_jsx;
pub use typographer::smarten;
