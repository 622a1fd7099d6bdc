// Text measurement and line wrapping for the PDF renderer.
// Widths come from static AFM tables so layout is deterministic and needs no font files.

pub mod font_metrics;
pub mod wrap;

// Re-export the public API consumed by the renderer.
pub use font_metrics::{get_metrics, letter_geometry, PageGeometry, Typeface};
pub use wrap::{wrap_spans, Span, WrappedLine};
