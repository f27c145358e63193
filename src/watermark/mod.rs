// Watermark module - date resolution, text rendering, and the batch driver
mod batch;
pub mod color;
mod error;
mod metadata;
mod process;
mod render;
mod types;

// Re-export public items
pub use batch::BatchProcessor;
pub use error::WatermarkError;
pub use metadata::resolve_date;
pub use process::process_file;
pub use render::{load_font, render_watermark};
pub use types::{BatchStats, Position, ProcessOptions, ProcessResult};

#[cfg(test)]
mod tests {
    mod batch_tests;
    mod metadata_tests;
    mod process_tests;
    mod render_tests;
}
