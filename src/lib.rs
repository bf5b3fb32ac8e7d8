// LightWAVE viewer
// Decoding and rendering of LightWAVE endpoint data

pub mod core;

// Re-export main types
pub use core::error::{LightwaveError, Result};
pub use core::format::{Annotation, FetchData, Outcome, RawSignal, RecordInfo, Signal};
pub use core::plot_render::render_plot;
pub use core::text_render::render_text;
pub use core::time::TimeFormatter;
pub use core::window::TimeWindow;

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(VIEWBOX_WIDTH, 10001);
        assert_eq!(VIEWBOX_HEIGHT, 5001);
        assert_eq!(DEFAULT_UNITS_LABEL, "[mV]");
    }
}
