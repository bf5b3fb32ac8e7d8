// Rendering constants for the LightWAVE viewer

// Plot logical coordinate space (viewBox)
pub const VIEWBOX_WIDTH: u32 = 10001;
pub const VIEWBOX_HEIGHT: u32 = 5001;

// Drawable extent inside the viewBox
pub const PLOT_WIDTH: i64 = 10000;
pub const PLOT_HEIGHT: i64 = 4800;

pub const GRID_SPACING: i64 = 200;

// x-units per second of signal time
pub const X_UNITS_PER_SECOND: f64 = 1000.0;

// Vertical amplitude of one physical unit at scale 1
pub const TRACE_AMPLITUDE: f64 = -400.0;

// Annotation label bands
pub const ANN_Y_DEFAULT: i64 = 2000;
pub const ANN_Y_RHYTHM: i64 = 2200;
pub const ANN_Y_COMMENT: i64 = 1800;
pub const ANN_GAP_ABOVE: i64 = 150;
pub const ANN_GAP: i64 = 210;

// Time axis: five labels, 2000 units apart
pub const AXIS_TICKS: i64 = 5;
pub const AXIS_TICK_SPACING: i64 = 2000;

// Brackets mark units assumed because the record declares none
pub const DEFAULT_UNITS_LABEL: &str = "[mV]";

// WFDB default ADC gain, used when a signal reports none
pub const DEFAULT_GAIN: f64 = 200.0;

pub const DATA_UNAVAILABLE: &str = "Sorry, the data you requested are not available.";
pub const DBLIST_UNAVAILABLE: &str =
    "Sorry, the database list is temporarily unavailable.  Please try again later.";
