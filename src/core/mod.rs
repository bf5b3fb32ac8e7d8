pub mod constants;
pub mod decoder;
pub mod error;
pub mod format;
pub mod markup;
pub mod plot_render;
pub mod text_render;
pub mod time;
pub mod window;
