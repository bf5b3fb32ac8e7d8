pub mod viewer_model;
