pub mod app;
pub mod image_utils;
pub mod presenter;
pub mod stage;
pub mod ui;
