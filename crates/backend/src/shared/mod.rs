pub mod config;
pub mod data;
pub mod excel;
pub mod legacy_font;
