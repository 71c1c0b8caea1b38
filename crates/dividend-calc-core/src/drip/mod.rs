pub mod presets;
pub mod projection;
pub mod validation;
