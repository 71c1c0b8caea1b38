pub mod drip;
pub mod planning;
pub mod presets;
