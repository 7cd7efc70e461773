pub mod events;
pub mod overlay;
