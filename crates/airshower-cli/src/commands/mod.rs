pub mod info;
pub mod plot;
