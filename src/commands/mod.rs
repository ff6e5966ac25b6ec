pub mod extract;
pub mod show;
pub mod status;
