pub mod integrity;
pub mod ranking;
