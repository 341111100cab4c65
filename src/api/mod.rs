pub mod attendance;
pub mod status;
