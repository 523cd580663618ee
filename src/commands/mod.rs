pub mod extract;
pub mod outline;
