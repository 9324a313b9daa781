pub mod dirs;
pub mod process;
