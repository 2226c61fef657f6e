mod dirs;

pub use dirs::Directories;
