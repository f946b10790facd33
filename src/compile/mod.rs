// Intermediate compilers: turn source files and specifications into on-disk artifacts

pub mod audio;
pub mod font;
pub mod shader;
pub mod texture;
