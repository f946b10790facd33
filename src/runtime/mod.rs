// Runtime objects instantiated from intermediates and shared through the cache

mod audio;
mod font;
mod shader;
mod texture;

pub use audio::AudioBuffer;
pub use font::{Font, GlyphMetrics};
pub use shader::Shader;
pub use texture::Texture2D;
