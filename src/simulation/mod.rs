mod glitch;

pub use glitch::{GlitchConfig, GlitchSource, GlitchStats};
