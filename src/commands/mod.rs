mod difficulty;
mod misc;
mod music;

pub use difficulty::calculate_difficulty;
pub use misc::{help, ping, register, report};
pub use music::music;
