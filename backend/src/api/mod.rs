pub mod channels;
pub mod video;

pub use channels::*;
pub use video::*;
