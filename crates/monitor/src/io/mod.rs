pub mod decode;
pub mod text;

pub use decode::*;
pub use text::*;
