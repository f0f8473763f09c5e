pub mod sampling;
pub mod features;
pub mod classification;
pub mod selection;
pub mod estimation;

pub use sampling::*;
pub use features::*;
pub use classification::*;
pub use selection::*;
pub use estimation::*;
