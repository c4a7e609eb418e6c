pub mod enums;
pub mod patient;
pub mod prediction;

pub use enums::*;
pub use patient::*;
pub use prediction::*;
