pub mod prediction;
pub mod price;
pub mod trading;

pub use prediction::*;
pub use price::*;
pub use trading::*;
