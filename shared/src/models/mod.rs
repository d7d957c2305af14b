//! Domain models for the Crop Disease Advisor

mod advisory;
mod classification;
mod crop;
mod report;
mod risk;
mod weather;

pub use advisory::*;
pub use classification::*;
pub use crop::*;
pub use report::*;
pub use risk::*;
pub use weather::*;
