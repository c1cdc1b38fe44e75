mod prediction;

pub use prediction::*;
