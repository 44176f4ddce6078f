mod tick;

pub use tick::{FixedTimestep, step};
