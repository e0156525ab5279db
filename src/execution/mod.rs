// Order placement
pub mod submitter;

pub use submitter::{OrderOutcome, OrderSubmitter};
