mod decimal;
mod timestamp;

pub use decimal::Decimal;
pub use timestamp::{Timestamp, TruncUnit};
