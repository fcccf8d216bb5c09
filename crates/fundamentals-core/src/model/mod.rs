pub mod interval;
pub mod point;
pub mod range;

pub use interval::IntervalRecord;
pub use point::PointRecord;
pub use range::DateRange;
