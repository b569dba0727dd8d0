pub mod auto_filter;

pub use auto_filter::{AutoFilter, AutoFilterEvent, FilterOption};
