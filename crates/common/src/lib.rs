pub mod types;

pub use types::OrderReference;
