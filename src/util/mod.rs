/// Utility for creating mock trait implementations.
#[cfg(test)]
pub mod mock;

/// Stream traits for request body handles.
pub mod stream;
