pub mod aggregate;
pub mod columns;
pub mod error;
pub mod report;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;
