//! Kernel matrix construction

pub mod rbf;

pub use rbf::RbfKernel;
