//! 基础设施层（Infrastructure Layer）
//!
//! 持有稀缺资源（Page），只暴露能力

pub mod page_driver;

pub use page_driver::PageDriver;
