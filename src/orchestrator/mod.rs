//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责逐行调度和统计，是整个系统的"指挥中心"。
//!
//! ### `order_processor` - 订单重试处理器
//! - 按源顺序遍历 `Vec<OrderRow>`，一次只有一个在途订单
//! - 每个订单最多尝试固定次数（填表 → 校验）
//! - 成功后导出回执并让页面回到空白表单
//! - 尝试耗尽的订单不让整个运行失败，只记入报告
//!
//! ## 层次关系
//!
//! ```text
//! app (生命周期：浏览器、订单源、归档、统计)
//!     ↓
//! order_processor (处理 Vec<OrderRow>，重试状态机)
//!     ↓
//! workflow::OrderFlow (单个订单的 submit / export / reset)
//!     ↓
//! services (能力层：fill / validate / export / archive)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod order_processor;

// 重新导出主要类型
pub use order_processor::{process_order, process_orders, AbandonedOrder, RunReport};
