//! 订单重试处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **遍历订单**：按源顺序循环处理 `Vec<OrderRow>`，严格串行
//! 2. **重试状态机**：每个订单最多尝试固定次数，失败记录后重置页面再试
//! 3. **回执导出**：校验通过后立即导出，导出异常不参与重试
//! 4. **静默放弃**：尝试耗尽的订单不向上抛错，收集进运行报告
//! 5. **统计输出**：记录完成/放弃数量

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::order::OrderRow;
use crate::utils::logging::truncate_text;
use crate::workflow::{OrderCtx, OrderFlow, ProcessResult};

/// 被放弃的订单记录
#[derive(Debug, Clone)]
pub struct AbandonedOrder {
    /// 订单在源中的序号（从1开始）
    pub order_index: usize,
    /// 收货地址（用于人工对账）
    pub address: String,
    /// 消耗的尝试次数
    pub attempts: usize,
    /// 最后一次失败的消息
    pub last_error: String,
}

/// 整个运行的处理报告
#[derive(Debug, Default)]
pub struct RunReport {
    /// 订单总数
    pub total: usize,
    /// 完成（回执已导出）的订单数
    pub completed: usize,
    /// 被放弃的订单
    pub abandoned: Vec<AbandonedOrder>,
}

impl RunReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

/// 按源顺序处理所有订单
///
/// 一次只有一个在途订单；订单之间互不影响，放弃的订单不会中断循环。
/// 只有回执导出异常和浏览器级故障才会让整个运行失败。
pub async fn process_orders(
    driver: &PageDriver,
    flow: &OrderFlow,
    orders: &[OrderRow],
    config: &Config,
) -> Result<RunReport> {
    let mut report = RunReport::new(orders.len());

    for (index, row) in orders.iter().enumerate() {
        let ctx = OrderCtx::new(index + 1, orders.len());
        log_order_start(&ctx, row);

        match process_order(driver, flow, row, &ctx, config).await? {
            ProcessResult::Success { order_number } => {
                report.completed += 1;
                info!("{} ✅ 订单完成: {}\n", ctx, order_number);
            }
            ProcessResult::Abandoned {
                attempts,
                last_error,
            } => {
                warn!(
                    "{} ⚠️ 已尝试 {} 次，放弃此订单（最后错误: {}）\n",
                    ctx, attempts, last_error
                );
                report.abandoned.push(AbandonedOrder {
                    order_index: ctx.order_index,
                    address: row.address.clone(),
                    attempts,
                    last_error,
                });
                // 给下一个订单留一张干净的表单
                flow.reset(driver).await?;
            }
        }
    }

    Ok(report)
}

/// 处理单个订单的重试状态机
///
/// 每轮：填表 → 校验；校验通过则导出回执、点"再下一单"并终止循环。
/// 填表或校验失败则记录尝试序号和消息，重置页面后进入下一轮。
/// 所有轮次耗尽后返回 `Abandoned`，不向上抛错。
pub async fn process_order(
    driver: &PageDriver,
    flow: &OrderFlow,
    row: &OrderRow,
    ctx: &OrderCtx,
    config: &Config,
) -> Result<ProcessResult> {
    let max_attempts = config.max_order_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match flow.submit(driver, row).await {
            Ok(()) => {
                // 回执导出和页面复位的异常不参与重试，直接向上传播
                let receipt = flow.export(driver).await?;
                flow.finish_order(driver).await?;
                return Ok(ProcessResult::Success {
                    order_number: receipt.order_number,
                });
            }
            Err(e) => {
                last_error = e.to_string();
                error!("{} Attempt #{}: Error {}", ctx, attempt, last_error);

                if attempt < max_attempts {
                    flow.reset(driver).await?;
                }
            }
        }
    }

    Ok(ProcessResult::Abandoned {
        attempts: max_attempts,
        last_error,
    })
}

// ========== 日志辅助函数 ==========

fn log_order_start(ctx: &OrderCtx, row: &OrderRow) {
    info!("{} {}", ctx, "─".repeat(30));
    info!(
        "{} 开始处理: head={} body={} legs={}",
        ctx, row.head, row.body, row.legs
    );
    info!("{} 地址: {}", ctx, truncate_text(&row.address, 40));
}
