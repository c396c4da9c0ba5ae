//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的各个流程步骤
//!
//! 步骤划分：
//! 1. submit：填表 → 校验（失败可重试）
//! 2. export：回执导出（失败不重试，直接向上传播）
//! 3. finish_order / reset：把页面恢复到空白表单

use anyhow::Result;
use chromiumoxide::Page;
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::order::{OrderRow, Receipt};
use crate::services::{FormFiller, OrderValidator, ReceiptExporter};

/// 单个订单的处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 在重试预算内完成，回执已导出
    Success {
        /// 回执中的订单编号
        order_number: String,
    },
    /// 所有尝试均失败，订单被放弃
    Abandoned {
        /// 消耗的尝试次数
        attempts: usize,
        /// 最后一次失败的消息
        last_error: String,
    },
}

/// 订单处理流程
///
/// - 编排单个订单的各个步骤
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct OrderFlow {
    form_filler: FormFiller,
    validator: OrderValidator,
    exporter: ReceiptExporter,
    order_url: String,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    ///
    /// `render_page` 是专用的 PDF 渲染页，与订单页相互独立
    pub fn new(config: &Config, render_page: Page) -> Self {
        Self {
            form_filler: FormFiller::new(),
            validator: OrderValidator::new(),
            exporter: ReceiptExporter::new(render_page, config),
            order_url: config.order_url.clone(),
        }
    }

    /// 提交一次订单：填表 + 校验
    ///
    /// 表单元素缺失和错误横幅都以 Err 返回，由重试循环消化
    pub async fn submit(&self, driver: &PageDriver, row: &OrderRow) -> Result<()> {
        self.form_filler.fill(driver, row).await?;
        self.validator.check(driver).await
    }

    /// 导出当前页面上的回执
    ///
    /// 回执格式异常在这里抛出，且不参与重试
    pub async fn export(&self, driver: &PageDriver) -> Result<Receipt> {
        self.exporter.export(driver).await
    }

    /// 成功导出后点击"再下一单"，页面回到空白表单
    pub async fn finish_order(&self, driver: &PageDriver) -> Result<()> {
        self.form_filler.order_another(driver).await?;
        self.form_filler.close_announcement(driver).await?;
        Ok(())
    }

    /// 重置页面到空白表单：重新加载订单页并关闭公告弹窗
    ///
    /// 失败的表单不原样重提，每次尝试都从干净页面开始
    pub async fn reset(&self, driver: &PageDriver) -> Result<()> {
        debug!("重置订单页面: {}", self.order_url);
        driver.goto(&self.order_url).await?;
        self.form_filler.close_announcement(driver).await?;
        Ok(())
    }

    /// 关闭站点公告弹窗（应用启动后调用一次）
    pub async fn dismiss_announcement(&self, driver: &PageDriver) -> Result<()> {
        self.form_filler.close_announcement(driver).await
    }
}
