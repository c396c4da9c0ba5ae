//! 表单填写服务 - 业务能力层
//!
//! 只负责"把一行订单填进表单并提交"能力，不关心重试和回执

use anyhow::Result;
use tracing::{debug, info};

use crate::infrastructure::PageDriver;
use crate::models::order::OrderRow;

/// 头部型号下拉框
const HEAD_SELECT: &str = "#head";
/// 腿部配件编号输入框（没有 id，只能按占位符定位）
const LEGS_INPUT: &str = r#"input[placeholder="Enter the part number for the legs"]"#;
/// 收货地址输入框
const ADDRESS_INPUT: &str = "#address";
/// 提交订单按钮
const ORDER_BUTTON: &str = "#order";
/// 再下一单按钮
const ORDER_ANOTHER_BUTTON: &str = "#order-another";
/// 公告弹窗的确认按钮
const MODAL_OK_BUTTON: &str = ".modal .btn-dark";

/// 表单填写服务
///
/// 职责：
/// - 按行数据填写订单表单并点击提交
/// - 关闭站点公告弹窗
/// - 只处理单个 Order
/// - 不关心流程顺序
pub struct FormFiller;

impl FormFiller {
    /// 创建新的表单填写服务
    pub fn new() -> Self {
        Self
    }

    /// 填写订单表单并提交
    ///
    /// 依次：选头部、点身体单选框、填腿部编号、填地址、点提交。
    /// 任何一个目标元素缺失都会向上抛错，由重试循环消化。
    pub async fn fill(&self, driver: &PageDriver, row: &OrderRow) -> Result<()> {
        info!("📝 正在填写订单表单...");

        driver.select_option(HEAD_SELECT, &row.head).await?;
        driver.click(&body_radio_selector(&row.body)).await?;
        driver.fill(LEGS_INPUT, &row.legs).await?;
        driver.fill(ADDRESS_INPUT, &row.address).await?;
        driver.click(ORDER_BUTTON).await?;

        debug!("表单已提交");
        Ok(())
    }

    /// 点击"再下一单"，让页面回到空白表单
    pub async fn order_another(&self, driver: &PageDriver) -> Result<()> {
        driver.click(ORDER_ANOTHER_BUTTON).await?;
        Ok(())
    }

    /// 关闭站点公告弹窗（弹窗不存在时静默返回）
    pub async fn close_announcement(&self, driver: &PageDriver) -> Result<()> {
        if driver.is_visible(MODAL_OK_BUTTON).await? {
            driver.click(MODAL_OK_BUTTON).await?;
            debug!("公告弹窗已关闭");
        }
        Ok(())
    }
}

impl Default for FormFiller {
    fn default() -> Self {
        Self::new()
    }
}

/// 身体型号对应的单选框选择器
fn body_radio_selector(body: &str) -> String {
    format!(r#"input[type="radio"][value="{}"]"#, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_radio_selector_targets_value() {
        assert_eq!(
            body_radio_selector("2"),
            r#"input[type="radio"][value="2"]"#
        );
    }
}
