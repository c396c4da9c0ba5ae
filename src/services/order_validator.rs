//! 订单校验服务 - 业务能力层
//!
//! 只负责"检查页面有没有错误横幅"能力，这是判定提交成功的唯一关口

use anyhow::Result;
use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::PageDriver;

/// 提交失败时页面显示的红色横幅
const DANGER_ALERT: &str = "div.alert.alert-danger";

/// 订单校验服务
///
/// 职责：
/// - 检查当前页面是否出现错误横幅
/// - 不区分错误原因
pub struct OrderValidator;

impl OrderValidator {
    /// 创建新的订单校验服务
    pub fn new() -> Self {
        Self
    }

    /// 校验上一次提交
    ///
    /// 页面上出现可见错误横幅时返回固定的 OrderError 条件，否则正常返回
    pub async fn check(&self, driver: &PageDriver) -> Result<()> {
        if driver.is_visible(DANGER_ALERT).await? {
            let banner = driver
                .inner_text(DANGER_ALERT)
                .await?
                .unwrap_or_default();
            return Err(AppError::order_rejected(banner).into());
        }

        debug!("未发现错误横幅，订单有效");
        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
