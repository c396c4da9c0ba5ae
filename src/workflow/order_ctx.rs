//! 订单处理上下文
//!
//! 封装"我正在处理第几个订单"这一信息

use std::fmt::Display;

/// 订单处理上下文
///
/// 只携带日志显示所需的定位信息，不携带订单数据本身
#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 订单在源中的序号（从1开始）
    pub order_index: usize,

    /// 订单总数
    pub total_orders: usize,
}

impl OrderCtx {
    /// 创建新的订单上下文
    pub fn new(order_index: usize, total_orders: usize) -> Self {
        Self {
            order_index,
            total_orders,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[订单 {}/{}]", self.order_index, self.total_orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_position_in_feed() {
        let ctx = OrderCtx::new(3, 10);
        assert_eq!(ctx.to_string(), "[订单 3/10]");
    }
}
