use serde::{Deserialize, Serialize};

/// 一行订单数据
///
/// 字段名与 CSV 表头（Head, Body, Legs, Address）一一对应，读入后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    /// 机器人头部型号
    #[serde(rename = "Head")]
    pub head: String,
    /// 机器人身体型号
    #[serde(rename = "Body")]
    pub body: String,
    /// 腿部配件编号（自由格式字符串）
    #[serde(rename = "Legs")]
    pub legs: String,
    /// 收货地址
    #[serde(rename = "Address")]
    pub address: String,
}

impl Default for OrderRow {
    fn default() -> Self {
        Self {
            head: String::new(),
            body: String::new(),
            legs: String::new(),
            address: String::new(),
        }
    }
}

/// 成功下单后的回执
#[derive(Debug, Clone)]
pub struct Receipt {
    /// 回执容器的内部 HTML
    pub html: String,
    /// 从回执中提取的订单编号
    pub order_number: String,
}
