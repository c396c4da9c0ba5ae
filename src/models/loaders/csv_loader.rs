//! 订单源加载器
//!
//! 从固定 URL 下载订单 CSV（覆盖本地副本）并解析为有序的订单列表

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::models::order::OrderRow;

/// 下载订单 CSV 到本地，覆盖已存在的副本
pub async fn download_orders_csv(url: &str, local_path: &str) -> Result<()> {
    info!("⬇️ 正在下载订单 CSV: {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| AppError::feed_download_failed(url, e))?;
    let response = response
        .error_for_status()
        .map_err(|e| AppError::feed_download_failed(url, e))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::feed_download_failed(url, e))?;

    tokio::fs::write(local_path, &bytes)
        .await
        .with_context(|| format!("写入 CSV 失败: {}", local_path))?;

    info!("✓ CSV 已保存至: {} ({} 字节)", local_path, bytes.len());
    Ok(())
}

/// 从本地 CSV 文件解析订单列表，保留源文件中的行顺序
pub fn read_orders_from_csv(path: &Path) -> Result<Vec<OrderRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("无法打开 CSV 文件: {}", path.display()))?;
    parse_orders(file).with_context(|| format!("无法解析CSV文件: {}", path.display()))
}

/// 从任意数据源解析订单列表
///
/// 表头必须包含 Head, Body, Legs, Address 四列
pub fn parse_orders(reader: impl Read) -> Result<Vec<OrderRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut orders = Vec::new();
    for record in csv_reader.deserialize::<OrderRow>() {
        let order = record.map_err(AppError::from)?;
        orders.push(order);
    }

    Ok(orders)
}

/// 下载并解析订单源
pub async fn load_orders(config: &Config) -> Result<Vec<OrderRow>> {
    download_orders_csv(&config.orders_csv_url, &config.orders_csv_path).await?;

    let orders = read_orders_from_csv(Path::new(&config.orders_csv_path))?;
    info!("✓ 找到 {} 个待处理的订单", orders.len());

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_feed_order() {
        let csv = "\
Head,Body,Legs,Address
1,2,3,Address Road 28
4,4,6,Station Street 32
";
        let orders = parse_orders(csv.as_bytes()).expect("应该能解析合法 CSV");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].head, "1");
        assert_eq!(orders[0].body, "2");
        assert_eq!(orders[0].legs, "3");
        assert_eq!(orders[0].address, "Address Road 28");
        assert_eq!(orders[1].address, "Station Street 32");
    }

    #[test]
    fn preserves_free_form_legs_value() {
        let csv = "Head,Body,Legs,Address\n2,1,PN-3000-X,Somewhere 1\n";
        let orders = parse_orders(csv.as_bytes()).unwrap();
        assert_eq!(orders[0].legs, "PN-3000-X");
    }

    #[test]
    fn rejects_rows_missing_columns() {
        let csv = "Head,Body,Legs,Address\n1,2\n";
        assert!(parse_orders(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_feed_without_expected_headers() {
        let csv = "Kopf,Rumpf,Beine,Anschrift\n1,2,3,irgendwo\n";
        assert!(parse_orders(csv.as_bytes()).is_err());
    }

    #[test]
    fn empty_feed_yields_no_orders() {
        let csv = "Head,Body,Legs,Address\n";
        let orders = parse_orders(csv.as_bytes()).unwrap();
        assert!(orders.is_empty());
    }
}
