//! 日志工具模块
//!
//! 提供 tracing 初始化、运行日志文件和统计输出的辅助函数

use std::fs::{self, OpenOptions};
use std::io::Write;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunReport;

/// 初始化 tracing 日志
///
/// 默认 info 级别，可用 RUST_LOG 覆盖；重复调用只有第一次生效
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化运行日志文件（覆盖旧内容，写入表头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n订单处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单提交模式");
    info!("📋 订单页面: {}", config.order_url);
    info!("📊 每单最大尝试次数: {}", config.max_order_attempts);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息，并追加到运行日志文件
pub fn print_final_stats(report: &RunReport, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成: {}/{}", report.completed, report.total);
    info!("❌ 放弃: {}", report.abandoned.len());
    for abandoned in &report.abandoned {
        info!(
            "   订单 {} ({}): 尝试 {} 次, 最后错误: {}",
            abandoned.order_index,
            truncate_text(&abandoned.address, 30),
            abandoned.attempts,
            abandoned.last_error
        );
    }
    info!("{}", "=".repeat(60));

    if let Err(e) = append_stats_to_log_file(report, &config.output_log_file) {
        tracing::warn!("写入运行日志失败 {}: {}", config.output_log_file, e);
    } else {
        info!("\n日志已保存至: {}", config.output_log_file);
    }
}

/// 把统计信息追加到运行日志文件
fn append_stats_to_log_file(report: &RunReport, log_file_path: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(file, "完成: {}/{}", report.completed, report.total)?;
    writeln!(file, "放弃: {}", report.abandoned.len())?;
    for abandoned in &report.abandoned {
        writeln!(
            file,
            "订单 {} | 地址: {} | 尝试 {} 次 | 最后错误: {}",
            abandoned.order_index, abandoned.address, abandoned.attempts, abandoned.last_error
        )?;
    }

    Ok(())
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::AbandonedOrder;

    #[test]
    fn truncates_only_long_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("0123456789A", 10), "0123456789...");
    }

    #[test]
    fn log_file_gets_header_then_stats() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("output.txt");
        let log_path_str = log_path.to_str().unwrap();

        init_log_file(log_path_str).unwrap();

        let report = RunReport {
            total: 2,
            completed: 1,
            abandoned: vec![AbandonedOrder {
                order_index: 2,
                address: "Station Street 32".to_string(),
                attempts: 3,
                last_error: "OrderError".to_string(),
            }],
        };
        append_stats_to_log_file(&report, log_path_str).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("订单处理日志"));
        assert!(content.contains("完成: 1/2"));
        assert!(content.contains("Station Street 32"));
        assert!(content.contains("OrderError"));
    }
}
