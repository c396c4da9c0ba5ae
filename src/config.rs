/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 机器人订单页面 URL
    pub order_url: String,
    /// 订单 CSV 源 URL
    pub orders_csv_url: String,
    /// CSV 本地保存路径（每次运行覆盖）
    pub orders_csv_path: String,
    /// 输出目录（PDF 与 ZIP）
    pub output_dir: String,
    /// ZIP 归档文件路径
    pub archive_path: String,
    /// 每个订单的最大提交次数
    pub max_order_attempts: usize,
    /// 每次页面操作后的减速延迟（毫秒）
    pub slow_motion_ms: u64,
    /// 是否连接到已运行的浏览器（否则启动无头浏览器）
    pub attach_to_browser: bool,
    /// 浏览器调试端口（仅连接模式使用）
    pub browser_debug_port: u16,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: "orders.csv".to_string(),
            output_dir: "output".to_string(),
            archive_path: "output/orders.zip".to_string(),
            max_order_attempts: 3,
            slow_motion_ms: 100,
            attach_to_browser: false,
            browser_debug_port: 2001,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            order_url: std::env::var("ORDER_URL").unwrap_or(default.order_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(default.orders_csv_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            archive_path: std::env::var("ARCHIVE_PATH").unwrap_or(default.archive_path),
            max_order_attempts: std::env::var("MAX_ORDER_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_order_attempts),
            slow_motion_ms: std::env::var("SLOW_MOTION_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.slow_motion_ms),
            attach_to_browser: std::env::var("ATTACH_TO_BROWSER").ok().and_then(|v| v.parse().ok()).unwrap_or(default.attach_to_browser),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_order_site() {
        let config = Config::default();
        assert_eq!(config.max_order_attempts, 3);
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.archive_path, "output/orders.zip");
        assert!(config.orders_csv_url.ends_with("orders.csv"));
        assert!(config.order_url.contains("robot-order"));
    }
}
