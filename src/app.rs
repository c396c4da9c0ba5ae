//! 应用生命周期
//!
//! 初始化浏览器与各层对象，按顺序执行：关闭公告弹窗 → 加载订单源 →
//! 逐行处理 → 归档回执 → 输出统计

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::warn;

use crate::browser;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::load_orders;
use crate::orchestrator::process_orders;
use crate::services::Archiver;
use crate::utils::logging;
use crate::workflow::OrderFlow;

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    driver: PageDriver,
    flow: OrderFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化运行日志文件
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        // 获取订单页面：连接已运行的浏览器，或启动无头浏览器
        let (browser, page) = if config.attach_to_browser {
            browser::attach_to_browser_and_page(config.browser_debug_port, &config.order_url)
                .await?
        } else {
            browser::launch_headless_browser(&config.order_url).await?
        };

        // 专用 PDF 渲染页，与订单页相互独立
        let render_page = browser
            .new_page("about:blank")
            .await
            .context("创建渲染页面失败")?;

        let driver = PageDriver::new(page, config.slow_motion_ms);
        let flow = OrderFlow::new(&config, render_page);

        Ok(Self {
            config,
            browser,
            driver,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        // 关闭站点公告弹窗
        self.flow.dismiss_announcement(&self.driver).await?;

        // 加载订单源（下载失败或解析失败在处理任何订单之前终止运行）
        let orders = load_orders(&self.config).await?;
        if orders.is_empty() {
            warn!("⚠️ 订单源为空，没有需要处理的订单");
        }

        // 逐行处理所有订单
        let report = process_orders(&self.driver, &self.flow, &orders, &self.config).await?;

        // 归档回执（无论成功多少单都执行一次）
        let archiver = Archiver::new(&self.config);
        archiver.archive_receipts()?;

        // 输出最终统计
        logging::print_final_stats(&report, &self.config);

        self.shutdown().await;

        Ok(())
    }

    /// 关闭浏览器（连接模式下保留用户自己的浏览器）
    async fn shutdown(&mut self) {
        if self.config.attach_to_browser {
            return;
        }
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
    }
}
