use std::path::Path;

use robot_order_submit::models::{load_orders, OrderRow};
use robot_order_submit::orchestrator::process_order;
use robot_order_submit::utils::logging;
use robot_order_submit::workflow::{OrderCtx, OrderFlow, ProcessResult};
use robot_order_submit::{launch_headless_browser, Config, PageDriver};

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_launch() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 测试无头浏览器启动
    let result = launch_headless_browser(&config.order_url).await;

    assert!(result.is_ok(), "应该能够成功启动无头浏览器");
}

#[tokio::test]
#[ignore]
async fn test_load_orders_feed() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 测试下载并解析订单源
    let orders = load_orders(&config).await.expect("加载订单源失败");

    println!("找到 {} 个订单", orders.len());
    for order in &orders {
        assert!(!order.head.is_empty(), "每行订单都应该有头部型号");
        assert!(!order.address.is_empty(), "每行订单都应该有地址");
    }
}

#[tokio::test]
#[ignore]
async fn test_single_order_submission() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 启动浏览器并打开订单页面
    let (browser, page) = launch_headless_browser(&config.order_url)
        .await
        .expect("启动无头浏览器失败");
    let render_page = browser
        .new_page("about:blank")
        .await
        .expect("创建渲染页面失败");

    let driver = PageDriver::new(page, config.slow_motion_ms);
    let flow = OrderFlow::new(&config, render_page);
    flow.dismiss_announcement(&driver)
        .await
        .expect("关闭公告弹窗失败");

    // 提交单个订单
    let row = OrderRow {
        head: "1".to_string(),
        body: "2".to_string(),
        legs: "3".to_string(),
        address: "Address Road 28".to_string(),
    };
    let ctx = OrderCtx::new(1, 1);

    let result = process_order(&driver, &flow, &row, &ctx, &config)
        .await
        .expect("处理订单失败");

    match result {
        ProcessResult::Success { order_number } => {
            let pdf_path =
                Path::new(&config.output_dir).join(format!("{}_receipt.pdf", order_number));
            assert!(pdf_path.exists(), "回执 PDF 应该已导出");

            let screenshot_path =
                Path::new(&config.output_dir).join(format!("{}_robot.png", order_number));
            assert!(!screenshot_path.exists(), "临时截图应该已清理");
        }
        ProcessResult::Abandoned {
            attempts,
            last_error,
        } => {
            panic!("订单在 {} 次尝试内应该成功, 最后错误: {}", attempts, last_error);
        }
    }
}
