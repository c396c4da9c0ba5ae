use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已运行的浏览器并获取订单页面
///
/// 优先复用 URL 已指向订单站点的标签页；没有则新建页面并导航。
pub async fn attach_to_browser_and_page(port: u16, order_url: &str) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    // 查找已打开订单站点的标签页
    let order_host = host_of(order_url);
    for p in pages.iter() {
        if let Ok(Some(page_url)) = p.url().await {
            if !order_host.is_empty() && page_url.contains(&order_host) {
                info!("✓ 复用已打开的订单页面: {}", page_url);
                p.goto(order_url).await?;
                return Ok((browser, p.clone()));
            }
        }
    }

    // 没有找到匹配的标签页，创建新页面
    debug!("未找到订单页面，创建新页面并导航到: {}", order_url);
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.goto(order_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", order_url, e);
        e
    })?;
    info!("已导航到: {}", order_url);

    Ok((browser, page))
}

/// 从 URL 中提取主机名，用于匹配已打开的标签页
fn host_of(url: &str) -> String {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split(['/', '#', '?']).next())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_extraction_handles_fragment_urls() {
        assert_eq!(
            host_of("https://robotsparebinindustries.com/#/robot-order"),
            "robotsparebinindustries.com"
        );
        assert_eq!(host_of("http://localhost:8082/path"), "localhost:8082");
        assert_eq!(host_of("not-a-url"), "");
    }
}
