//! 页面驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"操作页面"的能力

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{AppError, ExportError};

/// 页面驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露选择/点击/填写/读取/截图/打印能力
/// - 不认识 Order / Receipt
/// - 不处理业务流程
pub struct PageDriver {
    page: Page,
    slow_motion: Duration,
}

impl PageDriver {
    /// 创建新的页面驱动器
    ///
    /// `slow_motion_ms` 为每次写操作后的减速延迟，0 表示不减速
    pub fn new(page: Page, slow_motion_ms: u64) -> Self {
        Self {
            page,
            slow_motion: Duration::from_millis(slow_motion_ms),
        }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 导航到指定 URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        self.pace().await;
        Ok(())
    }

    /// 点击选择器命中的元素
    pub async fn click(&self, selector: &str) -> Result<()> {
        debug!("点击: {}", selector);
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        element
            .click()
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        self.pace().await;
        Ok(())
    }

    /// 在选择器命中的输入框中输入文本
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        debug!("填写: {} <- {} 字符", selector, text.len());
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        element
            .click()
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?
            .type_str(text)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        self.pace().await;
        Ok(())
    }

    /// 按值选中下拉框选项，并触发 change 事件
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        debug!("选择: {} = {}", selector, value);
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            selector = serde_json::to_string(selector)?,
            value = serde_json::to_string(value)?,
        );

        let found: bool = self.eval_as(script).await?;
        if !found {
            anyhow::bail!("下拉框不存在: {}", selector);
        }
        self.pace().await;
        Ok(())
    }

    /// 检查选择器命中的元素是否可见
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return !!el && el.offsetParent !== null;
            }})()
            "#,
            serde_json::to_string(selector)?,
        );
        let visible: bool = self.eval_as(script).await?;
        Ok(visible)
    }

    /// 读取选择器命中元素的内部 HTML，元素不存在时返回 None
    pub async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el ? el.innerHTML : null;
            }})()
            "#,
            serde_json::to_string(selector)?,
        );
        let html: Option<String> = self.eval_as(script).await?;
        Ok(html)
    }

    /// 读取选择器命中元素的文本内容，元素不存在时返回 None
    pub async fn inner_text(&self, selector: &str) -> Result<Option<String>> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el ? el.textContent.trim() : null;
            }})()
            "#,
            serde_json::to_string(selector)?,
        );
        let text: Option<String> = self.eval_as(script).await?;
        Ok(text)
    }

    /// 对选择器命中的元素截图，保存为 PNG 并返回图片字节
    pub async fn save_element_screenshot(
        &self,
        selector: &str,
        output: &Path,
    ) -> Result<Vec<u8>> {
        debug!("截图: {} -> {}", selector, output.display());
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        let bytes = element
            .save_screenshot(CaptureScreenshotFormat::Png, output)
            .await
            .map_err(|e| {
                AppError::Export(ExportError::ScreenshotFailed {
                    selector: selector.to_string(),
                    source: Box::new(e),
                })
            })?;
        Ok(bytes)
    }

    /// 将 HTML 片段写入本页并打印为 PDF
    ///
    /// 会覆盖本页当前内容，只能在专用渲染页上调用。
    pub async fn render_html_to_pdf(&self, html: &str, output: &Path) -> Result<()> {
        debug!("渲染 PDF: {}", output.display());
        let script = format!(
            r#"
            (() => {{
                document.open();
                document.write({});
                document.close();
                return true;
            }})()
            "#,
            serde_json::to_string(html)?,
        );
        let _: bool = self.eval_as(script).await?;

        self.page
            .save_pdf(PrintToPdfParams::default(), output)
            .await
            .map_err(|e| {
                AppError::Export(ExportError::PdfRenderFailed {
                    path: output.display().to_string(),
                    source: Box::new(e),
                })
            })?;
        Ok(())
    }

    /// 写操作后的减速延迟
    async fn pace(&self) {
        if !self.slow_motion.is_zero() {
            sleep(self.slow_motion).await;
        }
    }
}
