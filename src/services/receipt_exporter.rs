//! 回执导出服务 - 业务能力层
//!
//! 提取回执 HTML 与订单编号，截图机器人预览，合成并打印 PDF。
//! 截图文件是作用域资源：无论导出在截图之后的哪一步失败，守卫都会清理它。

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chromiumoxide::Page;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, ExportError};
use crate::infrastructure::PageDriver;
use crate::models::order::Receipt;
use crate::utils::logging::truncate_text;

/// 回执容器
const RECEIPT_SELECTOR: &str = "#receipt";
/// 机器人预览图
const ROBOT_PREVIEW_SELECTOR: &str = "#robot-preview-image";
/// 回执中的订单编号格式
const ORDER_NUMBER_PATTERN: &str = r"RSB-ROBO-ORDER-([A-Z0-9]+)";
/// 回执中嵌入截图的显示宽度
const SCREENSHOT_WIDTH: u32 = 150;

/// 回执导出服务
///
/// 职责：
/// - 从订单页面提取回执片段和订单编号
/// - 截图机器人预览到临时文件
/// - 在专用渲染页上把回执 + 截图打印为 PDF
/// - 保证临时截图在返回前被清理
pub struct ReceiptExporter {
    /// 专用渲染页（打印 PDF 时会覆盖其内容，订单页不受影响）
    render: PageDriver,
    output_dir: PathBuf,
}

impl ReceiptExporter {
    /// 创建新的回执导出服务
    pub fn new(render_page: Page, config: &Config) -> Self {
        Self {
            render: PageDriver::new(render_page, 0),
            output_dir: PathBuf::from(&config.output_dir),
        }
    }

    /// 导出当前页面上的回执
    ///
    /// 回执缺失或编号不符合格式时抛错，该错误不参与重试。
    pub async fn export(&self, driver: &PageDriver) -> Result<Receipt> {
        let receipt_html = driver
            .inner_html(RECEIPT_SELECTOR)
            .await?
            .ok_or(AppError::Export(ExportError::ReceiptNotFound))?;

        let order_number = extract_order_number(&receipt_html)?;
        info!("🧾 订单编号: {}", order_number);

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("无法创建输出目录: {}", self.output_dir.display()))?;

        // 截图是临时文件，守卫负责在所有退出路径上删除
        let screenshot_path = self.output_dir.join(format!("{}_robot.png", order_number));
        let png_bytes = driver
            .save_element_screenshot(ROBOT_PREVIEW_SELECTOR, &screenshot_path)
            .await?;
        let _screenshot = ScreenshotGuard::new(screenshot_path);

        let content = build_receipt_html(&receipt_html, &png_bytes, &order_number);
        let pdf_path = self.output_dir.join(format!("{}_receipt.pdf", order_number));
        self.render.render_html_to_pdf(&content, &pdf_path).await?;

        info!("✓ 回执已导出: {}", pdf_path.display());

        Ok(Receipt {
            html: receipt_html,
            order_number,
        })
    }
}

/// 从回执 HTML 中提取订单编号
pub fn extract_order_number(receipt_html: &str) -> Result<String> {
    let re = Regex::new(ORDER_NUMBER_PATTERN).context("订单编号正则无效")?;

    match re.captures(receipt_html).and_then(|caps| caps.get(1)) {
        Some(number) => Ok(number.as_str().to_string()),
        None => Err(AppError::Export(ExportError::OrderNumberNotFound {
            receipt_preview: truncate_text(receipt_html, 80),
        })
        .into()),
    }
}

/// 合成回执 HTML：回执片段在前，截图以 data URI 形式内嵌在后
fn build_receipt_html(receipt_html: &str, png_bytes: &[u8], order_number: &str) -> String {
    let encoded = STANDARD.encode(png_bytes);
    format!(
        "{}<br><img src=\"data:image/png;base64,{}\" alt=\"Robot {}\" width=\"{}\">",
        receipt_html, encoded, order_number, SCREENSHOT_WIDTH
    )
}

/// 截图清理守卫
///
/// Drop 时删除截图文件，保证导出函数的所有退出路径都不会留下临时文件
struct ScreenshotGuard {
    path: PathBuf,
}

impl ScreenshotGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for ScreenshotGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("清理截图失败 {}: {}", self.path.display(), e);
            } else {
                debug!("已清理截图: {}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extracts_order_number_from_receipt_markup() {
        let html = r#"<div><p>Thank you!</p>RSB-ROBO-ORDER-1CAD23F0<p>total: 42</p></div>"#;
        let number = extract_order_number(html).expect("编号应该能提取出来");
        assert_eq!(number, "1CAD23F0");
    }

    #[test]
    fn takes_first_order_number_when_several_present() {
        let html = "RSB-ROBO-ORDER-AAA111 and later RSB-ROBO-ORDER-BBB222";
        assert_eq!(extract_order_number(html).unwrap(), "AAA111");
    }

    #[test]
    fn missing_order_number_is_an_error() {
        let html = "<div>malformed receipt, no identifier</div>";
        let err = extract_order_number(html).unwrap_err();
        assert!(err.to_string().contains("订单编号"));
    }

    #[test]
    fn lowercase_identifier_does_not_match() {
        // 编号只允许大写字母和数字
        assert!(extract_order_number("RSB-ROBO-ORDER-abc123x").is_err());
    }

    #[test]
    fn receipt_html_embeds_screenshot_inline() {
        let png = [0x89u8, b'P', b'N', b'G'];
        let content = build_receipt_html("<div>receipt</div>", &png, "1CAD23F0");

        assert!(content.starts_with("<div>receipt</div><br>"));
        assert!(content.contains("src=\"data:image/png;base64,"));
        assert!(content.contains(&STANDARD.encode(png)));
        assert!(content.contains("alt=\"Robot 1CAD23F0\""));
        assert!(content.contains("width=\"150\""));
    }

    #[test]
    fn screenshot_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1CAD23F0_robot.png");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"fake png").unwrap();
        assert!(path.exists());

        {
            let _guard = ScreenshotGuard::new(path.clone());
        }

        assert!(!path.exists(), "守卫析构后截图应该被删除");
    }

    #[test]
    fn screenshot_guard_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never_created.png");

        // 文件不存在时析构不应 panic
        let _guard = ScreenshotGuard::new(path);
    }
}
