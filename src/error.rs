use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 订单源（CSV 下载/解析）错误
    Feed(FeedError),
    /// 订单提交被页面拒绝
    Order(OrderError),
    /// 回执导出错误
    Export(ExportError),
    /// 归档错误
    Archive(ArchiveError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Feed(e) => write!(f, "订单源错误: {}", e),
            AppError::Order(e) => write!(f, "{}", e),
            AppError::Export(e) => write!(f, "回执导出错误: {}", e),
            AppError::Archive(e) => write!(f, "归档错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Feed(e) => Some(e),
            AppError::Order(e) => Some(e),
            AppError::Export(e) => Some(e),
            AppError::Archive(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 连接浏览器失败
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 页面元素未找到或不可交互
    ElementNotFound {
        selector: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 浏览器配置失败
    ConfigurationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConnectionFailed { port, source } => {
                write!(f, "无法连接到浏览器 (端口: {}): {}", port, source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
            BrowserError::ElementNotFound { selector, source } => {
                write!(f, "元素未找到或不可交互 ({}): {}", selector, source)
            }
            BrowserError::ConfigurationFailed { source } => {
                write!(f, "浏览器配置失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConnectionFailed { source, .. }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source }
            | BrowserError::ElementNotFound { source, .. }
            | BrowserError::ConfigurationFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 订单源错误
#[derive(Debug)]
pub enum FeedError {
    /// CSV 下载失败
    DownloadFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV 写入本地失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV 解析失败
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::DownloadFailed { url, source } => {
                write!(f, "下载 CSV 失败 ({}): {}", url, source)
            }
            FeedError::WriteFailed { path, source } => {
                write!(f, "写入 CSV 失败 ({}): {}", path, source)
            }
            FeedError::ParseFailed { path, source } => {
                write!(f, "解析 CSV 失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::DownloadFailed { source, .. }
            | FeedError::WriteFailed { source, .. }
            | FeedError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 订单提交被页面拒绝
///
/// 页面出现红色错误横幅时由校验器抛出，固定以 "OrderError" 开头，
/// 供重试循环捕获。
#[derive(Debug)]
pub enum OrderError {
    /// 页面显示错误横幅
    Rejected {
        /// 横幅文本（可能为空）
        banner: String,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::Rejected { banner } => {
                if banner.is_empty() {
                    write!(f, "OrderError")
                } else {
                    write!(f, "OrderError: {}", banner)
                }
            }
        }
    }
}

impl std::error::Error for OrderError {}

/// 回执导出错误
#[derive(Debug)]
pub enum ExportError {
    /// 回执容器不存在
    ReceiptNotFound,
    /// 回执中未找到订单编号
    OrderNumberNotFound {
        receipt_preview: String,
    },
    /// 截图失败
    ScreenshotFailed {
        selector: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// PDF 渲染失败
    PdfRenderFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::ReceiptNotFound => write!(f, "页面上没有回执容器"),
            ExportError::OrderNumberNotFound { receipt_preview } => {
                write!(f, "回执中未找到订单编号: {}", receipt_preview)
            }
            ExportError::ScreenshotFailed { selector, source } => {
                write!(f, "截图失败 ({}): {}", selector, source)
            }
            ExportError::PdfRenderFailed { path, source } => {
                write!(f, "PDF 渲染失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::ScreenshotFailed { source, .. }
            | ExportError::PdfRenderFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 归档错误
#[derive(Debug)]
pub enum ArchiveError {
    /// 输出目录不可读
    OutputDirUnreadable {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入 ZIP 失败
    ZipWriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::OutputDirUnreadable { path, source } => {
                write!(f, "输出目录不可读 ({}): {}", path, source)
            }
            ArchiveError::ZipWriteFailed { path, source } => {
                write!(f, "写入 ZIP 失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::OutputDirUnreadable { source, .. }
            | ArchiveError::ZipWriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Feed(FeedError::ParseFailed {
            path: String::new(), // csv 错误本身已携带位置信息
            source: Box::new(err),
        })
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Archive(ArchiveError::ZipWriteFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建元素未找到错误
    pub fn element_not_found(
        selector: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ElementNotFound {
            selector: selector.into(),
            source: Box::new(source),
        })
    }

    /// 创建 CSV 下载错误
    pub fn feed_download_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Feed(FeedError::DownloadFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建订单被拒错误（固定 "OrderError" 条件）
    pub fn order_rejected(banner: impl Into<String>) -> Self {
        AppError::Order(OrderError::Rejected {
            banner: banner.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_order_displays_fixed_condition() {
        let err = AppError::order_rejected("");
        assert_eq!(err.to_string(), "OrderError");

        let err = AppError::order_rejected("Guess what! Error happened!");
        assert_eq!(err.to_string(), "OrderError: Guess what! Error happened!");
    }

    #[test]
    fn missing_order_number_names_the_receipt() {
        let err = AppError::Export(ExportError::OrderNumberNotFound {
            receipt_preview: "<div>no id here</div>".to_string(),
        });
        assert!(err.to_string().contains("订单编号"));
    }
}
