//! PDF Export: prints rendered HTML through a headless Chromium.
//!
//! Each export owns its browser for exactly one print: launch with a private
//! profile directory, load the HTML, wait for the document and its fonts to
//! settle, print A4 with zero margins and backgrounds, then close. The browser
//! is closed on success, on failure and on timeout; dropping the export future
//! mid-flight aborts the event loop and the profile directory is removed.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chrono::NaiveDate;
use futures::StreamExt;
use tempfile::TempDir;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::report::Grade;

/// A4 in inches, as the print protocol expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
/// Interval between document readiness probes.
const READY_POLL: Duration = Duration::from_millis(100);
/// How long a browser gets to exit before it is killed.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

const READY_PROBE_JS: &str =
    "document.readyState === 'complete' && document.fonts.status === 'loaded'";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to render PDF: {0}")]
    Render(String),

    #[error("PDF export timed out after {0}s")]
    Timeout(u64),
}

/// The PDF export seam.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfError>;
}

/// Launches a fresh Chromium per export.
pub struct ChromiumPdfRenderer {
    chrome_path: Option<PathBuf>,
    timeout: Duration,
}

impl ChromiumPdfRenderer {
    pub fn new(chrome_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            chrome_path,
            timeout,
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumPdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let started = Instant::now();
        let mut session = BrowserSession::launch(self.chrome_path.as_deref()).await?;

        let printed = match tokio::time::timeout(self.timeout, print_html(&session.browser, html))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(PdfError::Timeout(self.timeout.as_secs())),
        };

        session.close().await;

        let bytes = printed?;
        info!(
            "PDF exported: {} bytes in {}ms",
            bytes.len(),
            started.elapsed().as_millis()
        );
        Ok(bytes)
    }
}

async fn print_html(browser: &Browser, html: &str) -> Result<Vec<u8>, PdfError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| PdfError::Render(format!("new page: {e}")))?;
    page.set_content(html)
        .await
        .map_err(|e| PdfError::Render(format!("set content: {e}")))?;

    // The document is self-contained, so readiness means parsed and fonts loaded.
    loop {
        let ready = page
            .evaluate(READY_PROBE_JS)
            .await
            .ok()
            .and_then(|result| result.into_value::<bool>().ok())
            .unwrap_or(false);
        if ready {
            break;
        }
        tokio::time::sleep(READY_POLL).await;
    }

    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        prefer_css_page_size: Some(true),
        ..Default::default()
    };
    page.pdf(params)
        .await
        .map_err(|e| PdfError::Render(format!("print: {e}")))
}

/// One browser process with its event loop and private profile.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    async fn launch(chrome_path: Option<&Path>) -> Result<Self, PdfError> {
        let profile = tempfile::Builder::new()
            .prefix("career-report-chrome-")
            .tempdir()
            .map_err(|e| PdfError::Launch(format!("profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(profile.path())
            .args(["--disable-dev-shm-usage", "--disable-gpu"]);
        if let Some(path) = chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(PdfError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PdfError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP event error: {e:?}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    /// Asks the browser to exit and waits at most `CLOSE_GRACE`; a browser that
    /// refuses or hangs is killed.
    async fn close(&mut self) {
        let browser = &mut self.browser;
        let graceful = within(CLOSE_GRACE, async move {
            browser.close().await.map_err(|e| format!("close: {e}"))?;
            browser.wait().await.map_err(|e| format!("wait: {e}"))?;
            Ok::<(), String>(())
        })
        .await;

        if let Err(reason) = graceful {
            warn!("Browser did not exit cleanly ({reason}), killing it");
            if let Some(Err(e)) = self.browser.kill().await {
                warn!("Browser kill failed: {e}");
            }
        }
        self.handler.abort();
    }
}

/// Runs a shutdown step with a deadline, folding the timeout into its error.
async fn within<F>(grace: Duration, step: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    match tokio::time::timeout(grace, step).await {
        Ok(result) => result,
        Err(_) => Err(format!("no exit within {}s", grace.as_secs())),
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// `{name}-{grade}-生涯定制报告-{yyyyMMdd}.pdf`
pub fn pdf_filename(student_name: &str, grade: Grade, date: NaiveDate) -> String {
    format!(
        "{}-{}-生涯定制报告-{}.pdf",
        student_name,
        grade.label(),
        date.format("%Y%m%d")
    )
}

/// RFC 5987 attachment header value for a UTF-8 file name.
pub fn content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_filename_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            pdf_filename("张明轩", Grade::SeniorHigh2, date),
            "张明轩-高二-生涯定制报告-20250301.pdf"
        );
    }

    #[test]
    fn test_content_disposition_is_percent_encoded() {
        let header = content_disposition("张三-高一-生涯定制报告-20250301.pdf");
        assert!(header.starts_with("attachment; filename*=UTF-8''"));
        assert!(header.is_ascii());
        assert!(header.contains("%E5%BC%A0%E4%B8%89-"));
        assert!(header.ends_with("-20250301.pdf"));
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let header = content_disposition("a b;c.pdf");
        assert_eq!(header, "attachment; filename*=UTF-8''a%20b%3Bc.pdf");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_shutdown_is_cut_off() {
        let started = tokio::time::Instant::now();
        let result = within(CLOSE_GRACE, std::future::pending::<Result<(), String>>()).await;
        assert_eq!(result, Err("no exit within 5s".to_string()));
        assert!(started.elapsed() >= CLOSE_GRACE);
    }

    #[tokio::test]
    async fn test_failed_shutdown_step_is_reported() {
        let result = within(CLOSE_GRACE, async { Err::<(), _>("close: refused".to_string()) }).await;
        assert_eq!(result, Err("close: refused".to_string()));
        assert_eq!(within(CLOSE_GRACE, async { Ok::<(), String>(()) }).await, Ok(()));
    }

    #[test]
    fn test_timeout_message_names_seconds() {
        assert_eq!(
            PdfError::Timeout(60).to_string(),
            "PDF export timed out after 60s"
        );
    }
}
