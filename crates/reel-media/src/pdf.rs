//! PDF text extraction through the poppler command-line tools.
//!
//! `pdfinfo` reports the page count and encryption state; `pdftotext` writes
//! the text of every page followed by a form feed.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

pub const PDF_MAGIC: &[u8] = b"%PDF-";
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const PAGE_BREAK: char = '\u{000C}';

/// Text extracted from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Non-blank pages, each followed by a newline
    pub text: String,
    pub pages: usize,
    /// Pages that produced non-blank text
    pub extracted_pages: usize,
    pub characters: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PdfInfo {
    pages: usize,
    encrypted: bool,
}

pub fn check_pdf_magic(bytes: &[u8]) -> MediaResult<()> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(MediaError::NotPdf)
    }
}

fn parse_pdfinfo(stdout: &str) -> MediaResult<PdfInfo> {
    let mut pages = None;
    let mut encrypted = false;

    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "Pages" => pages = value.trim().parse::<usize>().ok(),
            "Encrypted" => encrypted = value.trim().starts_with("yes"),
            _ => {}
        }
    }

    let pages = pages.ok_or_else(|| MediaError::PdfFailed("Page count not reported".to_string()))?;
    Ok(PdfInfo { pages, encrypted })
}

fn assemble_pages(raw: &str, pages: usize) -> PdfText {
    let mut text = String::new();
    let mut extracted_pages = 0;

    for page in raw.split(PAGE_BREAK).take(pages) {
        let page = page.trim_end();
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
        extracted_pages += 1;
    }

    PdfText {
        characters: text.chars().count(),
        text,
        pages,
        extracted_pages,
    }
}

/// Extracts text with `pdfinfo` and `pdftotext`.
#[derive(Debug, Clone)]
pub struct PopplerExtractor {
    pub max_pages: usize,
    pub work_dir: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for PopplerExtractor {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            work_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PopplerExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            ..Default::default()
        }
    }

    pub fn with_work_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.work_dir = dir;
        self
    }

    /// Per-invocation limit for `pdfinfo` and `pdftotext`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub async fn extract_text(&self, bytes: &[u8]) -> MediaResult<PdfText> {
        check_pdf_magic(bytes)?;

        let scratch = match &self.work_dir {
            Some(dir) => tempfile::tempdir_in(dir)?,
            None => tempfile::tempdir()?,
        };
        let pdf_path = scratch.path().join("input.pdf");
        tokio::fs::write(&pdf_path, bytes).await?;

        let info = self.pdfinfo(&pdf_path).await?;
        if info.encrypted {
            return Err(MediaError::EncryptedPdf);
        }
        if info.pages > self.max_pages {
            return Err(MediaError::TooManyPages {
                pages: info.pages,
                max: self.max_pages,
            });
        }

        let output = self
            .run_tool(
                "pdftotext",
                [OsStr::new("-enc"), OsStr::new("UTF-8"), pdf_path.as_os_str(), OsStr::new("-")],
            )
            .await?;
        if !output.status.success() {
            return Err(MediaError::PdfFailed(stderr_message(&output)));
        }

        let extracted = assemble_pages(&String::from_utf8_lossy(&output.stdout), info.pages);
        debug!(
            pages = extracted.pages,
            extracted_pages = extracted.extracted_pages,
            characters = extracted.characters,
            "PDF text extracted"
        );
        Ok(extracted)
    }

    async fn pdfinfo(&self, path: &Path) -> MediaResult<PdfInfo> {
        let output = self.run_tool("pdfinfo", [path.as_os_str()]).await?;
        if !output.status.success() {
            let message = stderr_message(&output);
            if message.to_lowercase().contains("password") {
                return Err(MediaError::EncryptedPdf);
            }
            return Err(MediaError::PdfFailed(message));
        }
        parse_pdfinfo(&String::from_utf8_lossy(&output.stdout))
    }

    async fn run_tool<'a, I>(&self, tool: &'static str, args: I) -> MediaResult<Output>
    where
        I: IntoIterator<Item = &'a OsStr>,
    {
        which::which(tool).map_err(|_| MediaError::ToolNotFound(tool))?;

        let mut cmd = Command::new(tool);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tokio::time::timeout(Duration::from_secs(self.timeout_secs), cmd.output())
            .await
            .map_err(|_| MediaError::Timeout(self.timeout_secs))?
            .map_err(MediaError::from)
    }
}

fn stderr_message(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_check() {
        assert!(check_pdf_magic(b"%PDF-1.7\n...").is_ok());
        assert!(matches!(check_pdf_magic(b"PK\x03\x04"), Err(MediaError::NotPdf)));
        assert!(matches!(check_pdf_magic(b""), Err(MediaError::NotPdf)));
    }

    #[test]
    fn test_extractor_builder() {
        let extractor = PopplerExtractor::new(20)
            .with_work_dir(Some(PathBuf::from("/scratch")))
            .with_timeout(5);
        assert_eq!(extractor.max_pages, 20);
        assert_eq!(extractor.work_dir.as_deref(), Some(Path::new("/scratch")));
        assert_eq!(extractor.timeout_secs, 5);
        assert_eq!(PopplerExtractor::default().timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_pdfinfo() {
        let stdout = "Title:          Story\nPages:          12\nEncrypted:      no\n\
                      Page size:      612 x 792 pts\n";
        assert_eq!(parse_pdfinfo(stdout).unwrap(), PdfInfo { pages: 12, encrypted: false });

        let stdout = "Pages: 3\nEncrypted: yes (print:yes copy:no change:no addNotes:no)\n";
        assert!(parse_pdfinfo(stdout).unwrap().encrypted);

        assert!(matches!(parse_pdfinfo("Title: x\n"), Err(MediaError::PdfFailed(_))));
    }

    #[test]
    fn test_assemble_pages_skips_blank_pages() {
        let raw = "First page\n\u{000C}   \n\u{000C}Third\npage\n\u{000C}";
        let extracted = assemble_pages(raw, 3);
        assert_eq!(extracted.text, "First page\nThird\npage\n");
        assert_eq!(extracted.pages, 3);
        assert_eq!(extracted.extracted_pages, 2);
        assert_eq!(extracted.characters, 22);
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_before_tools_run() {
        let err = PopplerExtractor::default().extract_text(b"hello").await.unwrap_err();
        assert!(matches!(err, MediaError::NotPdf));
    }
}
