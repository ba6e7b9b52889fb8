// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: read the captured pages, scan them as one batch, write the
// rectified pages and describe the result in a `ScanReport`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pagelift_core::error::Result;
use pagelift_core::{PageRecord, ScanConfig, ScanReport};
use pagelift_document::{DocumentScanner, ImageProcessor};
use tracing::{info, instrument};

pub struct ScanSession {
    scanner: Arc<DocumentScanner>,
    output_dir: PathBuf,
}

impl ScanSession {
    pub fn new(config: ScanConfig, output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            scanner: Arc::new(DocumentScanner::new(config)?),
            output_dir: output_dir.into(),
        })
    }

    /// Output file for the 1-based page `index`.
    pub fn page_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("page_{index:03}.jpg"))
    }

    /// Scan `inputs` in order. No inputs gives an empty report and writes
    /// nothing; any failing page fails the session before files are written.
    #[instrument(skip_all, fields(pages = inputs.len(), output_dir = %self.output_dir.display()))]
    pub async fn run(&self, inputs: &[PathBuf]) -> Result<ScanReport> {
        let config = self.scanner.config();
        let mut report = ScanReport::new(config.corner_ordering);
        if inputs.is_empty() {
            info!("No pages captured");
            return Ok(report);
        }

        let mut pages = Vec::with_capacity(inputs.len());
        for path in inputs {
            pages.push(tokio::fs::read(path).await?);
        }

        let scanned = Arc::clone(&self.scanner).scan_pages(pages).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        for (offset, (page, source)) in scanned.into_iter().zip(inputs).enumerate() {
            let index = offset + 1;
            let output = self.page_path(index);
            let (width, height) = (page.image.width(), page.image.height());
            ImageProcessor::from_dynamic(page.image).save_jpeg(&output, config.jpeg_quality)?;

            report.pages.push(PageRecord {
                index,
                source: display_source(source),
                output,
                width,
                height,
                quad: page.quad,
                fallback: page.fallback,
            });
        }

        info!(
            session = %report.session_id,
            pages = report.pages.len(),
            "Scan session complete"
        );
        Ok(report)
    }
}

fn display_source(path: &Path) -> String {
    path.display().to_string()
}
