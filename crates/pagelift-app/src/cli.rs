// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments for the `pagelift` host.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pagelift_core::error::Result;
use pagelift_core::{CornerOrdering, ScanConfig};

#[derive(Parser, Debug)]
#[command(name = "pagelift")]
#[command(version, about = "Find photographed pages and flatten them into rectangular scans")]
pub struct Cli {
    /// Photographed page images, in page order
    pub inputs: Vec<PathBuf>,

    /// Directory for the rectified pages
    #[arg(short, long, default_value = "scans")]
    pub output_dir: PathBuf,

    /// JSON scan configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Corner ordering strategy [default: from config, else row-major]
    #[arg(long, value_enum)]
    pub ordering: Option<OrderingArg>,

    /// Maximum number of pages in this scan
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// JPEG quality for written pages (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderingArg {
    RowMajor,
    CentroidQuadrant,
}

impl From<OrderingArg> for CornerOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::RowMajor => CornerOrdering::RowMajor,
            OrderingArg::CentroidQuadrant => CornerOrdering::CentroidQuadrant,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_json_file(path)?,
            None => ScanConfig::default(),
        };
        if let Some(ordering) = self.ordering {
            config.corner_ordering = ordering.into();
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        config.validate()?;
        Ok(config)
    }
}
