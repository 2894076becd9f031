pub mod event;
pub mod parse;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use self::parse::{read_trace, TraceSet};

/// Load a trace from `path`, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<TraceSet> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        return read_trace(stdin.lock()).context("reading trace from stdin");
    }

    let file = File::open(path).with_context(|| format!("opening trace {}", path.display()))?;

    read_trace(BufReader::new(file)).with_context(|| format!("reading trace {}", path.display()))
}
