//! Per-category transfer summaries: aggregation, unit scaling and rendering.

pub mod aggregate;
pub mod render;
pub mod units;

use std::io::{self, Write};

pub use self::aggregate::{aggregate, CategoryReport, ChannelAggregate, ChannelKey, SizeBucket};
pub use self::render::{AnsiStyle, PlainStyle, Reporter, Style};

use crate::trace::event::Category;
use crate::trace::parse::TraceSet;

/// Aggregate and render each category in turn. Categories share no state;
/// each one is fully aggregated before any of it is written.
pub fn write_all<W, F>(
    traces: &TraceSet,
    categories: &[Category],
    include_channel: F,
    reporter: &Reporter,
    mut out: W,
) -> io::Result<()>
where
    W: Write,
    F: Fn(&str) -> bool,
{
    for &category in categories {
        let events = traces
            .events(category)
            .iter()
            .filter(|e| include_channel(&e.channel_id));

        let report = aggregate(category.descriptor(), events);
        if report.is_empty() {
            tracing::debug!(category = %category, "no transfers, skipping");
            continue;
        }

        reporter.write_to(&report, &mut out)?;
    }

    out.flush()
}
