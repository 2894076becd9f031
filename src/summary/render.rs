use std::io::{self, Write};

use colored::Colorize;

use super::aggregate::{CategoryReport, SizeBucket};
use crate::config::ColorMode;
use super::units::{format_quantity, format_rate, Unit};

/// Presentation of header lines. Rows are never styled.
pub trait Style: Send + Sync {
    fn category_header(&self, text: &str) -> String;
    fn channel_header(&self, text: &str) -> String;
}

/// No escape codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl Style for PlainStyle {
    fn category_header(&self, text: &str) -> String {
        text.to_string()
    }

    fn channel_header(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Bold red category headers and bold green channel headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStyle;

impl Style for AnsiStyle {
    fn category_header(&self, text: &str) -> String {
        text.red().bold().to_string()
    }

    fn channel_header(&self, text: &str) -> String {
        text.bright_green().bold().to_string()
    }
}

/// Pick the header style for `mode`.
pub fn style_for(mode: ColorMode, is_terminal: bool, no_color: bool) -> Box<dyn Style> {
    if mode.enabled(is_terminal, no_color) {
        // colored runs its own env checks; the decision above already covers them.
        colored::control::set_override(true);
        Box::new(AnsiStyle)
    } else {
        Box::new(PlainStyle)
    }
}

/// Throughput for one bucket in size units per second.
///
/// Returns `None` when the average duration is zero.
pub fn bandwidth(size: u64, bucket: &SizeBucket) -> Option<f64> {
    let seconds = bucket.average_seconds();
    if seconds > 0.0 {
        Some(size as f64 / seconds)
    } else {
        None
    }
}

/// One row of the report.
pub fn format_row(size: u64, bucket: &SizeBucket, unit: Unit) -> String {
    format!(
        "\tsize = {}\tnb = {:>6}\tbandwidth = {}",
        format_quantity(size as f64, unit),
        bucket.count,
        format_rate(bandwidth(size, bucket), unit),
    )
}

/// Renders [`CategoryReport`]s as text.
pub struct Reporter {
    style: Box<dyn Style>,
}

impl Reporter {
    pub fn new(style: Box<dyn Style>) -> Self {
        Self { style }
    }

    pub fn plain() -> Self {
        Self::new(Box::new(PlainStyle))
    }

    /// All lines for one category, without trailing newlines. Empty reports
    /// produce no lines at all.
    pub fn render_lines(&self, report: &CategoryReport) -> Vec<String> {
        if report.is_empty() {
            return Vec::new();
        }

        let unit = Unit::for_descriptor(&report.descriptor);
        let mut lines = Vec::new();

        lines.push(
            self.style
                .category_header(&format!("{}:", report.descriptor.display_name)),
        );

        for (channel, sizes) in report.iter() {
            lines.push(self.style.channel_header(&format!("{channel}:")));
            for (size, bucket) in sizes {
                lines.push(format_row(*size, bucket, unit));
            }
        }

        lines
    }

    /// Write the rendered report to `out`.
    pub fn write_to<W: Write>(&self, report: &CategoryReport, mut out: W) -> io::Result<()> {
        for line in self.render_lines(report) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::plain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::aggregate::aggregate;
    use crate::trace::event::{Category, TransferEvent};

    fn ev(start: u64, end: u64, size: u64, channel: &str) -> TransferEvent {
        TransferEvent::new(start, end, size, channel)
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        let events: Vec<TransferEvent> = Vec::new();
        let report = aggregate(Category::WramWrite.descriptor(), &events);
        assert!(Reporter::plain().render_lines(&report).is_empty());

        let mut out = Vec::new();
        Reporter::plain().write_to(&report, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_event_report() {
        let report = aggregate(
            Category::MramRead.descriptor(),
            &[ev(0, 1_000_000_000, 2048, "rank0")],
        );
        let lines = Reporter::plain().render_lines(&report);
        let row = "\tsize =    2.000KB\tnb =      1\tbandwidth =    2.000KB/s";
        assert_eq!(
            lines,
            vec![
                "MRAM read:".to_string(),
                "Average:".to_string(),
                row.to_string(),
                "rank0:".to_string(),
                row.to_string(),
            ]
        );
    }

    #[test]
    fn test_bandwidth_uses_average_duration() {
        let bucket = SizeBucket {
            total_duration_ns: 3_000_000_000,
            count: 2,
        };
        // 1536 bytes over 1.5s average.
        assert_eq!(bandwidth(1536, &bucket), Some(1024.0));
        assert_eq!(
            format_row(1536, &bucket, Unit::Bytes),
            "\tsize =    1.500KB\tnb =      2\tbandwidth =    1.000KB/s"
        );
    }

    #[test]
    fn test_zero_duration_renders_sentinel() {
        let bucket = SizeBucket {
            total_duration_ns: 0,
            count: 3,
        };
        assert_eq!(bandwidth(64, &bucket), None);
        assert_eq!(
            format_row(64, &bucket, Unit::Bytes),
            "\tsize =   64.000B\tnb =      3\tbandwidth =      infB/s"
        );
    }

    #[test]
    fn test_instruction_category_uses_insn() {
        let report = aggregate(
            Category::IramWrite.descriptor(),
            &[ev(0, 1_000_000_000, 512, "rank0")],
        );
        let lines = Reporter::plain().render_lines(&report);
        assert_eq!(
            lines[2],
            "\tsize =  512.000insn\tnb =      1\tbandwidth =  512.000insn/s"
        );
        assert!(lines.iter().all(|l| !l.contains("B/s")));
    }

    #[test]
    fn test_channel_and_size_order() {
        let report = aggregate(
            Category::WramRead.descriptor(),
            &[
                ev(0, 10, 256, "rankB"),
                ev(0, 10, 8, "rankA"),
                ev(0, 10, 64, "rankB"),
            ],
        );
        let headers: Vec<String> = Reporter::plain()
            .render_lines(&report)
            .into_iter()
            .filter(|l| !l.starts_with('\t'))
            .collect();
        assert_eq!(headers, vec!["WRAM read:", "Average:", "rankA:", "rankB:"]);

        let lines = Reporter::plain().render_lines(&report);
        let rank_b = lines.iter().position(|l| l == "rankB:").unwrap();
        assert!(lines[rank_b + 1].contains("size =  256.000B"));
        assert!(lines[rank_b + 2].contains("size =   64.000B"));

        let average: Vec<&String> = lines[2..5].iter().collect();
        assert!(average[0].contains("size =  256.000B"));
        assert!(average[1].contains("size =    8.000B"));
        assert!(average[2].contains("size =   64.000B"));
    }

    #[test]
    fn test_rows_follow_first_seen_size() {
        let report = aggregate(
            Category::MramRead.descriptor(),
            &[ev(0, 1_000, 4096, "r0"), ev(0, 1_000, 8, "r0")],
        );
        let lines = Reporter::plain().render_lines(&report);
        assert!(lines[2].contains("size =    4.000KB"), "{}", lines[2]);
        assert!(lines[3].contains("size =    8.000B"), "{}", lines[3]);
    }

    #[test]
    fn test_count_is_right_aligned() {
        let bucket = SizeBucket {
            total_duration_ns: 1_234_567 * 10,
            count: 1_234_567,
        };
        let row = format_row(8, &bucket, Unit::Bytes);
        assert!(row.contains("\tnb = 1234567\t"), "{row}");
    }

    struct Tagged;

    impl Style for Tagged {
        fn category_header(&self, text: &str) -> String {
            format!("<cat>{text}</cat>")
        }

        fn channel_header(&self, text: &str) -> String {
            format!("<ch>{text}</ch>")
        }
    }

    #[test]
    fn test_style_applies_to_headers_only() {
        let report = aggregate(Category::MramWrite.descriptor(), &[ev(0, 1, 8, "r0")]);
        let lines = Reporter::new(Box::new(Tagged)).render_lines(&report);
        assert_eq!(lines[0], "<cat>MRAM write:</cat>");
        assert_eq!(lines[1], "<ch>Average:</ch>");
        assert!(lines[2].starts_with("\tsize = "));
        assert_eq!(lines[3], "<ch>r0:</ch>");
    }

    #[test]
    fn test_style_for_respects_mode() {
        let plain = |mode: ColorMode, tty: bool, no_color: bool| {
            style_for(mode, tty, no_color).category_header("MRAM read:") == "MRAM read:"
        };
        assert!(plain(ColorMode::Never, true, false));
        assert!(plain(ColorMode::Auto, false, false));
        assert!(plain(ColorMode::Auto, true, true));
        assert!(!plain(ColorMode::Auto, true, false));
        assert!(!plain(ColorMode::Always, false, true));
    }

    #[test]
    fn test_ansi_style_keeps_text() {
        colored::control::set_override(true);
        let styled = AnsiStyle.category_header("WRAM write:");
        assert!(styled.contains("WRAM write:"));
        assert!(styled.contains("\u{1b}["));
    }
}
