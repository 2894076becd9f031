use std::fmt;

/// Category identifies the kind of memory transfer being summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    WramRead,
    WramWrite,
    MramRead,
    MramWrite,
    IramRead,
    IramWrite,
}

impl Category {
    /// Returns the canonical label used in trace records and config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WramRead => "wram_read",
            Self::WramWrite => "wram_write",
            Self::MramRead => "mram_read",
            Self::MramWrite => "mram_write",
            Self::IramRead => "iram_read",
            Self::IramWrite => "iram_write",
        }
    }

    /// Returns the human-readable name printed in report headers.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::WramRead => "WRAM read",
            Self::WramWrite => "WRAM write",
            Self::MramRead => "MRAM read",
            Self::MramWrite => "MRAM write",
            Self::IramRead => "IRAM read",
            Self::IramWrite => "IRAM write",
        }
    }

    /// IRAM transfers carry instruction counts instead of byte counts.
    pub const fn is_instruction_oriented(self) -> bool {
        matches!(self, Self::IramRead | Self::IramWrite)
    }

    /// Builds the descriptor that parameterises one aggregate/report run.
    pub const fn descriptor(self) -> CategoryDescriptor {
        CategoryDescriptor {
            display_name: self.display_name(),
            instruction_oriented: self.is_instruction_oriented(),
        }
    }

    /// Convert from the canonical label.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wram_read" => Some(Self::WramRead),
            "wram_write" => Some(Self::WramWrite),
            "mram_read" => Some(Self::MramRead),
            "mram_write" => Some(Self::MramWrite),
            "iram_read" => Some(Self::IramRead),
            "iram_write" => Some(Self::IramWrite),
            _ => None,
        }
    }

    /// Return all categories in report order.
    pub fn all() -> &'static [Self] {
        &[
            Self::WramWrite,
            Self::WramRead,
            Self::MramRead,
            Self::MramWrite,
            Self::IramRead,
            Self::IramWrite,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the aggregator and reporter need to know about a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub display_name: &'static str,
    /// Sizes are instruction counts rather than bytes.
    pub instruction_oriented: bool,
}

/// One recorded data movement on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub start_time_ns: u64,
    pub end_time_ns: u64,
    /// Bytes, or instructions for IRAM categories.
    pub size: u64,
    /// Rank path the transfer ran on.
    pub channel_id: String,
}

impl TransferEvent {
    pub fn new(
        start_time_ns: u64,
        end_time_ns: u64,
        size: u64,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            start_time_ns,
            end_time_ns,
            size,
            channel_id: channel_id.into(),
        }
    }

    /// Elapsed time of the transfer, or `None` if it ends before it starts.
    pub fn duration_ns(&self) -> Option<u64> {
        self.end_time_ns.checked_sub(self.start_time_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_roundtrip() {
        for c in Category::all() {
            assert_eq!(Category::from_name(c.as_str()), Some(*c));
        }
        assert!(Category::from_name("dma_read").is_none());
        assert!(Category::from_name("WRAM read").is_none());
    }

    #[test]
    fn test_all_categories_in_report_order() {
        let names: Vec<&str> = Category::all().iter().map(|c| c.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "WRAM write",
                "WRAM read",
                "MRAM read",
                "MRAM write",
                "IRAM read",
                "IRAM write"
            ]
        );
    }

    #[test]
    fn test_only_iram_is_instruction_oriented() {
        for c in Category::all() {
            let expected = matches!(c, Category::IramRead | Category::IramWrite);
            assert_eq!(c.is_instruction_oriented(), expected, "{c}");
            assert_eq!(c.descriptor().instruction_oriented, expected);
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::MramWrite.to_string(), "mram_write");
        assert_eq!(Category::IramRead.descriptor().display_name, "IRAM read");
    }

    #[test]
    fn test_duration() {
        assert_eq!(TransferEvent::new(10, 25, 8, "r0").duration_ns(), Some(15));
        assert_eq!(TransferEvent::new(10, 10, 8, "r0").duration_ns(), Some(0));
        assert_eq!(TransferEvent::new(25, 10, 8, "r0").duration_ns(), None);
    }
}
