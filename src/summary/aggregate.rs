use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::trace::event::{CategoryDescriptor, TransferEvent};

/// Display name of the synthetic cross-channel aggregate.
pub const AVERAGE_CHANNEL: &str = "Average";

/// Key of one channel in a report.
///
/// The synthetic aggregate is its own variant so a real channel that happens
/// to be called "Average" never merges with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    Real(String),
    Average,
}

impl ChannelKey {
    pub fn name(&self) -> &str {
        match self {
            Self::Real(name) => name,
            Self::Average => AVERAGE_CHANNEL,
        }
    }

    pub fn is_average(&self) -> bool {
        matches!(self, Self::Average)
    }
}

impl Ord for ChannelKey {
    /// Plain string order on the display name; on a name clash the real
    /// channel comes first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.is_average().cmp(&other.is_average()))
    }
}

impl PartialOrd for ChannelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulated duration and count for one size on one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeBucket {
    pub total_duration_ns: u64,
    pub count: u64,
}

impl SizeBucket {
    fn record(&mut self, duration_ns: u64) {
        self.total_duration_ns = self.total_duration_ns.saturating_add(duration_ns);
        self.count += 1;
    }

    /// Mean duration in nanoseconds. Buckets always hold at least one sample.
    pub fn average_ns(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_duration_ns as f64 / self.count as f64
    }

    pub fn average_seconds(&self) -> f64 {
        self.average_ns() / 1e9
    }
}

/// Size to bucket mapping for one channel, in the order each size was first
/// seen on that channel.
pub type ChannelAggregate = IndexMap<u64, SizeBucket>;

/// Aggregated view of one category, ready for rendering.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub descriptor: CategoryDescriptor,
    channels: BTreeMap<ChannelKey, ChannelAggregate>,
}

impl CategoryReport {
    pub fn new(descriptor: CategoryDescriptor) -> Self {
        Self {
            descriptor,
            channels: BTreeMap::new(),
        }
    }

    /// True when no events were aggregated; such reports render nothing.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of channels, including the synthetic aggregate.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Aggregate for a real channel.
    pub fn channel(&self, name: &str) -> Option<&ChannelAggregate> {
        self.channels.get(&ChannelKey::Real(name.to_string()))
    }

    /// The cross-channel aggregate, absent for an empty report.
    pub fn average(&self) -> Option<&ChannelAggregate> {
        self.channels.get(&ChannelKey::Average)
    }

    /// Channels in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChannelKey, &ChannelAggregate)> {
        self.channels.iter()
    }

    fn bucket_mut(&mut self, key: ChannelKey, size: u64) -> &mut SizeBucket {
        self.channels
            .entry(key)
            .or_default()
            .entry(size)
            .or_default()
    }

    fn record(&mut self, channel_id: &str, size: u64, duration_ns: u64) {
        self.bucket_mut(ChannelKey::Real(channel_id.to_string()), size)
            .record(duration_ns);
        self.bucket_mut(ChannelKey::Average, size)
            .record(duration_ns);
    }
}

/// Group the events of one category by channel and size.
///
/// Every event also lands in the synthetic [`ChannelKey::Average`] channel
/// under the same size. An empty input yields an empty report.
pub fn aggregate<'a, I>(descriptor: CategoryDescriptor, events: I) -> CategoryReport
where
    I: IntoIterator<Item = &'a TransferEvent>,
{
    let mut report = CategoryReport::new(descriptor);
    let mut seen = 0usize;

    for event in events {
        seen += 1;
        let duration_ns = match event.duration_ns() {
            Some(d) => d,
            None => {
                tracing::warn!(
                    category = descriptor.display_name,
                    channel = %event.channel_id,
                    start_ns = event.start_time_ns,
                    end_ns = event.end_time_ns,
                    "transfer ends before it starts, counting it as zero duration",
                );
                0
            }
        };

        report.record(&event.channel_id, event.size, duration_ns);
    }

    tracing::debug!(
        category = descriptor.display_name,
        events = seen,
        channels = report.len(),
        "aggregated transfers",
    );

    report
}
