// Chart domain models - chart identities and chart-ready row sets
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartId {
    OverallRate,
    OverallLatencyPercentile,
    EventRate,
    EventRateRatio,
    MeanLatency,
    MaxLatency,
    Histogram(String),
}

impl ChartId {
    /// The charts created at startup regardless of workloads.
    pub const FIXED: [ChartId; 6] = [
        ChartId::OverallRate,
        ChartId::OverallLatencyPercentile,
        ChartId::EventRate,
        ChartId::EventRateRatio,
        ChartId::MeanLatency,
        ChartId::MaxLatency,
    ];

    pub fn title(&self) -> String {
        match self {
            ChartId::OverallRate => "Overall rate".to_string(),
            ChartId::OverallLatencyPercentile => "Overall latency percentile".to_string(),
            ChartId::EventRate => "Event rate".to_string(),
            ChartId::EventRateRatio => "Event rate / desired rate".to_string(),
            ChartId::MeanLatency => "Mean event latency".to_string(),
            ChartId::MaxLatency => "Max event latency".to_string(),
            ChartId::Histogram(workload) => format!("{} latency histogram", workload),
        }
    }

    pub fn is_time_series(&self) -> bool {
        !matches!(self, ChartId::Histogram(_))
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartId::OverallRate => f.write_str("overall-rate"),
            ChartId::OverallLatencyPercentile => f.write_str("overall-latency-percentile"),
            ChartId::EventRate => f.write_str("event-rate"),
            ChartId::EventRateRatio => f.write_str("event-rate-pct"),
            ChartId::MeanLatency => f.write_str("mean-latency"),
            ChartId::MaxLatency => f.write_str("max-latency"),
            ChartId::Histogram(workload) => write!(f, "hist-{}", workload),
        }
    }
}

/// `[min, current]` window shared by every time-series chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDomain {
    pub min: f64,
    pub max: f64,
}

impl TimeDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Serialize for TimeDomain {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.min, self.max].serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallRateRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Event rate")]
    pub rate: f64,
    #[serde(rename = "Desired rate")]
    pub desired_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Latency (ms)")]
    pub latency_ms: f64,
    #[serde(rename = "Percentile")]
    pub percentile: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadRateRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Workload")]
    pub workload: String,
    #[serde(rename = "Event rate")]
    pub rate: f64,
    #[serde(rename = "Desired rate")]
    pub desired_rate: f64,
    /// NaN when the desired rate is zero; serialized as null so the chart
    /// draws a gap.
    #[serde(rename = "Event rate / desired rate")]
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadLatencyRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Workload")]
    pub workload: String,
    #[serde(rename = "Mean latency (ms)")]
    pub mean_ms: f64,
    #[serde(rename = "Max latency (ms)")]
    pub max_ms: f64,
    #[serde(rename = "25th Percentile")]
    pub p25_ms: f64,
    #[serde(rename = "50th Percentile")]
    pub p50_ms: f64,
    #[serde(rename = "75th Percentile")]
    pub p75_ms: f64,
    #[serde(rename = "90th Percentile")]
    pub p90_ms: f64,
    #[serde(rename = "99th Percentile")]
    pub p99_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    #[serde(rename = "Latency (ms)")]
    pub bucket_midpoint_ms: f64,
    #[serde(rename = "Count")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartRow {
    OverallRate(OverallRateRow),
    Percentile(PercentileRow),
    WorkloadRate(WorkloadRateRow),
    WorkloadLatency(WorkloadLatencyRow),
    Histogram(HistogramRow),
}

/// Flattened rows for one chart. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartDataset {
    pub rows: Vec<ChartRow>,
}

impl ChartDataset {
    pub fn new(rows: Vec<ChartRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<ChartRow> for ChartDataset {
    fn from_iter<I: IntoIterator<Item = ChartRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Latency axis bounds of a histogram chart, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramRange {
    pub latency_min_ms: f64,
    pub latency_max_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeHistogram {
    pub dataset: ChartDataset,
    /// None when no snapshot carried a histogram for the workload.
    pub range: Option<HistogramRange>,
}
