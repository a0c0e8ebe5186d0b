// Telemetry report domain models - the status payload of a running benchmark
use serde::Deserialize;
use std::collections::HashMap;

/// Full telemetry payload for one poll. Each poll carries the entire history
/// observed so far, not a delta.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(rename = "Workloads")]
    pub workload_names: Vec<String>,
    #[serde(rename = "DataSnapshots")]
    pub snapshots: Vec<Snapshot>,
    pub current_time: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub time: f64,
    #[serde(rename = "AllWorkloadData")]
    pub overall: AggregateMetrics,
    // The benchmark encodes an empty map as null before the first interval
    #[serde(rename = "PerWorkloadData", default, deserialize_with = "null_as_empty")]
    pub per_workload: HashMap<String, AggregateMetrics>,
}

/// Latency figures are in microseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregateMetrics {
    pub rate: f64,
    pub desired_rate: f64,
    pub mean: f64,
    pub max: f64,
    pub percentile25: f64,
    pub percentile50: f64,
    pub percentile75: f64,
    pub percentile90: f64,
    pub percentile99: f64,
    #[serde(default)]
    pub uniform_hist: Option<UniformHistogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UniformHistogram {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub buckets: Vec<HistogramBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistogramBucket {
    #[serde(rename = "From")]
    pub lower_bound: i64,
    #[serde(rename = "To")]
    pub upper_bound: i64,
    #[serde(rename = "Count")]
    pub count: i64,
}

impl HistogramBucket {
    #[cfg(test)]
    pub fn new(lower_bound: i64, upper_bound: i64, count: i64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            count,
        }
    }

    pub fn same_bounds(&self, other: &HistogramBucket) -> bool {
        self.lower_bound == other.lower_bound && self.upper_bound == other.upper_bound
    }
}

impl AggregateMetrics {
    pub fn histogram(&self) -> &[HistogramBucket] {
        self.uniform_hist
            .as_ref()
            .map(|h| h.buckets.as_slice())
            .unwrap_or(&[])
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A report whose workloads and per-snapshot entries are in a deterministic
/// order. Only the normalizer builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReport {
    pub workload_names: Vec<String>,
    pub snapshots: Vec<NormalizedSnapshot>,
    pub current_time: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub time: f64,
    pub overall: AggregateMetrics,
    /// Sorted by workload name.
    pub per_workload: Vec<(String, AggregateMetrics)>,
}

impl NormalizedSnapshot {
    pub fn workload(&self, name: &str) -> Option<&AggregateMetrics> {
        self.per_workload
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|idx| &self.per_workload[idx].1)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_JSON: &str = r#"{
        "CurrentTime": 12.5,
        "Note": "warmup",
        "Workloads": ["write", "read"],
        "DataSnapshots": [
            {
                "Time": 10.0,
                "AllWorkloadData": {
                    "StartTime": "2024-01-01T00:00:00Z",
                    "Count": 40,
                    "Rate": 40.0, "DesiredRate": 50.0,
                    "Min": 10, "Mean": 1200.5, "Max": 5000,
                    "Percentile25": 800, "Percentile50": 1000, "Percentile75": 1500,
                    "Percentile90": 2000, "Percentile99": 4000,
                    "UniformHist": null
                },
                "PerWorkloadData": {
                    "read": {
                        "Rate": 20.0, "DesiredRate": 25.0,
                        "Mean": 1100.0, "Max": 4000,
                        "Percentile25": 700, "Percentile50": 900, "Percentile75": 1400,
                        "Percentile90": 1900, "Percentile99": 3900,
                        "UniformHist": {"Buckets": [{"From": 0, "To": 1000, "Count": 3}]}
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn test_decode_status_payload() {
        let report: Report = serde_json::from_str(STATUS_JSON).unwrap();

        assert_eq!(report.current_time, 12.5);
        assert_eq!(report.note, "warmup");
        assert_eq!(report.workload_names, vec!["write", "read"]);
        assert_eq!(report.snapshots.len(), 1);

        let snapshot = &report.snapshots[0];
        assert_eq!(snapshot.overall.rate, 40.0);
        assert!(snapshot.overall.histogram().is_empty());

        let read = &snapshot.per_workload["read"];
        assert_eq!(read.percentile50, 900.0);
        assert_eq!(read.histogram(), &[HistogramBucket::new(0, 1000, 3)]);
    }

    #[test]
    fn test_decode_null_per_workload_data() {
        let json = r#"{"Time": 1.0, "PerWorkloadData": null, "AllWorkloadData": {
            "Rate": 0, "DesiredRate": 0, "Mean": 0, "Max": 0,
            "Percentile25": 0, "Percentile50": 0, "Percentile75": 0,
            "Percentile90": 0, "Percentile99": 0}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.per_workload.is_empty());
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let result = serde_json::from_str::<Report>(r#"{"Workloads": [], "DataSnapshots": []}"#);
        assert!(result.is_err());
    }
}
