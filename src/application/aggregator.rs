// Aggregator - Chart-ready datasets derived from a normalized report
use crate::domain::chart::{
    ChartDataset, ChartId, ChartRow, CumulativeHistogram, HistogramRange, HistogramRow,
    OverallRateRow, PercentileRow, TimeDomain, WorkloadLatencyRow, WorkloadRateRow,
};
use crate::domain::error::DashboardError;
use crate::domain::report::{AggregateMetrics, HistogramBucket, NormalizedReport, NormalizedSnapshot};

const MICROS_PER_MILLI: f64 = 1000.0;

/// Quantiles drawn on the overall percentile chart.
const OVERALL_QUANTILES: [(u8, fn(&AggregateMetrics) -> f64); 4] = [
    (50, |m| m.percentile50),
    (75, |m| m.percentile75),
    (90, |m| m.percentile90),
    (99, |m| m.percentile99),
];

fn to_ms(micros: f64) -> f64 {
    micros / MICROS_PER_MILLI
}

/// First snapshot time up to the report's current time, or `[0, current]`
/// before any snapshot exists.
pub fn time_domain(report: &NormalizedReport) -> TimeDomain {
    let min = report.snapshots.first().map(|s| s.time).unwrap_or(0.0);
    TimeDomain::new(min, report.current_time)
}

fn in_domain<'a>(
    report: &'a NormalizedReport,
    domain: TimeDomain,
) -> impl Iterator<Item = &'a NormalizedSnapshot> {
    report
        .snapshots
        .iter()
        .filter(move |s| s.time >= domain.min && s.time <= domain.max)
}

pub fn overall_rate_series(report: &NormalizedReport, domain: TimeDomain) -> ChartDataset {
    in_domain(report, domain)
        .map(|s| {
            ChartRow::OverallRate(OverallRateRow {
                time: s.time,
                rate: s.overall.rate,
                desired_rate: s.overall.desired_rate,
            })
        })
        .collect()
}

pub fn overall_percentile_series(report: &NormalizedReport, domain: TimeDomain) -> ChartDataset {
    in_domain(report, domain)
        .flat_map(|s| {
            OVERALL_QUANTILES.into_iter().map(move |(percentile, value)| {
                ChartRow::Percentile(PercentileRow {
                    time: s.time,
                    latency_ms: to_ms(value(&s.overall)),
                    percentile,
                })
            })
        })
        .collect()
}

/// Backs both the per-workload rate chart and the rate-ratio chart.
pub fn per_workload_rate_series(report: &NormalizedReport, domain: TimeDomain) -> ChartDataset {
    in_domain(report, domain)
        .flat_map(|s| {
            s.per_workload.iter().map(move |(workload, metrics)| {
                ChartRow::WorkloadRate(WorkloadRateRow {
                    time: s.time,
                    workload: workload.clone(),
                    rate: metrics.rate,
                    desired_rate: metrics.desired_rate,
                    ratio: rate_ratio(metrics.rate, metrics.desired_rate),
                })
            })
        })
        .collect()
}

fn rate_ratio(rate: f64, desired_rate: f64) -> f64 {
    if desired_rate == 0.0 {
        f64::NAN
    } else {
        rate / desired_rate
    }
}

/// Backs both the mean and the max latency charts.
pub fn per_workload_latency_series(report: &NormalizedReport, domain: TimeDomain) -> ChartDataset {
    in_domain(report, domain)
        .flat_map(|s| {
            s.per_workload.iter().map(move |(workload, m)| {
                ChartRow::WorkloadLatency(WorkloadLatencyRow {
                    time: s.time,
                    workload: workload.clone(),
                    mean_ms: to_ms(m.mean),
                    max_ms: to_ms(m.max),
                    p25_ms: to_ms(m.percentile25),
                    p50_ms: to_ms(m.percentile50),
                    p75_ms: to_ms(m.percentile75),
                    p90_ms: to_ms(m.percentile90),
                    p99_ms: to_ms(m.percentile99),
                })
            })
        })
        .collect()
}

/// Sum bucket counts position-wise over every snapshot of `workload`.
///
/// Every contributing snapshot must share the bucket boundaries of the first
/// one; a resized histogram is reported as `InvariantViolation` rather than
/// summed into misaligned buckets. Snapshots without the workload, or
/// without a histogram for it, are skipped.
pub fn cumulative_histogram(
    report: &NormalizedReport,
    workload: &str,
) -> Result<CumulativeHistogram, DashboardError> {
    let mut histograms = report
        .snapshots
        .iter()
        .filter_map(|s| s.workload(workload).map(|m| (s.time, m.histogram())))
        .filter(|(_, buckets)| !buckets.is_empty());

    let Some((_, first)) = histograms.next() else {
        return Ok(CumulativeHistogram {
            dataset: ChartDataset::default(),
            range: None,
        });
    };

    let mut summed: Vec<i64> = first.iter().map(|b| b.count).collect();
    for (time, buckets) in histograms {
        check_bounds(workload, time, first, buckets)?;
        for (total, bucket) in summed.iter_mut().zip(buckets) {
            *total = total.saturating_add(bucket.count);
        }
    }

    let dataset = first
        .iter()
        .zip(summed)
        .map(|(bucket, count)| {
            ChartRow::Histogram(HistogramRow {
                bucket_midpoint_ms: to_ms((bucket.lower_bound + bucket.upper_bound) as f64 / 2.0),
                count,
            })
        })
        .collect();

    // The last bucket collects overflow, so its lower bound closes the axis
    let range = match (first.first(), first.last()) {
        (Some(low), Some(high)) => Some(HistogramRange {
            latency_min_ms: to_ms(low.lower_bound as f64),
            latency_max_ms: to_ms(high.lower_bound as f64),
        }),
        _ => None,
    };

    Ok(CumulativeHistogram { dataset, range })
}

fn check_bounds(
    workload: &str,
    time: f64,
    expected: &[HistogramBucket],
    actual: &[HistogramBucket],
) -> Result<(), DashboardError> {
    if expected.len() != actual.len() {
        return Err(DashboardError::InvariantViolation {
            detail: format!(
                "histogram of {} at t={} has {} buckets, expected {}",
                workload,
                time,
                actual.len(),
                expected.len()
            ),
        });
    }

    if let Some(idx) = expected.iter().zip(actual).position(|(a, b)| !a.same_bounds(b)) {
        return Err(DashboardError::InvariantViolation {
            detail: format!(
                "histogram of {} at t={} bucket {} is [{}, {}), expected [{}, {})",
                workload,
                time,
                idx,
                actual[idx].lower_bound,
                actual[idx].upper_bound,
                expected[idx].lower_bound,
                expected[idx].upper_bound
            ),
        });
    }

    Ok(())
}

/// One chart's worth of derived data for a single poll.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpdate {
    pub id: ChartId,
    pub dataset: ChartDataset,
    pub histogram_range: Option<HistogramRange>,
}

/// Everything a poll pushes to the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    pub time_domain: TimeDomain,
    pub updates: Vec<ChartUpdate>,
}

/// Run every derivation for one poll. Either all charts get data or, on an
/// invariant violation, none do.
pub fn build_frame(report: &NormalizedReport) -> Result<DashboardFrame, DashboardError> {
    let domain = time_domain(report);

    let rates = per_workload_rate_series(report, domain);
    let latencies = per_workload_latency_series(report, domain);

    let mut updates = vec![
        fixed(ChartId::OverallRate, overall_rate_series(report, domain)),
        fixed(
            ChartId::OverallLatencyPercentile,
            overall_percentile_series(report, domain),
        ),
        fixed(ChartId::EventRate, rates.clone()),
        fixed(ChartId::EventRateRatio, rates),
        fixed(ChartId::MeanLatency, latencies.clone()),
        fixed(ChartId::MaxLatency, latencies),
    ];

    for workload in &report.workload_names {
        let histogram = cumulative_histogram(report, workload)?;
        updates.push(ChartUpdate {
            id: ChartId::Histogram(workload.clone()),
            dataset: histogram.dataset,
            histogram_range: histogram.range,
        });
    }

    Ok(DashboardFrame {
        time_domain: domain,
        updates,
    })
}

fn fixed(id: ChartId, dataset: ChartDataset) -> ChartUpdate {
    ChartUpdate {
        id,
        dataset,
        histogram_range: None,
    }
}
