// Snapshot normalizer - Deterministic ordering of workloads and snapshot entries
use crate::domain::report::{NormalizedReport, NormalizedSnapshot, Report};

/// Sort workload names, snapshots and per-workload entries so that two polls
/// of the same data render workloads in the same positions and colors.
pub fn normalize(report: &Report) -> NormalizedReport {
    let mut workload_names = report.workload_names.clone();
    workload_names.sort();
    workload_names.dedup();

    let mut snapshots: Vec<NormalizedSnapshot> = report
        .snapshots
        .iter()
        .map(|snapshot| {
            let mut per_workload: Vec<_> = snapshot
                .per_workload
                .iter()
                .map(|(name, metrics)| (name.clone(), metrics.clone()))
                .collect();
            per_workload.sort_by(|a, b| a.0.cmp(&b.0));

            NormalizedSnapshot {
                time: snapshot.time,
                overall: snapshot.overall.clone(),
                per_workload,
            }
        })
        .collect();
    // Stable, so equal timestamps keep their arrival order
    snapshots.sort_by(|a, b| a.time.total_cmp(&b.time));

    NormalizedReport {
        workload_names,
        snapshots,
        current_time: report.current_time,
        note: report.note.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::Snapshot;
    use crate::domain::report::fixtures::{metrics, report, snapshot};

    fn denormalize(normalized: &NormalizedReport) -> Report {
        Report {
            workload_names: normalized.workload_names.clone(),
            snapshots: normalized
                .snapshots
                .iter()
                .map(|s| Snapshot {
                    time: s.time,
                    overall: s.overall.clone(),
                    per_workload: s.per_workload.iter().cloned().collect(),
                })
                .collect(),
            current_time: normalized.current_time,
            note: normalized.note.clone(),
        }
    }

    fn sample() -> Report {
        report(
            &["zeta", "alpha", "mid", "alpha"],
            vec![
                snapshot(
                    2.0,
                    vec![("zeta", metrics(1.0, 1.0)), ("alpha", metrics(2.0, 2.0))],
                ),
                snapshot(
                    1.0,
                    vec![("mid", metrics(3.0, 3.0)), ("alpha", metrics(4.0, 4.0))],
                ),
            ],
            3.0,
        )
    }

    #[test]
    fn test_orders_workloads_and_entries() {
        let normalized = normalize(&sample());

        assert_eq!(normalized.workload_names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(normalized.snapshots[0].time, 1.0);
        assert_eq!(normalized.snapshots[1].time, 2.0);

        let names: Vec<&str> = normalized.snapshots[1]
            .per_workload
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(normalized.snapshots[1].workload("zeta").unwrap().rate, 1.0);
        assert!(normalized.snapshots[1].workload("mid").is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&sample());
        let twice = normalize(&denormalize(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut reordered = sample();
        reordered.workload_names.reverse();
        reordered.snapshots.reverse();

        assert_eq!(normalize(&sample()), normalize(&reordered));
    }

    #[test]
    fn test_empty_report() {
        let normalized = normalize(&report(&[], vec![], 0.0));
        assert!(normalized.workload_names.is_empty());
        assert!(normalized.snapshots.is_empty());
    }
}
