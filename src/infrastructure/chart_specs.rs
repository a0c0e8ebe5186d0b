// Declarative chart descriptions (Vega-Lite) for every dashboard chart
use crate::domain::chart::ChartId;
use serde_json::{json, Value};

const VL_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Every view reads its rows from this named data set.
pub const DATA_NAME: &str = "data";

pub fn describe(id: &ChartId) -> Value {
    match id {
        ChartId::OverallRate => rate_chart(id, None),
        ChartId::EventRate => rate_chart(id, Some("Workload")),
        ChartId::OverallLatencyPercentile => time_series(id, "Latency (ms)", Some("Percentile")),
        ChartId::EventRateRatio => time_series(id, "Event rate / desired rate", Some("Workload")),
        ChartId::MeanLatency => time_series(id, "Mean latency (ms)", Some("Workload")),
        ChartId::MaxLatency => time_series(id, "Max latency (ms)", Some("Workload")),
        ChartId::Histogram(_) => histogram(id),
    }
}

fn time_x() -> Value {
    json!({
        "field": "Time",
        "type": "quantitative",
        "scale": { "domain": { "expr": "time_domain" }, "nice": false },
    })
}

fn color(field: &str) -> Value {
    json!({ "field": field, "type": "nominal", "legend": { "orient": "bottom" } })
}

fn base(id: &ChartId, params: Value, layers: Vec<Value>) -> Value {
    json!({
        "$schema": VL_SCHEMA,
        "width": "container",
        "title": id.title(),
        "data": { "name": DATA_NAME },
        "params": params,
        "layer": layers,
    })
}

fn time_domain_params() -> Value {
    json!([{ "name": "time_domain", "value": [0, 1] }])
}

fn time_series(id: &ChartId, y_field: &str, color_field: Option<&str>) -> Value {
    let mut encoding = json!({
        "x": time_x(),
        "y": { "field": y_field, "type": "quantitative" },
    });
    if let Some(field) = color_field {
        encoding["color"] = color(field);
    }

    base(
        id,
        time_domain_params(),
        vec![json!({ "mark": { "type": "line", "point": true }, "encoding": encoding })],
    )
}

// Observed rate as a solid line, desired rate dashed underneath
fn rate_chart(id: &ChartId, color_field: Option<&str>) -> Value {
    let mut chart = time_series(id, "Event rate", color_field);

    let mut desired = json!({
        "x": { "field": "Time", "type": "quantitative" },
        "y": { "field": "Desired rate", "type": "quantitative" },
    });
    if let Some(field) = color_field {
        desired["color"] = json!({ "field": field, "type": "nominal" });
    }

    if let Some(layers) = chart["layer"].as_array_mut() {
        layers.push(json!({
            "mark": { "type": "line", "strokeWidth": 1, "strokeDash": [4, 4] },
            "encoding": desired,
        }));
    }
    chart
}

fn histogram(id: &ChartId) -> Value {
    base(
        id,
        json!([
            { "name": "latency_min", "value": 0 },
            { "name": "latency_max", "value": 1 },
        ]),
        vec![json!({
            "mark": { "type": "bar" },
            "encoding": {
                "x": {
                    "field": "Latency (ms)",
                    "type": "quantitative",
                    "scale": {
                        "domainMin": { "expr": "latency_min" },
                        "domainMax": { "expr": "latency_max" },
                    },
                },
                "y": { "field": "Count", "type": "quantitative" },
            },
        })],
    )
}
