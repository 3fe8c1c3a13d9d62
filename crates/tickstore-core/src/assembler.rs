use serde::{Deserialize, Serialize};

use crate::{Interval, QueryDescriptor, Symbol, TimeWindow, UtcDateTime};

/// One bucketed point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: UtcDateTime,
    pub price: f64,
    pub volume: i64,
}

impl SeriesPoint {
    pub fn new(timestamp: UtcDateTime, price: f64, volume: i64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }
}

/// Query response: ascending points plus the window and interval that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub symbol: Symbol,
    pub data_points: Vec<SeriesPoint>,
    pub total_points: usize,
    pub time_range: TimeWindow,
    pub interval: Interval,
}

impl SeriesResult {
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }
}

/// Shapes raw store rows into a [`SeriesResult`].
///
/// Rows are sorted ascending; rows that share a timestamp merge with the
/// later row's price and the summed volume; the descriptor's limit keeps the
/// most recent points. A bucket that starts before the window keeps its
/// bucket-start timestamp.
pub fn assemble(descriptor: &QueryDescriptor, mut rows: Vec<SeriesPoint>) -> SeriesResult {
    // Stable sort keeps arrival order among equal timestamps, so "later" is well defined.
    rows.sort_by_key(|row| row.timestamp);

    let mut points: Vec<SeriesPoint> = Vec::with_capacity(rows.len());
    for row in rows {
        match points.last_mut() {
            Some(last) if last.timestamp == row.timestamp => {
                last.price = row.price;
                last.volume = last.volume.saturating_add(row.volume);
            }
            _ => points.push(row),
        }
    }

    if let Some(limit) = descriptor.limit {
        if points.len() > limit {
            points.drain(..points.len() - limit);
        }
    }

    SeriesResult {
        symbol: descriptor.symbol.clone(),
        total_points: points.len(),
        data_points: points,
        time_range: descriptor.window,
        interval: descriptor.interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> UtcDateTime {
        UtcDateTime::parse(value).expect("valid")
    }

    fn descriptor() -> QueryDescriptor {
        QueryDescriptor::new(
            Symbol::parse("AAPL").expect("valid"),
            TimeWindow::new(at("2024-05-01T00:00:00Z"), at("2024-05-02T00:00:00Z"))
                .expect("window"),
            Interval::OneMinute,
        )
    }

    #[test]
    fn empty_rows_produce_empty_series_with_echoed_request() {
        let descriptor = descriptor();
        let series = assemble(&descriptor, Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.total_points, 0);
        assert_eq!(series.time_range, descriptor.window);
        assert_eq!(series.interval, Interval::OneMinute);
        assert_eq!(series.symbol.as_str(), "AAPL");
    }

    #[test]
    fn sorts_unordered_rows() {
        let rows = vec![
            SeriesPoint::new(at("2024-05-01T00:02:00Z"), 3.0, 3),
            SeriesPoint::new(at("2024-05-01T00:00:00Z"), 1.0, 1),
            SeriesPoint::new(at("2024-05-01T00:01:00Z"), 2.0, 2),
        ];
        let series = assemble(&descriptor(), rows);
        let prices: Vec<f64> = series.data_points.iter().map(|p| p.price).collect();
        assert_eq!(prices, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn merges_timestamp_collisions_last_price_summed_volume() {
        let rows = vec![
            SeriesPoint::new(at("2024-05-01T00:01:00Z"), 100.0, 10),
            SeriesPoint::new(at("2024-05-01T00:00:00Z"), 99.0, 5),
            SeriesPoint::new(at("2024-05-01T00:01:00Z"), 102.0, 20),
        ];
        let series = assemble(&descriptor(), rows);
        assert_eq!(series.total_points, 2);
        assert_eq!(series.data_points[1].price, 102.0);
        assert_eq!(series.data_points[1].volume, 30);
    }

    #[test]
    fn limit_keeps_most_recent_points() {
        let rows = (0..5)
            .map(|minute| {
                SeriesPoint::new(
                    at(&format!("2024-05-01T00:0{minute}:00Z")),
                    f64::from(minute),
                    1,
                )
            })
            .collect();
        let series = assemble(&descriptor().with_limit(2), rows);
        let prices: Vec<f64> = series.data_points.iter().map(|p| p.price).collect();
        assert_eq!(prices, [3.0, 4.0]);
        assert_eq!(series.total_points, 2);
    }

    #[test]
    fn serializes_wire_shape() {
        let rows = vec![SeriesPoint::new(at("2024-05-01T00:00:00Z"), 150.0, 1000)];
        let value = serde_json::to_value(assemble(&descriptor(), rows)).expect("serialize");
        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["total_points"], 1);
        assert_eq!(value["interval"], "1m");
        assert_eq!(value["time_range"]["start"], "2024-05-01T00:00:00Z");
        assert_eq!(value["data_points"][0]["timestamp"], "2024-05-01T00:00:00Z");
        assert_eq!(value["data_points"][0]["volume"], 1000);
    }
}
