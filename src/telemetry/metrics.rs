//! Prometheus metrics

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Whole-event stake recomputations
    Recomputes,
    /// Bets given a settlement result
    BetsSettled,
    /// Placed bets grading could not resolve
    SettlementsSkipped,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Total stake across an event's pending bets
    PendingStakeUnits,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::Recomputes => "stakebook_recomputes_total",
            CounterMetric::BetsSettled => "stakebook_bets_settled_total",
            CounterMetric::SettlementsSkipped => "stakebook_settlements_skipped_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::PendingStakeUnits => "stakebook_pending_stake_units",
        }
    }
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, value: u64) {
    ::metrics::counter!(metric.name()).increment(value);
}

/// Set a per-event gauge value
pub fn set_gauge(metric: GaugeMetric, event_id: &str, value: f64) {
    ::metrics::gauge!(metric.name(), "event" => event_id.to_string()).set(value);
    tracing::trace!(metric = metric.name(), event_id, value, "Setting gauge");
}
