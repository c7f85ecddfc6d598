pub mod funnel {
    /// Funnel journeys are a derived projection; rebuilding every 15 minutes
    /// keeps dashboards close enough to live without touching the write path.
    pub const CRON_EXPRESSION: &str = "0 */15 * * * *";
}

pub mod reconcile {
    /// Hourly counter reconciliation bounds the drift of the best-effort
    /// display counters.
    pub const CRON_EXPRESSION: &str = "0 10 * * * *";
}

pub mod payout_sweep {
    /// Monthly payout sweep, shortly after midnight on the 1st, covering the
    /// previous calendar month.
    pub const CRON_EXPRESSION: &str = "0 30 0 1 * *";
}
