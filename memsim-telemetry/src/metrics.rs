//! ## memsim-telemetry::metrics
//! **Prometheus counters and gauges for simulator activity**

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub allocations: IntCounter,
    pub frees: IntCounter,
    pub failed_allocations: IntCounter,
    pub capacity_rejections: IntCounter,
    pub bytes_in_use: IntGauge,
    pub active_blocks: IntGauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let allocations =
            IntCounter::new("memsim_allocations_total", "Successful block allocations")?;
        let frees = IntCounter::new("memsim_frees_total", "Blocks freed")?;
        let failed_allocations = IntCounter::new(
            "memsim_failed_allocations_total",
            "Allocation requests refused by the block source",
        )?;
        let capacity_rejections = IntCounter::new(
            "memsim_capacity_rejections_total",
            "Allocation requests rejected with the registry full",
        )?;
        let bytes_in_use = IntGauge::new("memsim_bytes_in_use", "Sum of live block sizes")?;
        let active_blocks = IntGauge::new("memsim_active_blocks", "Number of live blocks")?;

        registry.register(Box::new(allocations.clone()))?;
        registry.register(Box::new(frees.clone()))?;
        registry.register(Box::new(failed_allocations.clone()))?;
        registry.register(Box::new(capacity_rejections.clone()))?;
        registry.register(Box::new(bytes_in_use.clone()))?;
        registry.register(Box::new(active_blocks.clone()))?;

        Ok(Self {
            registry,
            allocations,
            frees,
            failed_allocations,
            capacity_rejections,
            bytes_in_use,
            active_blocks,
        })
    }

    /// Sets both gauges from the current registry totals.
    pub fn observe_usage(&self, total_bytes: u64, blocks: usize) {
        self.bytes_in_use
            .set(i64::try_from(total_bytes).unwrap_or(i64::MAX));
        self.active_blocks
            .set(i64::try_from(blocks).unwrap_or(i64::MAX));
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
