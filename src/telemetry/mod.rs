//! Analytics telemetry collector and helpers.
//!
//! The collector fans analytics events out to live subscribers over a
//! broadcast channel and keeps a bounded history for reporting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tokio::sync::broadcast;

use crate::config::TelemetryConfig;

pub mod events;

pub use events::MetricEvent;

/// Global telemetry hub shared across the crate.
static HUB: OnceCell<TelemetryHub> = OnceCell::new();

/// Access the global telemetry hub, creating it with default sizing if
/// [`init_hub`] was never called.
pub fn hub() -> &'static TelemetryHub {
    HUB.get_or_init(TelemetryHub::default)
}

/// Create the global telemetry hub sized from `config`
///
/// Only the first initialization takes effect; later calls log a warning and
/// return the existing hub.
pub fn init_hub(config: &TelemetryConfig) -> &'static TelemetryHub {
    let mut created = false;
    let hub = HUB.get_or_init(|| {
        created = true;
        TelemetryHub::from_config(config)
    });
    if !created {
        log::warn!("[Telemetry] Hub already initialized, ignoring new sizing");
    }
    hub
}

/// Fire-and-forget analytics destination.
pub trait AnalyticsSink {
    fn track(&self, event: MetricEvent);
}

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of events.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity > 0 {
            // A poisoned history only loses bookkeeping; keep publishing.
            let mut history = self
                .history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        } else {
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
        }

        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

/// Top-level hub wrapping the collector.
pub struct TelemetryHub {
    collector: TelemetryCollector,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize, history_capacity: usize) -> Self {
        Self {
            collector: TelemetryCollector::new(channel_capacity, history_capacity),
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.channel_capacity, config.history_capacity)
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.collector.subscribe()
    }
}

impl AnalyticsSink for TelemetryHub {
    fn track(&self, event: MetricEvent) {
        tracing::debug!(event = event.name(), "analytics event");
        self.collector.publish(event);
    }
}

impl<T: AnalyticsSink + ?Sized> AnalyticsSink for &T {
    fn track(&self, event: MetricEvent) {
        (**self).track(event);
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::InputDevice;
    use std::collections::BTreeMap;

    fn reset_event(device: InputDevice) -> MetricEvent {
        MetricEvent::CalibrationReset { device }
    }

    #[test]
    fn collector_preserves_order_within_history() {
        let collector = TelemetryCollector::new(8, 3);
        collector.publish(reset_event(InputDevice::Keyboard));
        collector.publish(reset_event(InputDevice::Mouse));
        collector.publish(MetricEvent::ControlsChanged {
            preset: "IJKL".to_string(),
        });

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 3);
        assert_eq!(snapshot.recent[0], reset_event(InputDevice::Keyboard));
        assert!(matches!(
            snapshot.recent[2],
            MetricEvent::ControlsChanged { .. }
        ));
    }

    #[test]
    fn collector_drops_history_when_full() {
        let collector = TelemetryCollector::new(8, 2);
        collector.publish(reset_event(InputDevice::Keyboard));
        collector.publish(reset_event(InputDevice::Mouse));
        collector.publish(MetricEvent::SfxToggled {
            key: "playalong_sfx_monster_ace".to_string(),
            enabled: false,
        });

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 2);
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
        assert_eq!(snapshot.recent[0], reset_event(InputDevice::Mouse));
    }

    #[test]
    fn subscribers_receive_tracked_events() {
        let hub = TelemetryHub::new(8, 8);
        let mut rx = hub.subscribe();

        hub.track(MetricEvent::SettingsExited {
            key_calibration: 0.01,
            mouse_calibration: -0.02,
            sfx: BTreeMap::new(),
        });

        let received = rx.try_recv().expect("event should be buffered");
        assert_eq!(received.name(), "Exit Playalong Settings");
        assert_eq!(hub.snapshot().total_events, 1);
    }

    #[test]
    fn hub_from_config_uses_history_capacity() {
        let hub = TelemetryHub::from_config(&TelemetryConfig {
            channel_capacity: 1,
            history_capacity: 1,
        });
        for device in InputDevice::ALL {
            hub.track(reset_event(device));
        }

        let snapshot = hub.snapshot();
        assert_eq!(snapshot.recent, vec![reset_event(InputDevice::Mouse)]);
        assert_eq!(snapshot.total_events, 2);
        assert_eq!(snapshot.dropped_events, 1);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&MetricEvent::CalibrationSample {
            device: InputDevice::Mouse,
            offset_secs: 0.0,
            accepted: true,
        })
        .unwrap();
        assert!(json.contains("\"type\":\"calibration_sample\""), "{}", json);
        assert!(json.contains("\"device\":\"mouse\""), "{}", json);
    }
}
