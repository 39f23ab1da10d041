//! Usage metrics for the panels
//!
//! Records how a panel was opened and closed and how long it stayed open,
//! reported through structured logging. Registered as an ordinary observer
//! by the panel adapters; the adapters feed it reasons around their own
//! entry points since only they know why a transition happened.

use std::time::Instant;

use tracing::info;

use crate::detent::DetentSet;
use crate::events::PanelObserver;

/// Why a panel changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeReason {
    Unknown,
    /// The user swiped the panel.
    Swipe,
    /// The user flung the panel.
    Fling,
    /// The expand button was pressed.
    ExpandButton,
    /// A navigation minimized the panel.
    Navigation,
    /// The user tapped the scrim behind the panel.
    TapScrim,
    /// The system back action closed the panel.
    BackPress,
    /// The user tapped the panel's bar.
    BarTap,
    /// The user tapped the page behind the panel.
    BasePageTap,
    /// The page behind the panel scrolled.
    BasePageScroll,
    /// The close button was pressed.
    CloseButton,
    /// The panel's content was promoted to its own tab.
    Promotion,
}

/// Observer recording open/close reasons and open durations.
pub struct PanelMetrics {
    panel_name: &'static str,
    open_reason: StateChangeReason,
    close_reason: StateChangeReason,
    opened_at: Option<Instant>,
    opens: u64,
    closes: u64,
}

impl PanelMetrics {
    pub fn new(panel_name: &'static str) -> Self {
        Self {
            panel_name,
            open_reason: StateChangeReason::Unknown,
            close_reason: StateChangeReason::Unknown,
            opened_at: None,
            opens: 0,
            closes: 0,
        }
    }

    /// Record why the panel is about to open (or just opened).
    pub fn record_open_reason(&mut self, reason: StateChangeReason) {
        self.open_reason = reason;
        info!(panel = self.panel_name, ?reason, "panel open reason");
    }

    /// Record why the panel is about to close. Logged with the duration once
    /// the close lands.
    pub fn set_close_reason(&mut self, reason: StateChangeReason) {
        self.close_reason = reason;
    }

    pub fn open_count(&self) -> u64 {
        self.opens
    }

    pub fn close_count(&self) -> u64 {
        self.closes
    }
}

impl<D: DetentSet> PanelObserver<D> for PanelMetrics {
    fn on_opened(&mut self) {
        self.opens += 1;
        self.opened_at = Some(Instant::now());
    }

    fn on_closed(&mut self) {
        self.closes += 1;
        let duration_ms = self
            .opened_at
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        info!(
            panel = self.panel_name,
            open_reason = ?self.open_reason,
            close_reason = ?self.close_reason,
            duration_ms,
            "panel session ended"
        );
        self.open_reason = StateChangeReason::Unknown;
        self.close_reason = StateChangeReason::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelTuning;
    use crate::geometry::PanelGeometry;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Two {
        A,
        B,
    }

    impl DetentSet for Two {
        const ALL: &'static [Two] = &[Two::A, Two::B];

        fn height_ratio(self, _geom: &PanelGeometry, _tuning: &PanelTuning) -> f64 {
            match self {
                Two::A => 0.0,
                Two::B => 1.0,
            }
        }
    }

    #[test]
    fn test_counts_sessions() {
        let mut metrics = PanelMetrics::new("test_panel");
        metrics.record_open_reason(StateChangeReason::Swipe);
        PanelObserver::<Two>::on_opened(&mut metrics);
        metrics.set_close_reason(StateChangeReason::TapScrim);
        PanelObserver::<Two>::on_closed(&mut metrics);

        assert_eq!(metrics.open_count(), 1);
        assert_eq!(metrics.close_count(), 1);
    }

    #[test]
    fn test_reasons_reset_after_close() {
        let mut metrics = PanelMetrics::new("test_panel");
        metrics.record_open_reason(StateChangeReason::ExpandButton);
        PanelObserver::<Two>::on_opened(&mut metrics);
        PanelObserver::<Two>::on_closed(&mut metrics);
        assert_eq!(metrics.open_reason, StateChangeReason::Unknown);
        assert_eq!(metrics.close_reason, StateChangeReason::Unknown);
    }
}
