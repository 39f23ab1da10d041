//! bottombar - gesture-driven overlay panels for a mobile browser shell
//!
//! The draggable surfaces a mobile browser hangs off its bottom edge: the
//! bottom sheet (peek / half / full) and the contextual search panel
//! (closed / peeked / expanded / maximized). Both are the same machine
//! underneath:
//!
//! - A swipe detector that claims or yields each touch stream exactly once
//! - A pure settle projection deciding which detent a release lands on
//! - A tick-driven settle animation with a deceleration curve
//! - A detent state machine orchestrating offset, open/close edges, and
//!   at-most-one live transition
//! - A synchronous observer fan-out for toolbars and content hosts
//!
//! Everything is single-threaded and clock-explicit: hosts feed touch
//! samples with timestamps and tick the panel from their frame callbacks.
//! Moving this into a multi-threaded host would mean adding synchronization
//! around the state transitions and the observer list.

pub mod animator;
pub mod config;
pub mod contextual;
pub mod detent;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod metrics;
pub mod panel;
pub mod settle;
pub mod sheet;
pub mod touch;

pub use config::PanelTuning;
pub use contextual::{ContextualSearchPanel, SearchPanelState};
pub use detent::{DetentMap, DetentSet};
pub use error::Error;
pub use events::{ContentId, ObserverId, PanelObserver, PanelPosition};
pub use geometry::{PanelGeometry, Point};
pub use metrics::{PanelMetrics, StateChangeReason};
pub use panel::{PanelContent, PanelCore, TouchDisposition};
pub use sheet::{BottomSheet, SheetState};
pub use touch::{TouchEvent, TouchPhase};
