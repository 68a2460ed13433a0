//! Delivery of diagnostics to the host.
//!
//! The channel keeps the most recent [`DiagnosticSet`] and whether the
//! document is currently shown. A new set replaces the old one atomically;
//! it reaches the host right away while the document is shown, and on the
//! next [`DiagnosticsChannel::show`] otherwise.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use arc_swap::ArcSwap;
use log::debug;

use spright_diagnostics::DiagnosticSet;

use crate::host::DiagnosticsHost;

/// Holds the latest diagnostics of one document.
pub struct DiagnosticsChannel {
    latest: ArcSwap<DiagnosticSet>,
    visible: AtomicBool,
    host: Arc<dyn DiagnosticsHost>,
}

impl DiagnosticsChannel {
    /// Creates a channel with no diagnostics, for a document that is shown
    /// if `visible` is set.
    pub fn new(host: Arc<dyn DiagnosticsHost>, visible: bool) -> Self {
        Self {
            latest: ArcSwap::from_pointee(DiagnosticSet::new()),
            visible: AtomicBool::new(visible),
            host,
        }
    }

    /// Returns the latest set.
    pub fn latest(&self) -> Arc<DiagnosticSet> {
        self.latest.load_full()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Replaces the latest set, publishing it if the document is shown.
    pub fn replace(&self, diagnostics: DiagnosticSet) {
        debug!(count = diagnostics.len(); "Replacing diagnostics");
        let diagnostics = Arc::new(diagnostics);
        self.latest.store(Arc::clone(&diagnostics));
        if self.is_visible() {
            self.host.publish(&diagnostics);
        }
    }

    /// Marks the document as shown and republishes the latest set.
    pub fn show(&self) {
        self.visible.store(true, Ordering::Release);
        self.host.publish(&self.latest.load());
    }

    /// Marks the document as hidden and clears the host's display.
    pub fn hide(&self) {
        self.visible.store(false, Ordering::Release);
        self.host.clear();
    }
}

impl std::fmt::Debug for DiagnosticsChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsChannel")
            .field("latest", &self.latest())
            .field("visible", &self.is_visible())
            .finish_non_exhaustive()
    }
}
