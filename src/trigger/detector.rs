//! Visibility edge detector

/// Fires once per transition of the sentinel into view.
///
/// Visibility is tracked even while disabled. Enabling the trigger forgets
/// the last report: nothing fires until the observer reports again, and the
/// first visible report after that counts as an entry, the same as a freshly
/// attached observer reporting its initial intersection.
#[derive(Debug, Clone, Default)]
pub struct ScrollTrigger {
    enabled: bool,
    visible: bool,
    fired: u64,
}

impl ScrollTrigger {
    /// Create a disabled trigger with the sentinel out of view
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visibility report, returning true if the trigger fires
    pub fn observe(&mut self, visible: bool) -> bool {
        let entered = visible && !self.visible;
        self.visible = visible;
        self.fire_if(self.enabled && entered)
    }

    /// Gate the trigger. Enabling it never fires by itself.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.visible = false;
        }
        self.enabled = enabled;
    }

    /// Apply the current gate, then a visibility report
    pub fn update(&mut self, visible: bool, enabled: bool) -> bool {
        self.set_enabled(enabled);
        self.observe(visible)
    }

    /// Check if the trigger is listening
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last reported visibility
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of times the trigger fired
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn fire_if(&mut self, fire: bool) -> bool {
        if fire {
            self.fired += 1;
        }
        fire
    }
}
