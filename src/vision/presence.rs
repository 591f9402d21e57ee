//! Debounced target-presence state machine.

/// Presence of a target across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceState {
    /// No target is currently reported.
    #[default]
    NoTarget,
    /// A target was seen recently enough to still be reported.
    TargetPresent,
}

/// Presence flag with debounced loss.
///
/// Any positive detection flips to [`PresenceState::TargetPresent`]
/// immediately; loss is only reported once no detection has arrived for the
/// whole debounce window, suppressing flicker when per-frame detection is
/// noisy. While the window holds, previously published values stay valid but
/// stale.
///
/// This policy covers tape tracking only. Fiducial tracking reports absence
/// immediately every frame and never goes through this type.
#[derive(Debug, Clone)]
pub struct DebouncedPresence {
    state: PresenceState,
    last_seen: f64,
    debounce_secs: f64,
}

impl Default for DebouncedPresence {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DebouncedPresence {
    pub fn new(debounce_secs: f64) -> Self {
        Self {
            state: PresenceState::NoTarget,
            last_seen: 0.0,
            debounce_secs,
        }
    }

    /// Fold one frame's detection outcome into the state machine.
    ///
    /// `now_secs` is a monotonic timestamp; it must not decrease between
    /// calls.
    pub fn update(&mut self, detected: bool, now_secs: f64) -> PresenceState {
        if detected {
            self.state = PresenceState::TargetPresent;
            self.last_seen = now_secs;
        } else if self.state == PresenceState::TargetPresent
            && now_secs - self.last_seen > self.debounce_secs
        {
            self.state = PresenceState::NoTarget;
        }
        self.state
    }

    #[inline]
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Timestamp of the most recent positive detection.
    #[inline]
    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_no_target() {
        let presence = DebouncedPresence::default();
        assert_eq!(presence.state(), PresenceState::NoTarget);
    }

    #[test]
    fn test_detection_flips_present_immediately() {
        let mut presence = DebouncedPresence::default();
        assert_eq!(presence.update(true, 5.0), PresenceState::TargetPresent);
        assert_eq!(presence.last_seen(), 5.0);
    }

    #[test]
    fn test_loss_is_debounced() {
        let mut presence = DebouncedPresence::default();
        presence.update(true, 10.0);

        // Within the window the state holds.
        assert_eq!(presence.update(false, 10.5), PresenceState::TargetPresent);
        // Past the window it drops.
        assert_eq!(presence.update(false, 11.5), PresenceState::NoTarget);
    }

    #[test]
    fn test_redetection_inside_window_refreshes_last_seen() {
        let mut presence = DebouncedPresence::default();
        presence.update(true, 10.0);
        presence.update(false, 10.9);
        presence.update(true, 10.95);
        // The window restarts from the new sighting.
        assert_eq!(presence.update(false, 11.5), PresenceState::TargetPresent);
        assert_eq!(presence.update(false, 12.0), PresenceState::NoTarget);
    }

    #[test]
    fn test_no_target_stays_without_detection() {
        let mut presence = DebouncedPresence::default();
        assert_eq!(presence.update(false, 100.0), PresenceState::NoTarget);
    }

    #[test]
    fn test_custom_debounce_window() {
        let mut presence = DebouncedPresence::new(0.2);
        presence.update(true, 1.0);
        assert_eq!(presence.update(false, 1.15), PresenceState::TargetPresent);
        assert_eq!(presence.update(false, 1.25), PresenceState::NoTarget);
    }
}
