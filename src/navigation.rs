//! Jumping to a search result: highlight, scroll, then fade the highlight.
//!
//! Each jump gets a fresh ticket. Timers carry the ticket they were
//! scheduled with and only act while it is still the current one, so a
//! later jump always owns the highlight.

use std::time::Duration;

use crate::anchors::AnchorRegistry;

/// Delay before scrolling, giving the target collection time to render
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);

/// How long a navigated-to document stays highlighted
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// The two timers a jump needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPlan {
    pub ticket: Ticket,
    pub scroll_after: Duration,
    pub clear_after: Duration,
}

#[derive(Debug, Default)]
pub struct NavigationController {
    generation: u64,
    highlighted: Option<String>,
}

impl NavigationController {
    /// Highlight `id` and hand back the timers to schedule
    pub fn go_to_document(&mut self, id: &str) -> NavigationPlan {
        self.generation += 1;
        self.highlighted = Some(id.to_string());
        log::debug!("navigate to {} (ticket {})", id, self.generation);

        NavigationPlan {
            ticket: Ticket(self.generation),
            scroll_after: SCROLL_DELAY,
            clear_after: HIGHLIGHT_DURATION,
        }
    }

    /// Drop the highlight and invalidate every outstanding timer
    pub fn reset(&mut self) {
        self.generation += 1;
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Scroll timer fired: offset of the highlighted document, if still relevant and rendered
    pub fn scroll_due(&self, ticket: Ticket, anchors: &AnchorRegistry) -> Option<f32> {
        if !self.is_current(ticket) {
            log::debug!("stale scroll timer {:?}", ticket);
            return None;
        }
        anchors.scroll_to(self.highlighted.as_deref()?)
    }

    /// Clear timer fired: drop the highlight unless a newer jump owns it
    pub fn clear_due(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            log::debug!("stale highlight-clear timer {:?}", ticket);
            return false;
        }
        self.highlighted = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::Anchor;

    #[test]
    fn test_clear_comes_after_scroll() {
        assert!(HIGHLIGHT_DURATION > SCROLL_DELAY);

        let mut nav = NavigationController::default();
        let plan = nav.go_to_document("logs-1");
        assert!(plan.clear_after > plan.scroll_after);
    }

    #[test]
    fn test_single_jump_lifecycle() {
        let mut nav = NavigationController::default();
        let mut anchors = AnchorRegistry::default();
        anchors.register("logs-1", Anchor { row: 4 });

        let plan = nav.go_to_document("logs-1");
        assert_eq!(nav.highlighted(), Some("logs-1"));
        assert_eq!(nav.scroll_due(plan.ticket, &anchors), Some(Anchor { row: 4 }.offset()));

        assert!(nav.clear_due(plan.ticket));
        assert_eq!(nav.highlighted(), None);
    }

    #[test]
    fn test_second_jump_owns_highlight() {
        let mut nav = NavigationController::default();

        let first = nav.go_to_document("logs-1");
        let second = nav.go_to_document("users-0");

        // First call's clear fires while the second is still active
        assert!(!nav.clear_due(first.ticket));
        assert_eq!(nav.highlighted(), Some("users-0"));

        assert!(nav.clear_due(second.ticket));
        assert_eq!(nav.highlighted(), None);
    }

    #[test]
    fn test_missing_anchor_is_silent() {
        let mut nav = NavigationController::default();
        let anchors = AnchorRegistry::default();

        let plan = nav.go_to_document("users-7");
        assert_eq!(nav.scroll_due(plan.ticket, &anchors), None);
        assert_eq!(nav.highlighted(), Some("users-7"));
    }

    #[test]
    fn test_stale_scroll_is_ignored() {
        let mut nav = NavigationController::default();
        let mut anchors = AnchorRegistry::default();
        anchors.register("logs-1", Anchor { row: 3 });
        anchors.register("users-0", Anchor { row: 0 });

        let first = nav.go_to_document("logs-1");
        let second = nav.go_to_document("users-0");

        assert_eq!(nav.scroll_due(first.ticket, &anchors), None);
        assert_eq!(nav.scroll_due(second.ticket, &anchors), Some(0.0));
    }

    #[test]
    fn test_reset_invalidates_timers() {
        let mut nav = NavigationController::default();
        let mut anchors = AnchorRegistry::default();
        anchors.register("logs-1", Anchor { row: 3 });

        let plan = nav.go_to_document("logs-1");
        nav.reset();

        assert_eq!(nav.highlighted(), None);
        assert_eq!(nav.scroll_due(plan.ticket, &anchors), None);
        assert!(!nav.clear_due(plan.ticket));

        // Tickets keep counting, so the next jump cannot collide with the old one
        let next = nav.go_to_document("logs-1");
        assert_ne!(next.ticket, plan.ticket);
        assert!(nav.clear_due(next.ticket));
    }
}
