//! Idle Policy
//!
//! Never acts. The machine sells only its initial stock at its initial
//! prices and pays the fee every day, which makes it the baseline every
//! other policy should beat.

use super::VendingAgent;
use crate::models::summary::Briefing;
use crate::orchestrator::ActionWindow;

/// Policy that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl VendingAgent for IdlePolicy {
    fn act(&mut self, _briefing: &Briefing, _window: &mut ActionWindow<'_>) {}

    fn name(&self) -> &str {
        "idle"
    }
}
