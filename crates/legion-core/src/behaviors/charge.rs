//! Charge state machine for spears and the vanguard commander.
//!
//! WAITING accumulates speed-scaled time and flips to CHARGING at the
//! configured wait. CHARGING runs straight at the far lane edge and flips to
//! NORMAL once within the edge tolerance. Both states end the unit's turn,
//! so a charging unit never targets or attacks.

use rand_chacha::ChaCha8Rng;

use crate::behavior::{Behavior, BehaviorId, Flow};
use crate::entity::{AiState, BuffId, Entity};
use crate::output::OutputBuffer;
use crate::world_view::WorldView;

/// Holds the charge buff exactly while the unit is waiting or charging.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeStance;

impl Behavior for ChargeStance {
    fn id(&self) -> BehaviorId {
        BehaviorId::ChargeStance
    }

    fn run(&self, _view: &WorldView<'_>, unit: &mut Entity, _out: &mut OutputBuffer, _rng: &mut ChaCha8Rng) -> Flow {
        let hold = unit.charge.state.holds_charge();
        if unit.toggle_buff(BuffId::SpearCharge, hold) {
            tracing::trace!(unit = %unit.id(), hold, "Charge stance toggled");
        }
        Flow::Continue
    }
}

/// Advances the charge state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeRun;

impl Behavior for ChargeRun {
    fn id(&self) -> BehaviorId {
        BehaviorId::ChargeRun
    }

    fn run(&self, view: &WorldView<'_>, unit: &mut Entity, _out: &mut OutputBuffer, _rng: &mut ChaCha8Rng) -> Flow {
        let tuning = view.tuning();
        let clock = view.clock();

        match unit.charge.state {
            AiState::Normal => Flow::Continue,
            AiState::Waiting => {
                unit.charge.timer += clock.scaled_ms();
                if unit.charge.timer >= tuning.charge_wait_ms {
                    unit.charge.state = AiState::Charging;
                    tracing::debug!(unit = %unit.id(), kind = %unit.kind(), "Charge started");
                }
                Flow::Yield
            }
            AiState::Charging => {
                let edge = tuning.charge_edge(unit.team());
                let stats = view.effective_stats(unit);
                let step = stats.move_speed * clock.scaled_frames(tuning);
                let gap = edge - unit.position.x;

                if gap.abs() <= step {
                    unit.position.x = edge;
                } else {
                    unit.position.x += gap.signum() * step;
                }

                if (edge - unit.position.x).abs() < tuning.charge_edge_tolerance {
                    unit.charge.state = AiState::Normal;
                    tracing::debug!(unit = %unit.id(), x = unit.position.x, "Charge finished");
                }
                Flow::Yield
            }
        }
    }
}
