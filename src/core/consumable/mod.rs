//=========================================================================
// Consumable State Machine
//=========================================================================
//
// Resolves power-up pickups and drives the active power-up through its
// lifecycle.
//
// Architecture:
//   ConsumableSystem
//     ├─ effects: HashMap<ConsumableKind, Box<dyn ConsumableEffect>>
//     └─ policy:  OverlapPolicy
//   RuntimeContext.active_consumable: Option<ConsumableInstance>
//
// Flow (per pickup):
//   resolve_contact() ─ unusable ─► on_unusable()          (no instance)
//        │
//        └─► Idle → Starting ─ started() ─► Active ─┬─ duration 0 ─► Ending → Ended
//                                                   └─ countdown routine
// Flow (per tick):
//   tick_active() ─► effect.tick()
//   [task runner advances the countdown, which may flag Ending]
//   finish_expired() ─► effect.ended() ─► Ended, slot cleared
//
//=========================================================================

//=== Module Declarations =================================================

mod database;
mod descriptor;
mod effects;
mod instance;

//=== Public API ==========================================================

pub use database::{ConsumableDatabase, DatabaseError};
pub use descriptor::{ConsumableDescriptor, ConsumableKind};
pub use effects::{CoinMagnet, ConsumableEffect, EffectContext, ExtraLife, Invincibility};
pub use instance::{ConsumableInstance, ConsumablePhase};

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::math::Vec3;
use crate::core::tasks::ConsumableCountdown;

//=== OverlapPolicy =======================================================

/// What happens when a power-up is picked up while another is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// The new pickup is consumed without effect.
    #[default]
    Ignore,

    /// Same kind restarts the active duration; other kinds are ignored.
    RefreshSameKind,
}

//=== ContactOutcome ======================================================

/// How a power-up pickup was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// An instance is now active and counting down.
    Activated,

    /// Instantaneous effect applied; the instance already ended.
    Completed,

    /// Precondition failed; the effect's fallback reward was applied.
    Fallback,

    /// The active instance of the same kind had its duration restarted.
    Refreshed,

    /// Another power-up is active; the pickup had no effect.
    Ignored,

    /// No effect is registered for this kind.
    Unsupported,
}

impl ContactOutcome {
    /// Returns true if the pickup changed gameplay state.
    pub fn had_effect(self) -> bool {
        matches!(self, Self::Activated | Self::Completed | Self::Fallback | Self::Refreshed)
    }
}

//=== ConsumableSystem ====================================================

/// Lifecycle driver for the single active power-up slot.
pub struct ConsumableSystem {
    effects: HashMap<ConsumableKind, Box<dyn ConsumableEffect>>,
    policy: OverlapPolicy,
    next_instance_id: u64,
}

impl ConsumableSystem {
    //--- Construction -----------------------------------------------------

    /// Creates a system with no registered effects.
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            effects: HashMap::new(),
            policy,
            next_instance_id: 1,
        }
    }

    /// Creates a system with the stock magnet, life and invincibility effects.
    pub fn with_builtin_effects(
        policy: OverlapPolicy,
        magnet_half_extents: Vec3,
        life_fallback_coins: u32,
        blink_period: f32,
    ) -> Self {
        let mut system = Self::new(policy);
        system.register_effect(ConsumableKind::CoinMagnet, CoinMagnet::new(magnet_half_extents));
        system.register_effect(ConsumableKind::ExtraLife, ExtraLife::new(life_fallback_coins));
        system.register_effect(ConsumableKind::Invincibility, Invincibility::new(blink_period));
        system
    }

    //--- Registration -----------------------------------------------------

    /// Registers the effect for a kind, replacing any previous one.
    pub fn register_effect<E>(&mut self, kind: ConsumableKind, effect: E)
    where
        E: ConsumableEffect + 'static,
    {
        if self.effects.insert(kind, Box::new(effect)).is_some() {
            warn!("Effect for {} was already registered and has been replaced", kind);
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    //--- Contact Resolution -----------------------------------------------

    /// Resolves a power-up pickup.
    pub fn resolve_contact(
        &mut self,
        descriptor: Arc<ConsumableDescriptor>,
        ctx: &mut EffectContext<'_>,
    ) -> ContactOutcome {
        let kind = descriptor.kind;

        if let Some(active) = ctx.runtime.active_consumable.as_ref() {
            if self.policy == OverlapPolicy::RefreshSameKind && active.kind() == kind {
                self.refresh_active(ctx);
                return ContactOutcome::Refreshed;
            }

            debug!("Ignoring {} pickup while {} is active", kind, active.kind());
            return ContactOutcome::Ignored;
        }

        let Some(effect) = self.effects.get_mut(&kind) else {
            warn!("No effect registered for {}, pickup skipped", kind);
            return ContactOutcome::Unsupported;
        };

        if !effect.can_be_used(ctx.runtime) {
            debug!("{} cannot be used now, applying fallback", kind);
            effect.on_unusable(ctx);
            return ContactOutcome::Fallback;
        }

        let id = self.next_instance_id;
        self.next_instance_id += 1;

        let mut instance = ConsumableInstance::new(id, Arc::clone(&descriptor));
        instance.set_phase(ConsumablePhase::Starting);
        ctx.runtime.active_consumable = Some(instance);
        debug!("Consumable '{}' starting (instance {})", descriptor.name, id);

        effect.started(&descriptor, ctx);

        if descriptor.is_instantaneous() {
            Self::set_active_phase(ctx, ConsumablePhase::Active);
            Self::set_active_phase(ctx, ConsumablePhase::Ending);
            self.finish(kind, ctx);
            return ContactOutcome::Completed;
        }

        let countdown = ctx.tasks.start(ConsumableCountdown::new(id), Some(descriptor.duration));
        if let Some(instance) = ctx.runtime.active_consumable.as_mut() {
            instance.set_phase(ConsumablePhase::Active);
            instance.set_countdown(Some(countdown));
        }

        ContactOutcome::Activated
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs the active instance's per-tick effect.
    pub fn tick_active(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(kind) = Self::active_kind_in(ctx, ConsumablePhase::Active) else {
            return;
        };

        if let Some(effect) = self.effects.get_mut(&kind) {
            effect.tick(ctx);
        }
    }

    /// Ends the active instance if its countdown flagged it as expired.
    pub fn finish_expired(&mut self, ctx: &mut EffectContext<'_>) {
        if let Some(kind) = Self::active_kind_in(ctx, ConsumablePhase::Ending) {
            self.finish(kind, ctx);
        }
    }

    /// Ends the active instance immediately, whatever its phase.
    pub fn end_active(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(kind) = ctx.runtime.active_consumable.as_ref().map(|i| i.kind()) else {
            return;
        };

        Self::set_active_phase(ctx, ConsumablePhase::Ending);
        self.finish(kind, ctx);
    }

    //--- Internal Helpers -------------------------------------------------

    fn finish(&mut self, kind: ConsumableKind, ctx: &mut EffectContext<'_>) {
        if let Some(effect) = self.effects.get_mut(&kind) {
            effect.ended(ctx);
        }

        if let Some(mut instance) = ctx.runtime.active_consumable.take() {
            if let Some(countdown) = instance.countdown() {
                ctx.tasks.cancel(countdown);
            }
            instance.set_phase(ConsumablePhase::Ended);
            debug!("Consumable '{}' ended after {:.2}s", instance.descriptor().name, instance.elapsed);
        }
    }

    fn refresh_active(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(instance) = ctx.runtime.active_consumable.as_mut() else {
            return;
        };

        if let Some(countdown) = instance.countdown() {
            ctx.tasks.cancel(countdown);
        }

        instance.elapsed = 0.0;
        let id = instance.id();
        let duration = instance.descriptor().duration;
        debug!("Refreshing consumable '{}' (instance {})", instance.descriptor().name, id);

        let countdown = ctx.tasks.start(ConsumableCountdown::new(id), Some(duration));
        if let Some(instance) = ctx.runtime.active_consumable.as_mut() {
            instance.set_countdown(Some(countdown));
        }
    }

    fn active_kind_in(ctx: &EffectContext<'_>, phase: ConsumablePhase) -> Option<ConsumableKind> {
        ctx.runtime
            .active_consumable
            .as_ref()
            .filter(|i| i.phase() == phase)
            .map(|i| i.kind())
    }

    fn set_active_phase(ctx: &mut EffectContext<'_>, phase: ConsumablePhase) {
        if let Some(instance) = ctx.runtime.active_consumable.as_mut() {
            instance.set_phase(phase);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
