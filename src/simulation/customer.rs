//! Customer lifecycle for the coffee shop simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::debug;
use rand::Rng;

use super::config::CustomerConfig;
use super::types::{CustomerId, FurnitureId, Order, Position, MAX_PATIENCE};

/// Lifecycle stage of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerState {
    WalkingOutside,
    Entering,
    Queueing,
    WalkingToTable,
    Sitting,
    /// Terminal: fading out before removal
    Leaving,
}

impl CustomerState {
    pub fn label(self) -> &'static str {
        match self {
            CustomerState::WalkingOutside => "walking_outside",
            CustomerState::Entering => "entering",
            CustomerState::Queueing => "queueing",
            CustomerState::WalkingToTable => "walking_to_table",
            CustomerState::Sitting => "sitting",
            CustomerState::Leaving => "leaving",
        }
    }

    fn is_walking(self) -> bool {
        matches!(
            self,
            CustomerState::WalkingOutside | CustomerState::Entering | CustomerState::WalkingToTable
        )
    }
}

/// Result of a customer update indicating what the world should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerUpdateResult {
    Continue,
    /// Walked off the street or finished fading out
    Despawn,
    ReachedQueue,
    /// Waiting in the queue and due for a table search
    ReadyForTable,
    Seated,
    PatienceExhausted,
}

/// Fixed points of the scene a customer walks between
#[derive(Debug, Clone, Copy)]
pub struct CustomerPaths {
    pub door: Position,
    pub queue_spot: Position,
    pub scene_width: f32,
    pub scene_height: f32,
}

/// A customer in the coffee shop simulation
#[derive(Debug, Clone)]
pub struct SimCustomer {
    pub id: CustomerId,
    pub state: CustomerState,
    pub position: Position,
    pub target: Position,
    /// Pixels per second
    pub speed: f32,
    pub order: Order,
    pub patience: f32,
    pub is_waiting: bool,
    pub table: Option<FurnitureId>,
    pub seat_index: Option<usize>,
    pub color: &'static str,
    /// Set once leave() has been called
    pub satisfied: Option<bool>,
    table_search_timer: f32,
    seated_elapsed: f32,
    leave_elapsed: f32,
    walk_elapsed: f32,
}

impl SimCustomer {
    pub fn new(
        id: CustomerId,
        position: Position,
        street_end: Position,
        speed: f32,
        order: Order,
        color: &'static str,
    ) -> Self {
        Self {
            id,
            state: CustomerState::WalkingOutside,
            position,
            target: street_end,
            speed,
            order,
            patience: MAX_PATIENCE,
            is_waiting: false,
            table: None,
            seat_index: None,
            color,
            satisfied: None,
            table_search_timer: 0.0,
            seated_elapsed: 0.0,
            leave_elapsed: 0.0,
            walk_elapsed: 0.0,
        }
    }

    fn move_toward_target(&mut self, delta_secs: f32) {
        self.position = self
            .position
            .step_toward(&self.target, self.speed * delta_secs);
        self.walk_elapsed += delta_secs;
    }

    fn has_reached_target(&self, config: &CustomerConfig) -> bool {
        self.position.distance(&self.target) < config.arrival_threshold
    }

    /// Update customer logic
    /// Returns CustomerUpdateResult indicating what action should be taken with the customer
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_secs: f32,
        rng: &mut R,
        config: &CustomerConfig,
        paths: &CustomerPaths,
    ) -> CustomerUpdateResult {
        match self.state {
            CustomerState::WalkingOutside => {
                self.move_toward_target(delta_secs);

                if self.position.distance(&paths.door) < config.door_threshold
                    && rng.random::<f32>() < config.enter_chance
                {
                    self.state = CustomerState::Entering;
                    self.target = paths.queue_spot;
                    debug!("Customer {:?} entering the shop", self.id);
                    return CustomerUpdateResult::Continue;
                }

                let off_scene = self.position.x > paths.scene_width
                    || self.position.y > paths.scene_height;
                if off_scene || self.position == self.target {
                    return CustomerUpdateResult::Despawn;
                }
                CustomerUpdateResult::Continue
            }
            CustomerState::Entering => {
                self.move_toward_target(delta_secs);
                if self.has_reached_target(config) {
                    self.state = CustomerState::Queueing;
                    self.is_waiting = true;
                    self.table_search_timer = config.seat_search_delay;
                    return CustomerUpdateResult::ReachedQueue;
                }
                CustomerUpdateResult::Continue
            }
            CustomerState::Queueing => {
                self.table_search_timer -= delta_secs;
                if self.table_search_timer <= 0.0 {
                    // Rearmed here; a successful search moves us out of the queue
                    self.table_search_timer = config.seat_retry_interval;
                    return CustomerUpdateResult::ReadyForTable;
                }
                CustomerUpdateResult::Continue
            }
            CustomerState::WalkingToTable => {
                self.move_toward_target(delta_secs);
                if self.has_reached_target(config) {
                    self.position = self.target;
                    self.state = CustomerState::Sitting;
                    self.seated_elapsed = 0.0;
                    return CustomerUpdateResult::Seated;
                }
                CustomerUpdateResult::Continue
            }
            CustomerState::Sitting => {
                if !self.is_waiting {
                    return CustomerUpdateResult::Continue;
                }
                self.seated_elapsed += delta_secs;
                let remaining = 1.0 - self.seated_elapsed / self.order.time_limit.max(f32::EPSILON);
                // Never rises, even if the time limit were changed mid-wait
                self.patience = (MAX_PATIENCE * remaining).clamp(0.0, self.patience);
                if self.patience <= 0.0 {
                    return CustomerUpdateResult::PatienceExhausted;
                }
                CustomerUpdateResult::Continue
            }
            CustomerState::Leaving => {
                self.leave_elapsed += delta_secs;
                if self.leave_elapsed >= config.leave_duration {
                    return CustomerUpdateResult::Despawn;
                }
                CustomerUpdateResult::Continue
            }
        }
    }

    /// Send a queued customer to a claimed seat
    pub fn assign_table(&mut self, table: FurnitureId, seat_index: usize, seat: Position) {
        self.table = Some(table);
        self.seat_index = Some(seat_index);
        self.target = seat;
        self.state = CustomerState::WalkingToTable;
        debug!(
            "Customer {:?} heading to table {:?} seat {}",
            self.id, table, seat_index
        );
    }

    /// Follow a table that was moved while we were heading to it or sitting at it
    pub fn retarget_seat(&mut self, seat: Position) {
        self.target = seat;
        if self.state == CustomerState::Sitting {
            self.position = seat;
        }
    }

    /// Start leaving. Detaches from the table and stops patience decay.
    /// Returns false if the customer was already leaving.
    pub fn leave(&mut self, satisfied: bool) -> bool {
        if self.state == CustomerState::Leaving {
            return false;
        }
        self.state = CustomerState::Leaving;
        self.is_waiting = false;
        self.table = None;
        self.seat_index = None;
        self.satisfied = Some(satisfied);
        self.leave_elapsed = 0.0;
        debug!(
            "Customer {:?} leaving {}",
            self.id,
            if satisfied { "happy" } else { "angry" }
        );
        true
    }

    /// Only a seated, waiting customer can take a drink
    pub fn can_be_served(&self) -> bool {
        self.state == CustomerState::Sitting && self.is_waiting
    }

    /// The order is hidden until the customer has queued
    pub fn visible_order(&self) -> Option<&Order> {
        self.is_waiting.then_some(&self.order)
    }

    /// Fade factor during the leave animation
    pub fn opacity(&self, config: &CustomerConfig) -> f32 {
        if self.state != CustomerState::Leaving {
            return 1.0;
        }
        (1.0 - self.leave_elapsed / config.leave_duration.max(f32::EPSILON)).clamp(0.0, 1.0)
    }

    /// Position to draw at: the true position plus a sideways wobble while walking.
    /// Arrival checks never see the wobble.
    pub fn display_position(&self, config: &CustomerConfig) -> Position {
        if !self.state.is_walking() {
            return self.position;
        }
        let sway = config.wobble_amplitude * (self.walk_elapsed * config.wobble_frequency).sin();
        let offset = self.position.perpendicular_offset(&self.target, sway);
        Position::new(self.position.x + offset.x, self.position.y + offset.y)
    }
}
