//! The bridge between the authoritative simulation and its views
//!
//! Commands flow in through a FIFO queue; snapshots flow out through a
//! publisher that drops unchanged publishes. A command that cannot be applied
//! leaves a [`Diagnostic`] and a warning behind and is otherwise ignored.

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use log::warn;

use super::command::{Command, CommandQueue, CommandSender};
use super::config::BridgeConfig;
use super::error::CommandError;
use super::snapshot::{SnapshotPublisher, WorldSnapshot};

/// Record of a rejected command
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub tick: u64,
    pub kind: &'static str,
    pub error: CommandError,
}

#[derive(Debug)]
pub struct SyncBridge {
    queue: CommandQueue,
    publisher: SnapshotPublisher,
    diagnostics: VecDeque<Diagnostic>,
    max_diagnostics: usize,
    commands_applied: u64,
    commands_rejected: u64,
}

impl Default for SyncBridge {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}

impl SyncBridge {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            queue: CommandQueue::new(),
            publisher: SnapshotPublisher::new(),
            diagnostics: VecDeque::new(),
            max_diagnostics: config.max_diagnostics,
            commands_applied: 0,
            commands_rejected: 0,
        }
    }

    /// Append a command. Safe to call at any time, including while a batch
    /// is being applied; such commands run on the next drain.
    pub fn enqueue(&self, command: Command) {
        self.queue.push(command);
    }

    pub fn sender(&self) -> CommandSender {
        self.queue.sender()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Take and clear the queue before anything is dispatched
    pub fn drain(&mut self) -> Vec<Command> {
        self.queue.drain()
    }

    /// Count an applied command, or keep a diagnostic for a rejected one
    pub fn record_outcome(
        &mut self,
        tick: u64,
        command: &Command,
        outcome: Result<(), CommandError>,
    ) {
        match outcome {
            Ok(()) => self.commands_applied += 1,
            Err(error) => {
                warn!("Tick {}: rejected {}: {}", tick, command.kind(), error);
                self.commands_rejected += 1;
                if self.max_diagnostics == 0 {
                    return;
                }
                if self.diagnostics.len() == self.max_diagnostics {
                    self.diagnostics.pop_front();
                }
                self.diagnostics.push_back(Diagnostic {
                    tick,
                    kind: command.kind(),
                    error,
                });
            }
        }
    }

    /// Drain the queue and hand each command to `handler` in submission order.
    /// Returns the number of commands applied.
    pub fn drain_and_process<F>(&mut self, tick: u64, mut handler: F) -> usize
    where
        F: FnMut(&Command) -> Result<(), CommandError>,
    {
        let mut applied = 0;
        for command in self.drain() {
            let outcome = handler(&command);
            if outcome.is_ok() {
                applied += 1;
            }
            self.record_outcome(tick, &command, outcome);
        }
        applied
    }

    /// Publish unless structurally equal to the last snapshot
    pub fn publish(&mut self, snapshot: WorldSnapshot) -> bool {
        self.publisher.publish(snapshot)
    }

    pub fn subscribe(&mut self) -> Receiver<Arc<WorldSnapshot>> {
        self.publisher.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<WorldSnapshot>> {
        self.publisher.latest()
    }

    pub fn version(&self) -> u64 {
        self.publisher.version()
    }

    /// Most recent rejections, oldest first
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    pub fn commands_rejected(&self) -> u64 {
        self.commands_rejected
    }
}
