//! Render scheduling
//!
//! Decides when a node's element enters the live tree. Scheduling never
//! changes program-visible state: property values, child lists and id
//! indexes are updated before an insertion is handed over.

use std::collections::VecDeque;

use crate::backend::{ElementId, Position};
use crate::config::Scheduling;
use crate::node::NodeId;

/// One pending placement of `child` under `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub node: NodeId,
    pub parent: ElementId,
    pub child: ElementId,
    pub position: Position,
}

pub trait RenderScheduler {
    /// Accept an insertion. Returns it back when it must be applied now.
    fn schedule(&mut self, insertion: Insertion) -> Option<Insertion>;

    /// Take every queued insertion, oldest first.
    fn drain(&mut self) -> Vec<Insertion>;

    fn pending(&self) -> usize;
}

/// Applies every insertion inline.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl RenderScheduler for ImmediateScheduler {
    fn schedule(&mut self, insertion: Insertion) -> Option<Insertion> {
        Some(insertion)
    }

    fn drain(&mut self) -> Vec<Insertion> {
        Vec::new()
    }

    fn pending(&self) -> usize {
        0
    }
}

/// Queues insertions until the next frame flush.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    queue: VecDeque<Insertion>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        FrameScheduler::default()
    }
}

impl RenderScheduler for FrameScheduler {
    fn schedule(&mut self, insertion: Insertion) -> Option<Insertion> {
        self.queue.push_back(insertion);
        None
    }

    fn drain(&mut self) -> Vec<Insertion> {
        self.queue.drain(..).collect()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

pub fn scheduler_for(scheduling: Scheduling) -> Box<dyn RenderScheduler> {
    match scheduling {
        Scheduling::Immediate => Box::new(ImmediateScheduler),
        Scheduling::Deferred => Box::new(FrameScheduler::new()),
    }
}
