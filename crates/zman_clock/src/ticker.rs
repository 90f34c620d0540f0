//! Cooperative interleaving of the fine and render tasks.
//!
//! Both tasks run on one thread. The schedule only says which is due next;
//! the caller sleeps (or advances a manual clock) until then and runs it.
//! A fine tick due at the same instant as a render tick goes first, so the
//! render always sees the offset for its own instant.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Which periodic task is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickKind {
    /// Advance the virtual clock offset.
    Fine,
    /// Run the zmanim/projection/date pipeline and hand a frame to the renderer.
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    fine_period: TimeDelta,
    render_period: TimeDelta,
    next_fine: DateTime<Utc>,
    next_render: DateTime<Utc>,
}

impl TickSchedule {
    /// Schedule starting at `start`: the first render is immediate, the
    /// first fine tick one period later. Periods under 1 ms are raised to 1.
    pub fn new(start: DateTime<Utc>, fine_period_ms: u32, render_period_ms: u32) -> Self {
        let fine_period = TimeDelta::milliseconds(i64::from(fine_period_ms.max(1)));
        Self {
            fine_period,
            render_period: TimeDelta::milliseconds(i64::from(render_period_ms.max(1))),
            next_fine: start + fine_period,
            next_render: start,
        }
    }

    /// The next task and when it is due, without consuming it.
    pub fn peek(&self) -> (TickKind, DateTime<Utc>) {
        if self.next_fine <= self.next_render {
            (TickKind::Fine, self.next_fine)
        } else {
            (TickKind::Render, self.next_render)
        }
    }

    /// Consume the next task.
    pub fn next_tick(&mut self) -> (TickKind, DateTime<Utc>) {
        let (kind, due) = self.peek();
        match kind {
            TickKind::Fine => self.next_fine += self.fine_period,
            TickKind::Render => self.next_render += self.render_period,
        }
        (kind, due)
    }

    /// Skip render ticks already in the past. Fine ticks are never skipped;
    /// the virtual clock catches them up itself.
    pub fn skip_missed_renders(&mut self, now: DateTime<Utc>) -> u32 {
        let mut skipped = 0;
        while self.next_render + self.render_period <= now {
            self.next_render += self.render_period;
            skipped += 1;
        }
        skipped
    }
}

impl Iterator for TickSchedule {
    type Item = (TickKind, DateTime<Utc>);

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_tick())
    }
}
