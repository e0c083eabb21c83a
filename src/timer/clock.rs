//! Tick scheduling
//!
//! A [`Clock`] fires a repeating schedule by sending the schedule's
//! [`ScheduleId`] on a tick channel. The receiver applies the tick to the
//! timer, which ignores ids that are no longer its active schedule. That makes
//! cancellation deterministic even when a tick is already queued.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

/// Period between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub type TickSender = mpsc::UnboundedSender<ScheduleId>;
pub type TickReceiver = mpsc::UnboundedReceiver<ScheduleId>;

/// Create the channel schedules deliver their ticks on
pub fn tick_channel() -> (TickSender, TickReceiver) {
    mpsc::unbounded_channel()
}

/// Identifies one repeating schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(u64);

impl ScheduleId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Capability to run and cancel repeating schedules
pub trait Clock: Send {
    /// Start sending `id` on `ticks` every `period` until cancelled
    fn schedule_repeating(&mut self, period: Duration, ticks: TickSender) -> ScheduleId;

    /// Stop a schedule. Unknown ids are ignored.
    fn cancel(&mut self, id: ScheduleId);
}

/// Clock backed by tokio timers, one task per schedule
#[derive(Debug)]
pub struct TokioClock {
    runtime: Handle,
    next_id: u64,
    tasks: HashMap<ScheduleId, JoinHandle<()>>,
}

impl TokioClock {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }
}

impl Clock for TokioClock {
    fn schedule_repeating(&mut self, period: Duration, ticks: TickSender) -> ScheduleId {
        self.next_id += 1;
        let id = ScheduleId(self.next_id);

        let task = self.runtime.spawn(async move {
            // First tick one full period from now, not immediately.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if ticks.send(id).is_err() {
                    debug!("Tick receiver dropped, ending schedule {}", id.0);
                    break;
                }
            }
        });

        debug!("Scheduled repeating tick {} every {:?}", id.0, period);
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: ScheduleId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            debug!("Cancelled tick schedule {}", id.0);
        }
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[derive(Debug)]
struct ManualSchedule {
    period: Duration,
    elapsed: Duration,
    ticks: TickSender,
}

#[derive(Debug, Default)]
struct ManualInner {
    next_id: u64,
    schedules: HashMap<ScheduleId, ManualSchedule>,
}

/// Clock that only moves when told to.
///
/// Clones share the same schedules, so a test can keep one handle while the
/// timer owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `elapsed` pass, firing every live schedule once per completed period
    pub fn advance(&self, elapsed: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for (id, schedule) in inner.schedules.iter_mut() {
            if schedule.period.is_zero() {
                continue;
            }
            schedule.elapsed += elapsed;
            while schedule.elapsed >= schedule.period {
                schedule.elapsed -= schedule.period;
                // A closed receiver just means nobody is listening any more.
                let _ = schedule.ticks.send(*id);
            }
        }
    }

    /// Number of schedules that have not been cancelled
    pub fn active_schedules(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .schedules
            .len()
    }
}

impl Clock for ManualClock {
    fn schedule_repeating(&mut self, period: Duration, ticks: TickSender) -> ScheduleId {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = ScheduleId(inner.next_id);
        inner.schedules.insert(
            id,
            ManualSchedule {
                period,
                elapsed: Duration::ZERO,
                ticks,
            },
        );
        id
    }

    fn cancel(&mut self, id: ScheduleId) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .schedules
            .remove(&id);
    }
}
