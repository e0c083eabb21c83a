//! Interval timer core
//!
//! Everything here is independent of how the timer is shown or driven: ticks
//! come from a [`Clock`], output goes to a [`TimerObserver`].

pub mod clock;
pub mod format;
pub mod interval_timer;
pub mod settings;
pub mod view;

pub use clock::{tick_channel, Clock, ManualClock, ScheduleId, TickReceiver, TickSender, TokioClock};
pub use format::format_mmss;
pub use interval_timer::{Completion, IntervalTimer, TimerObserver};
pub use settings::{SettingField, Settings};
pub use view::ViewModel;
