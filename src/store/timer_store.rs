use crate::domain::{SessionKind, TimerSession};
use crate::error::TimerError;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What to do when `start` is called while another task's session is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSessionPolicy {
    /// Refuse with [`TimerError::AlreadyActive`]
    #[default]
    Reject,
    /// Stop the active session as `stop` would and hand it back for committing
    StopPrevious,
    /// Close the active session uncompleted; its elapsed time is dropped
    Abandon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        task_id: Uuid,
        session_id: Uuid,
        interval_start: DateTime<Local>,
        /// Seconds banked by earlier running intervals
        accumulated: u64,
    },
    Paused {
        task_id: Uuid,
        session_id: Uuid,
        elapsed: u64,
    },
}

/// Result of stopping the timer. The caller decides where the time goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedSession {
    pub task_id: Uuid,
    pub session_id: Uuid,
    pub elapsed: u64,
}

/// The single active timer plus the session log. Lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct TimerStore {
    state: TimerState,
    sessions: Vec<TimerSession>,
}

fn seconds_between(start: DateTime<Local>, end: DateTime<Local>) -> u64 {
    (end - start).num_seconds().max(0) as u64
}

impl TimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn active_task(&self) -> Option<Uuid> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { task_id, .. } | TimerState::Paused { task_id, .. } => Some(task_id),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, TimerState::Paused { .. })
    }

    /// Seconds on the clock at `now`. Reading never changes state.
    pub fn elapsed_at(&self, now: DateTime<Local>) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Running {
                interval_start,
                accumulated,
                ..
            } => accumulated + seconds_between(interval_start, now),
            TimerState::Paused { elapsed, .. } => elapsed,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed_at(Local::now())
    }

    pub fn start(
        &mut self,
        task_id: Uuid,
        policy: ActiveSessionPolicy,
    ) -> Result<Option<StoppedSession>, TimerError> {
        self.start_at(task_id, policy, Local::now())
    }

    /// Start a focus session for `task_id`. See [`Self::start_session_at`].
    pub fn start_at(
        &mut self,
        task_id: Uuid,
        policy: ActiveSessionPolicy,
        now: DateTime<Local>,
    ) -> Result<Option<StoppedSession>, TimerError> {
        self.start_session_at(task_id, SessionKind::Focus, policy, now)
    }

    /// Start timing `task_id`.
    ///
    /// Starting the task that is already running does nothing, and starting
    /// the task that is paused resumes it. Another task's active session is
    /// handled by `policy`; with `StopPrevious` the stopped session is
    /// returned so its time can be committed.
    pub fn start_session_at(
        &mut self,
        task_id: Uuid,
        kind: SessionKind,
        policy: ActiveSessionPolicy,
        now: DateTime<Local>,
    ) -> Result<Option<StoppedSession>, TimerError> {
        let mut previous = None;

        match self.active_task() {
            Some(active) if active == task_id => {
                if self.is_paused() {
                    self.resume_at(now);
                }
                return Ok(None);
            }
            Some(active) => match policy {
                ActiveSessionPolicy::Reject => {
                    return Err(TimerError::AlreadyActive { active_task: active });
                }
                ActiveSessionPolicy::StopPrevious => {
                    previous = self.stop_at(now);
                }
                ActiveSessionPolicy::Abandon => {
                    warn!(task_id = %active, elapsed = self.elapsed_at(now), "abandoning active session");
                    self.reset_at(now);
                }
            },
            None => {}
        }

        let session = TimerSession::open(task_id, kind, now);
        self.state = TimerState::Running {
            task_id,
            session_id: session.id,
            interval_start: now,
            accumulated: 0,
        };
        debug!(%task_id, session_id = %session.id, "timer started");
        self.sessions.push(session);

        Ok(previous)
    }

    pub fn pause(&mut self) -> bool {
        self.pause_at(Local::now())
    }

    /// Running to paused, banking the current interval. `false` otherwise.
    pub fn pause_at(&mut self, now: DateTime<Local>) -> bool {
        let TimerState::Running {
            task_id, session_id, ..
        } = self.state
        else {
            debug!(state = ?self.state, "pause ignored, timer not running");
            return false;
        };

        let elapsed = self.elapsed_at(now);
        self.state = TimerState::Paused {
            task_id,
            session_id,
            elapsed,
        };
        debug!(%task_id, elapsed, "timer paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        self.resume_at(Local::now())
    }

    /// Paused to running. `false` otherwise.
    pub fn resume_at(&mut self, now: DateTime<Local>) -> bool {
        let TimerState::Paused {
            task_id,
            session_id,
            elapsed,
        } = self.state
        else {
            debug!(state = ?self.state, "resume ignored, timer not paused");
            return false;
        };

        self.state = TimerState::Running {
            task_id,
            session_id,
            interval_start: now,
            accumulated: elapsed,
        };
        debug!(%task_id, elapsed, "timer resumed");
        true
    }

    pub fn stop(&mut self) -> Option<StoppedSession> {
        self.stop_at(Local::now())
    }

    /// Close the active session as completed and return to idle.
    ///
    /// The elapsed time is returned, not applied anywhere; committing it to a
    /// task is the caller's job. `None` when idle.
    pub fn stop_at(&mut self, now: DateTime<Local>) -> Option<StoppedSession> {
        let (task_id, session_id) = match self.state {
            TimerState::Idle => {
                debug!("stop ignored, timer idle");
                return None;
            }
            TimerState::Running {
                task_id, session_id, ..
            }
            | TimerState::Paused {
                task_id, session_id, ..
            } => (task_id, session_id),
        };

        let elapsed = self.elapsed_at(now);
        if let Some(session) = self.session_mut(session_id) {
            session.complete(elapsed, now);
        }
        self.state = TimerState::Idle;
        info!(%task_id, elapsed, "timer stopped");

        Some(StoppedSession {
            task_id,
            session_id,
            elapsed,
        })
    }

    pub fn reset(&mut self) {
        self.reset_at(Local::now())
    }

    /// Back to idle without committing anything. The open session, if any, is
    /// closed uncompleted.
    pub fn reset_at(&mut self, now: DateTime<Local>) {
        let session_id = match self.state {
            TimerState::Idle => return,
            TimerState::Running { session_id, .. } | TimerState::Paused { session_id, .. } => session_id,
        };
        if let Some(session) = self.session_mut(session_id) {
            session.abandon(now);
        }
        self.state = TimerState::Idle;
        debug!(%session_id, "timer reset");
    }

    fn session_mut(&mut self, session_id: Uuid) -> Option<&mut TimerSession> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    pub fn sessions(&self) -> &[TimerSession] {
        &self.sessions
    }

    pub fn sessions_for_task(&self, task_id: Uuid) -> Vec<&TimerSession> {
        self.sessions.iter().filter(|s| s.task_id == task_id).collect()
    }

    /// Sum of committed durations for the task
    pub fn completed_time_for_task(&self, task_id: Uuid) -> u64 {
        self.sessions
            .iter()
            .filter(|s| s.task_id == task_id && s.completed)
            .map(|s| s.duration)
            .sum()
    }

    pub fn open_session(&self) -> Option<&TimerSession> {
        self.sessions.iter().find(|s| s.is_open())
    }
}
