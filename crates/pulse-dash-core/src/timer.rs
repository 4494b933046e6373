//! Cooperative timer wheel.
//!
//! Tasks are scheduled against an explicit clock (`Duration` since some
//! origin the caller picks) and fire when the owner polls. A task is only
//! ever stopped through its [`TaskHandle`].

use std::time::Duration;

/// A recurring task that fell behind fires at most this many times per poll;
/// older occurrences are dropped.
pub const MAX_CATCH_UP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug)]
struct Task<T> {
    handle: TaskHandle,
    due: Duration,
    repeat: Repeat,
    payload: T,
}

/// A task occurrence returned by [`Timers::poll`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub handle: TaskHandle,
    /// When the occurrence was scheduled to run
    pub due: Duration,
    pub payload: T,
}

#[derive(Debug)]
pub struct Timers<T> {
    tasks: Vec<Task<T>>,
    next_id: u64,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once at `at`
    pub fn once(&mut self, at: Duration, payload: T) -> TaskHandle {
        self.push(at, Repeat::Once, payload)
    }

    /// Runs at `first`, then every `period` until cancelled.
    /// A zero period is raised to one millisecond.
    pub fn every(&mut self, first: Duration, period: Duration, payload: T) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        self.push(first, Repeat::Every(period), payload)
    }

    fn push(&mut self, due: Duration, repeat: Repeat, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            handle,
            due,
            repeat,
            payload,
        });
        handle
    }

    /// Returns false when the task already finished or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.iter().map(|task| task.due).min()
    }

    /// Fires every occurrence due at or before `now`, earliest first.
    /// Occurrences due at the same instant fire in scheduling order.
    pub fn poll(&mut self, now: Duration) -> Vec<Fired<T>> {
        let mut fired = Vec::new();
        let mut catch_up: Vec<(TaskHandle, usize)> = Vec::new();

        while let Some(idx) = self.earliest_due(now) {
            let repeat = self.tasks[idx].repeat;
            fired.push(Fired {
                handle: self.tasks[idx].handle,
                due: self.tasks[idx].due,
                payload: self.tasks[idx].payload.clone(),
            });

            match repeat {
                Repeat::Once => {
                    self.tasks.remove(idx);
                }
                Repeat::Every(period) => {
                    let task = &mut self.tasks[idx];
                    task.due += period;
                    let handle = task.handle;
                    let count = match catch_up.iter_mut().find(|(h, _)| *h == handle) {
                        Some((_, count)) => {
                            *count += 1;
                            *count
                        }
                        None => {
                            catch_up.push((handle, 1));
                            1
                        }
                    };
                    if count >= MAX_CATCH_UP {
                        skip_past(task, now, period);
                    }
                }
            }
        }

        fired
    }

    fn earliest_due(&self, now: Duration) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= now)
            .min_by_key(|(_, task)| (task.due, task.handle))
            .map(|(idx, _)| idx)
    }
}

/// Moves a lagging recurring task to its first occurrence after `now`
fn skip_past<T>(task: &mut Task<T>, now: Duration, period: Duration) {
    if task.due > now {
        return;
    }
    let behind = (now - task.due).as_nanos() / period.as_nanos();
    let steps = u32::try_from(behind + 1).unwrap_or(u32::MAX);
    task.due += period * steps;
}
