//! Deferred work driven by the frame clock

/// Tasks waiting for a point in time (seconds on the presenter's clock)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<(f64, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: f64, task: T) {
        self.tasks.push((at, task));
    }

    /// Remove and return every task due at `now`, earliest first. Tasks
    /// due at the same time keep their scheduling order.
    pub fn take_due(&mut self, now: f64) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = self.tasks.drain(..).partition(|(at, _)| *at <= now);
        self.tasks = waiting;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, task)| task).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
