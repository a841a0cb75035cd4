//! Row-count progress notifications

/// Default cadence while reading
pub const READ_NOTIFY_AFTER: u64 = 10_000;

/// Default cadence while bulk copying
pub const COPY_NOTIFY_AFTER: u64 = 200_000;

/// Receives the cumulative number of processed rows
pub trait ProgressObserver {
    /// Called every time the configured number of rows has been processed
    fn on_progress(&mut self, rows: u64);
}

impl<F: FnMut(u64)> ProgressObserver for F {
    fn on_progress(&mut self, rows: u64) {
        self(rows)
    }
}

/// Fires an observer every `notify_after` rows
pub struct Progress<'a> {
    notify_after: u64,
    observer: Option<Box<dyn ProgressObserver + 'a>>,
}

impl<'a> Progress<'a> {
    /// Create a notifier; a cadence of 0 disables notifications
    pub fn new(notify_after: u64) -> Self {
        Self {
            notify_after,
            observer: None,
        }
    }

    /// Attach the observer
    pub fn set_observer<O: ProgressObserver + 'a>(&mut self, observer: O) {
        self.observer = Some(Box::new(observer));
    }

    /// Change the cadence
    pub fn set_notify_after(&mut self, notify_after: u64) {
        self.notify_after = notify_after;
    }

    /// Cadence in rows
    pub fn notify_after(&self) -> u64 {
        self.notify_after
    }

    /// Record that `rows` rows have been processed so far
    pub fn record(&mut self, rows: u64) {
        if self.notify_after > 0 && rows % self.notify_after == 0 {
            self.notify(rows);
        }
    }

    /// Notify regardless of the cadence
    pub fn notify(&mut self, rows: u64) {
        tracing::debug!(rows, "progress");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_progress(rows);
        }
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("notify_after", &self.notify_after)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_fires_on_cadence() {
        let seen = RefCell::new(Vec::new());
        {
            let mut progress = Progress::new(3);
            progress.set_observer(|rows: u64| seen.borrow_mut().push(rows));
            for row in 1..=10 {
                progress.record(row);
            }
            progress.notify(10);
        }
        assert_eq!(*seen.borrow(), vec![3, 6, 9, 10]);
    }

    #[test]
    fn test_zero_cadence_is_silent() {
        let mut count = 0;
        {
            let mut progress = Progress::new(0);
            progress.set_observer(|_: u64| count += 1);
            for row in 1..=5 {
                progress.record(row);
            }
        }
        assert_eq!(count, 0);
    }
}
