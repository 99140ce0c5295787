//! Virtual-time task queue

use std::time::Duration;

use crate::scheduler::Task;

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Tasks ordered by due time, then by scheduling order
#[derive(Default)]
pub(crate) struct TimerQueue {
    now: Duration,
    next_seq: u64,
    tasks: Vec<PendingTask>,
}

impl TimerQueue {
    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn push(&mut self, delay: Duration, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(PendingTask {
            due: self.now + delay,
            seq,
            task,
        });
    }

    /// Remove the earliest task due at or before `limit` (any task if `None`)
    /// and move the clock to its due time.
    pub(crate) fn pop_due(&mut self, limit: Option<Duration>) -> Option<Task> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| limit.map_or(true, |l| t.due <= l))
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let next = self.tasks.remove(index);
        self.now = self.now.max(next.due);
        Some(next.task)
    }

    pub(crate) fn settle_at(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_pop_order_is_due_then_fifo() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = TimerQueue::default();
        for (label, ms) in [("b", 10), ("a", 0), ("c", 10)] {
            let log = log.clone();
            queue.push(Duration::from_millis(ms), Box::new(move || log.borrow_mut().push(label)));
        }

        while let Some(task) = queue.pop_due(None) {
            task();
        }

        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(queue.now(), Duration::from_millis(10));
    }

    #[test]
    fn test_limit_holds_back_future_tasks() {
        let mut queue = TimerQueue::default();
        queue.push(Duration::from_millis(500), Box::new(|| {}));
        assert!(queue.pop_due(Some(Duration::from_millis(499))).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_due(Some(Duration::from_millis(500))).is_some());
    }
}
