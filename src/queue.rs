use crate::error::{PoolError, Result};

/// A unit of work: a boxed closure owning everything it captured.
pub(crate) type Task = Box<dyn FnOnce() + Send + 'static>;

/// Bounded circular buffer of pending tasks.
///
/// Pure bookkeeping, no locking of its own; the pool calls every method with
/// its mutex held. The slot array length is the capacity, `count` is the only
/// occupancy counter, and the tail index is always derived from `head` and
/// `count` so the three can never drift apart.
pub(crate) struct TaskQueue {
    slots: Vec<Option<Task>>,
    head: usize,
    count: usize,
}

impl TaskQueue {
    /// Creates a queue with room for `capacity` tasks. The pool validates
    /// capacity before construction; zero here is a caller bug.
    pub(crate) fn with_capacity(capacity: usize) -> TaskQueue {
        debug_assert!(capacity > 0, "queue capacity must be positive");
        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);
        TaskQueue {
            slots,
            head: 0,
            count: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Enqueues at the tail, or hands the task back when the queue is full.
    pub(crate) fn try_enqueue(&mut self, task: Task) -> std::result::Result<(), Task> {
        if self.is_full() {
            return Err(task);
        }
        let tail = (self.head + self.count) % self.slots.len();
        debug_assert!(self.slots[tail].is_none(), "tail slot already occupied");
        self.slots[tail] = Some(task);
        self.count += 1;
        Ok(())
    }

    /// Dequeues the oldest task.
    pub(crate) fn try_dequeue(&mut self) -> Option<Task> {
        if self.is_empty() {
            return None;
        }
        let task = self.slots[self.head].take();
        debug_assert!(task.is_some(), "head slot empty with count > 0");
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        task
    }

    /// Moves the queued tasks into a backing store of `new_capacity` slots,
    /// oldest first. Refuses to truncate.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            return Err(PoolError::InvalidArgument("queue capacity must be positive"));
        }
        if new_capacity < self.count {
            return Err(PoolError::InvalidArgument(
                "queue capacity is below the number of queued tasks",
            ));
        }
        let mut slots: Vec<Option<Task>> = Vec::new();
        slots.resize_with(new_capacity, || None);
        for i in 0..self.count {
            let from = (self.head + i) % self.slots.len();
            slots[i] = self.slots[from].take();
        }
        self.slots = slots;
        self.head = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn marker(log: &Arc<Mutex<Vec<usize>>>, i: usize) -> Task {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(i))
    }

    fn run(task: Task) {
        task();
    }

    #[test]
    fn fifo_within_capacity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = TaskQueue::with_capacity(4);
        for i in 0..3 {
            assert!(queue.try_enqueue(marker(&log, i)).is_ok());
        }
        assert_eq!(queue.len(), 3);
        while let Some(task) = queue.try_dequeue() {
            run(task);
        }
        assert!(queue.is_empty());
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn full_queue_hands_the_task_back() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = TaskQueue::with_capacity(2);
        assert!(queue.try_enqueue(marker(&log, 0)).is_ok());
        assert!(queue.try_enqueue(marker(&log, 1)).is_ok());
        let rejected = queue.try_enqueue(marker(&log, 2)).unwrap_err();
        assert_eq!(queue.len(), 2);
        // The rejected closure comes back intact.
        run(rejected);
        assert_eq!(*log.lock().unwrap(), vec![2]);
    }

    #[test]
    fn wraps_around_the_slot_array() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = TaskQueue::with_capacity(3);
        for i in 0..3 {
            assert!(queue.try_enqueue(marker(&log, i)).is_ok());
        }
        run(queue.try_dequeue().unwrap());
        run(queue.try_dequeue().unwrap());
        // Tail wraps past the end of the slot array.
        assert!(queue.try_enqueue(marker(&log, 3)).is_ok());
        assert!(queue.try_enqueue(marker(&log, 4)).is_ok());
        assert!(queue.is_full());
        while let Some(task) = queue.try_dequeue() {
            run(task);
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn resize_preserves_queued_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = TaskQueue::with_capacity(3);
        for i in 0..3 {
            assert!(queue.try_enqueue(marker(&log, i)).is_ok());
        }
        run(queue.try_dequeue().unwrap());
        // Wrapped state: head mid-array, tail at slot zero.
        assert!(queue.try_enqueue(marker(&log, 3)).is_ok());
        queue.resize(5).unwrap();
        assert_eq!(queue.capacity(), 5);
        assert_eq!(queue.len(), 3);
        assert!(queue.try_enqueue(marker(&log, 4)).is_ok());
        while let Some(task) = queue.try_dequeue() {
            run(task);
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn resize_refuses_truncation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = TaskQueue::with_capacity(4);
        for i in 0..3 {
            assert!(queue.try_enqueue(marker(&log, i)).is_ok());
        }
        let err = queue.resize(2).unwrap_err();
        assert!(matches!(err, PoolError::InvalidArgument(_)));
        let err = queue.resize(0).unwrap_err();
        assert!(matches!(err, PoolError::InvalidArgument(_)));
        // Still intact after the refusal.
        assert_eq!(queue.capacity(), 4);
        while let Some(task) = queue.try_dequeue() {
            run(task);
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }
}
