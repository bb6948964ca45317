//! The worker pool that hashes blocks off the caller's thread (spec §5).
//!
//! A task stack (LIFO) is guarded by one mutex/condvar pair; the shared
//! running aggregate is guarded by a second, separate mutex, so a worker
//! holds the combine lock only for the few words of an `Op` fold, never
//! while hashing. `thread_count == 0` skips threads entirely and does the
//! same stack-pop/hash/combine sequence inline on the caller's thread, so
//! the two paths produce byte-identical digests (see `src/engine.rs` tests).

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::aggregate::Aggregate;
use crate::block::Block;
use crate::combine::Op;
use crate::hasher::{self, Variant};

struct Task {
    block: Block,
    op: Op,
}

struct StackState {
    tasks: VecDeque<Task>,
    pending: usize,
    shutdown: bool,
}

struct Shared {
    stack: Mutex<StackState>,
    stack_cv: Condvar,
    done_cv: Condvar,
    aggregate: Mutex<Aggregate>,
    poisoned: std::sync::atomic::AtomicBool,
}

/// A running pool of block-hashing workers plus the aggregate they fold
/// their results into.
pub(crate) struct Pool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    variant: Variant,
    bits: u16,
    inline: bool,
}

impl Pool {
    pub(crate) fn new(thread_count: usize, variant: Variant, bits: u16, word_count: usize) -> Self {
        let shared = Arc::new(Shared {
            stack: Mutex::new(StackState {
                tasks: VecDeque::new(),
                pending: 0,
                shutdown: false,
            }),
            stack_cv: Condvar::new(),
            done_cv: Condvar::new(),
            aggregate: Mutex::new(Aggregate::zero(word_count)),
            poisoned: std::sync::atomic::AtomicBool::new(false),
        });

        let mut handles = Vec::with_capacity(thread_count);
        for _ in 0..thread_count {
            let shared = Arc::clone(&shared);
            handles.push(std::thread::spawn(move || worker_loop(shared, variant, bits)));
        }

        Pool {
            shared,
            handles,
            variant,
            bits,
            inline: thread_count == 0,
        }
    }

    /// Queue a block to be hashed and folded into the aggregate with `op`.
    /// For `Op::Sub` the caller supplies the same block (data + header)
    /// that was originally added, so the hash can be recomputed and
    /// subtracted back out — the aggregate never stores per-block hashes.
    pub(crate) fn submit(&self, block: Block, op: Op) {
        if self.inline {
            process_one(&self.shared, self.variant, self.bits, block, op);
            return;
        }
        let mut state = self.shared.stack.lock().unwrap();
        state.tasks.push_back(Task { block, op });
        state.pending += 1;
        self.shared.stack_cv.notify_one();
    }

    /// Block until every queued task has been hashed and combined.
    pub(crate) fn barrier(&self) {
        let mut state = self.shared.stack.lock().unwrap();
        while state.pending > 0 {
            state = self.shared.done_cv.wait(state).unwrap();
        }
    }

    /// Shut down all workers, wait for the queue to drain, and return the
    /// final aggregate bytes, or `Error::WorkerPoisoned` if any worker
    /// panicked while hashing.
    pub(crate) fn shutdown(mut self) -> Result<Vec<u8>, crate::error::Error> {
        self.barrier();
        {
            let mut state = self.shared.stack.lock().unwrap();
            state.shutdown = true;
            self.shared.stack_cv.notify_all();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }

        if self.shared.poisoned.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(crate::error::Error::WorkerPoisoned);
        }
        Ok(self.shared.aggregate.lock().unwrap().to_be_bytes())
    }
}

impl Drop for Pool {
    /// Wakes and joins any workers still blocked on `stack_cv`, so an
    /// engine dropped without calling `finalize` (or one that hits an
    /// error before reaching `pool.shutdown()`) doesn't leak threads
    /// parked forever waiting for work. A no-op once `shutdown` has
    /// already drained `handles`.
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        {
            let mut state = self.shared.stack.lock().unwrap();
            state.shutdown = true;
        }
        self.shared.stack_cv.notify_all();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>, variant: Variant, bits: u16) {
    loop {
        let task = {
            let mut state = shared.stack.lock().unwrap();
            loop {
                if let Some(task) = state.tasks.pop_back() {
                    break Some(task);
                }
                if state.shutdown {
                    break None;
                }
                state = shared.stack_cv.wait(state).unwrap();
            }
        };

        let Some(task) = task else { return };
        process_task(&shared, variant, bits, task);
    }
}

fn process_one(shared: &Arc<Shared>, variant: Variant, bits: u16, block: Block, op: Op) {
    process_task(shared, variant, bits, Task { block, op });
}

fn process_task(shared: &Arc<Shared>, variant: Variant, bits: u16, task: Task) {
    let Task { block, op } = task;

    let result = panic::catch_unwind(AssertUnwindSafe(|| hasher::hash_block(&block, variant, bits)));

    match result {
        Ok(words) => {
            let mut aggregate = shared.aggregate.lock().unwrap();
            aggregate.combine(&words, op);
        }
        Err(_) => {
            shared
                .poisoned
                .store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    let mut state = shared.stack.lock().unwrap();
    state.pending -= 1;
    if state.pending == 0 {
        shared.done_cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    fn make_block(byte: u8, idx: u64) -> Block {
        Block::new(vec![byte; 8], Header::Index(idx))
    }

    #[test]
    fn inline_and_threaded_pools_agree() {
        let blocks: Vec<Block> = (0..20u8).map(|i| make_block(i, i as u64 + 1)).collect();

        let inline_pool = Pool::new(0, Variant::Shake128, 2688, 2688 / 64);
        for b in blocks.clone() {
            inline_pool.submit(b, Op::Add);
        }
        let inline_digest = inline_pool.shutdown().unwrap();

        let threaded_pool = Pool::new(4, Variant::Shake128, 2688, 2688 / 64);
        for b in blocks {
            threaded_pool.submit(b, Op::Add);
        }
        let threaded_digest = threaded_pool.shutdown().unwrap();

        assert_eq!(inline_digest, threaded_digest);
    }

    #[test]
    fn submit_then_sub_restores_zero_aggregate() {
        let pool = Pool::new(2, Variant::Shake128, 2688, 2688 / 64);
        let block = make_block(7, 1);
        pool.submit(block.clone(), Op::Add);
        pool.submit(block, Op::Sub);
        let digest = pool.shutdown().unwrap();
        assert!(digest.iter().all(|&b| b == 0));
    }
}
