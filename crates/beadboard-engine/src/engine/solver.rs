use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use rayon::prelude::*;

use super::{frame::SearchFrame, puzzle::Puzzle, sink::SolutionSink, solution::Solution};

/// Iterations between two progress messages unless configured otherwise.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Counters reported by a finished or stopped search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Frames popped from the stack.
    pub iterations: u64,
    /// Solutions handed to the sink.
    pub solutions: u64,
    pub max_stack_depth: usize,
    /// `true` if the whole search tree was explored.
    pub completed: bool,
}

impl SearchStats {
    fn merge(&mut self, other: &Self) {
        self.iterations += other.iterations;
        self.solutions += other.solutions;
        self.max_stack_depth = self.max_stack_depth.max(other.max_stack_depth);
        self.completed &= other.completed;
    }
}

/// Depth-first search over the move catalog of a [`Puzzle`].
///
/// The search keeps an explicit stack of [`SearchFrame`]s. Each popped frame
/// either skips its slot or tries every placement of the slot in catalog
/// order, dropping candidates that
///
/// - overlap the board,
/// - leave fewer free cells than the later slots must cover,
/// - leave more free cells than the later slots can cover,
/// - leave a free cell no later slot can reach.
///
/// A candidate that fills the board in the last unskipped slot is a solution
/// and goes straight to the sink.
///
/// # Example
///
/// ```
/// use beadboard_engine::{
///     BoardDims, Inventory, Piece, Puzzle, PuzzleConfig, SolutionCounter, Solver,
/// };
///
/// let dims = BoardDims::new(4, 2).unwrap();
/// let inventory = Inventory::new(vec![
///     Piece::parse("left", "xxxx").unwrap(),
///     Piece::parse("right", "xxxx").unwrap(),
/// ])
/// .unwrap();
/// let puzzle = Puzzle::new(PuzzleConfig::new(dims, inventory));
///
/// let mut counter = SolutionCounter::default();
/// let stats = Solver::new(&puzzle).run(&mut counter).unwrap();
/// assert!(stats.completed);
/// // Both squares go left or right, each in one of 8 orientations.
/// assert_eq!(counter.count, 2 * 8 * 8);
/// ```
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    progress_interval: u64,
    max_solutions: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl<'a> Solver<'a> {
    #[must_use]
    pub fn new(puzzle: &'a Puzzle) -> Self {
        Self {
            puzzle,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_solutions: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Logs progress every `interval` iterations; `0` disables progress.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Stops after `limit` solutions.
    #[must_use]
    pub fn with_max_solutions(mut self, limit: Option<u64>) -> Self {
        self.max_solutions = limit;
        self
    }

    /// Uses `stop` as the stop signal. Setting it makes the search return at
    /// the next popped frame.
    #[must_use]
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    #[must_use]
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the search on the current thread, handing every solution to
    /// `sink`.
    ///
    /// Returns the first error of the sink, which also ends the search.
    pub fn run<S>(&self, sink: &mut S) -> Result<SearchStats, S::Error>
    where
        S: SolutionSink,
    {
        let budget = Budget::new(self.max_solutions);
        let root = SearchFrame::root(self.puzzle);
        let stats = self.explore(vec![root], sink, &budget)?;
        log::debug!(
            "search finished after {} iterations with {} solutions",
            stats.iterations,
            stats.solutions
        );
        Ok(stats)
    }

    /// Runs the search on the rayon thread pool.
    ///
    /// The frames of the first unskipped slot are explored independently,
    /// each on a worker with its own stack. Solutions from different workers
    /// reach `sink` in no particular order. An error of the sink stops every
    /// worker and is returned.
    pub fn run_parallel<S>(&self, sink: &Mutex<S>) -> Result<SearchStats, S::Error>
    where
        S: SolutionSink + Send,
        S::Error: Send,
    {
        let budget = Budget::new(self.max_solutions);
        let mut shared = SharedSink { sink };
        let slot_count = self.puzzle.slot_count();

        let mut root = SearchFrame::root(self.puzzle);
        loop {
            match root.next_slot(slot_count) {
                Some(slot) if self.puzzle.is_skipped(slot) => root = root.skip(),
                _ => break,
            }
        }

        let mut stats = SearchStats {
            iterations: 1,
            completed: true,
            ..SearchStats::default()
        };
        let mut branches = vec![];
        self.expand(&root, &mut branches, &mut shared, &budget, &mut stats)?;
        log::debug!("exploring {} branches in parallel", branches.len());

        let results: Vec<_> = branches
            .into_par_iter()
            .map(|frame| {
                let mut shared = SharedSink { sink };
                let result = self.explore(vec![frame], &mut shared, &budget);
                if result.is_err() {
                    budget.halt();
                }
                result
            })
            .collect();
        for result in results {
            stats.merge(&result?);
        }
        if self.is_stopped(&budget) {
            stats.completed = false;
        }
        Ok(stats)
    }

    fn is_stopped(&self, budget: &Budget) -> bool {
        self.stop.load(Ordering::Relaxed) || budget.is_halted()
    }

    fn explore<S>(
        &self,
        mut stack: Vec<SearchFrame>,
        sink: &mut S,
        budget: &Budget,
    ) -> Result<SearchStats, S::Error>
    where
        S: SolutionSink,
    {
        let mut stats = SearchStats {
            max_stack_depth: stack.len(),
            ..SearchStats::default()
        };
        while let Some(frame) = stack.pop() {
            if self.is_stopped(budget) {
                return Ok(stats);
            }
            stats.iterations += 1;
            if self.progress_interval > 0 && stats.iterations.is_multiple_of(self.progress_interval)
            {
                log::info!(
                    "iteration {}: stack depth {}, free cells {}, solutions {}",
                    stats.iterations,
                    stack.len(),
                    frame.cells_free(),
                    budget.emitted()
                );
            }
            self.expand(&frame, &mut stack, sink, budget, &mut stats)?;
            stats.max_stack_depth = stats.max_stack_depth.max(stack.len());
        }
        stats.completed = true;
        Ok(stats)
    }

    fn expand<S>(
        &self,
        frame: &SearchFrame,
        stack: &mut Vec<SearchFrame>,
        sink: &mut S,
        budget: &Budget,
        stats: &mut SearchStats,
    ) -> Result<(), S::Error>
    where
        S: SolutionSink,
    {
        let puzzle = self.puzzle;
        let Some(slot) = frame.next_slot(puzzle.slot_count()) else {
            // Only reachable when no slot is placed at all.
            if frame.cells_free() == 0 {
                emit(frame.clone().into_solution(), sink, budget, stats)?;
            }
            return Ok(());
        };

        if puzzle.is_skipped(slot) {
            stack.push(frame.skip());
            return Ok(());
        }

        let bounds = puzzle.remaining_beads(slot);
        for &mv in puzzle.catalog().moves(slot) {
            if frame.board().overlaps(mv.mask) {
                continue;
            }
            let board = frame.board() | mv.mask;
            let free = frame.cells_free() - mv.beads;
            if u16::from(free) < bounds.min || u16::from(free) > bounds.max {
                continue;
            }
            if free == 0 {
                if puzzle.is_last_active(slot)
                    && !emit(frame.place(mv).into_solution(), sink, budget, stats)?
                {
                    return Ok(());
                }
                continue;
            }
            if !puzzle.is_reachable(board, slot + 1) {
                continue;
            }
            stack.push(frame.place(mv));
        }
        Ok(())
    }
}

/// Hands `solution` to the sink unless the solution limit is used up.
///
/// Returns `false` once no more solutions are wanted.
fn emit<S>(
    solution: Solution,
    sink: &mut S,
    budget: &Budget,
    stats: &mut SearchStats,
) -> Result<bool, S::Error>
where
    S: SolutionSink,
{
    if !budget.claim() {
        return Ok(false);
    }
    sink.accept(&solution)?;
    stats.solutions += 1;
    Ok(!budget.is_exhausted())
}

/// Solution limit and internal stop flag shared by every worker of a search.
#[derive(Debug)]
struct Budget {
    limit: Option<u64>,
    emitted: AtomicU64,
    halted: AtomicBool,
}

impl Budget {
    fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            emitted: AtomicU64::new(0),
            halted: AtomicBool::new(false),
        }
    }

    fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Reserves one solution, or returns `false` if the limit is reached.
    fn claim(&self) -> bool {
        let Some(limit) = self.limit else {
            self.emitted.fetch_add(1, Ordering::Relaxed);
            return true;
        };
        self.emitted
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < limit).then_some(n + 1)
            })
            .is_ok()
    }

    fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.emitted() >= limit)
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::Relaxed);
    }

    fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed) || self.is_exhausted()
    }
}

struct SharedSink<'a, S> {
    sink: &'a Mutex<S>,
}

impl<S> SolutionSink for SharedSink<'_, S>
where
    S: SolutionSink,
{
    type Error = S::Error;

    fn accept(&mut self, solution: &Solution) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .accept(solution)
    }
}
