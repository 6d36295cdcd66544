//! Background execution for interactive callers.
//!
//! The optimizer is synchronous; a front end that must stay responsive hands
//! the job to [`spawn_solve`] or [`spawn_plan_routes`] and picks up the
//! result from the returned [`SolveHandle`] when it arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::problem::RoutingProblem;
use crate::solution::Solution;
use crate::solver::{SolveOptions, plan_routes_with_cancel, solve_with_cancel};
use crate::traits::{DistanceMatrixProvider, Location};

/// Completion side of a background route calculation.
#[derive(Debug)]
pub struct SolveHandle {
    receiver: Receiver<Result<Solution, RoutingError>>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SolveHandle {
    /// Asks the search to stop after its current move. The worker still
    /// reports the best feasible routes found so far.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Non-blocking poll, suitable for a UI event loop.
    pub fn try_result(&self) -> Option<Result<Solution, RoutingError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(RoutingError::WorkerDisconnected)),
        }
    }

    /// Blocks until the worker reports.
    pub fn wait(mut self) -> Result<Solution, RoutingError> {
        let result = self.receiver.recv().map_err(|_| RoutingError::WorkerDisconnected)?;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("route worker panicked after reporting");
            }
        }
        result
    }
}

/// Runs `job` on a dedicated thread. The job receives the cancel flag that
/// [`SolveHandle::cancel`] sets.
pub fn spawn<F>(job: F) -> SolveHandle
where
    F: FnOnce(Arc<AtomicBool>) -> Result<Solution, RoutingError> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let thread = thread::spawn(move || {
        let result = job(flag);
        if sender.send(result).is_err() {
            debug!("route result dropped, caller went away");
        }
    });

    SolveHandle {
        receiver,
        cancel,
        thread: Some(thread),
    }
}

pub fn spawn_solve(problem: Arc<RoutingProblem>, options: SolveOptions) -> SolveHandle {
    spawn(move |cancel| solve_with_cancel(&problem, &options, Some(cancel)))
}

pub fn spawn_plan_routes<M>(depot: Location, deliveries: Vec<Location>, provider: M, options: SolveOptions) -> SolveHandle
where
    M: DistanceMatrixProvider + Send + 'static,
{
    spawn(move |cancel| plan_routes_with_cancel(depot, &deliveries, &provider, &options, Some(cancel)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;
    use crate::solution::SolveStatus;
    use crate::solver::build_problem;

    fn problem() -> Arc<RoutingProblem> {
        let matrix = DistanceMatrix::from_rows(vec![vec![0, 3, 4], vec![3, 0, 5], vec![4, 5, 0]]).unwrap();
        Arc::new(build_problem(matrix, &SolveOptions::default()).unwrap())
    }

    #[test]
    fn test_spawn_solve_reports_solution() {
        let handle = spawn_solve(problem(), SolveOptions::default());
        let solution = handle.wait().unwrap();
        assert_eq!(solution.status, SolveStatus::Solved);
        assert_eq!(solution.total_distance(), 12);
    }

    #[test]
    fn test_cancel_before_search_returns_timed_out() {
        let options = SolveOptions {
            vehicles: 2,
            ..SolveOptions::default()
        };
        let matrix = DistanceMatrix::from_rows(vec![vec![0, 3, 4], vec![3, 0, 5], vec![4, 5, 0]]).unwrap();
        let problem = Arc::new(build_problem(matrix, &options).unwrap());

        let handle = spawn(move |cancel| {
            cancel.store(true, Ordering::Relaxed);
            solve_with_cancel(&problem, &options, Some(cancel))
        });
        let solution = handle.wait().unwrap();
        // both deliveries start on vehicle 0, so a balancing move was pending
        assert_eq!(solution.status, SolveStatus::TimedOut);
        assert_eq!(solution.routes.len(), 2);
    }

    #[test]
    fn test_errors_are_forwarded() {
        let handle = spawn_plan_routes((0.0, 0.0), Vec::new(), crate::haversine::HaversineMatrix::default(), SolveOptions::default());
        let err = handle.wait().unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_try_result_eventually_yields() {
        let handle = spawn_solve(problem(), SolveOptions::default());
        let result = loop {
            if let Some(result) = handle.try_result() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(result.is_ok());
        assert!(!handle.is_cancelled());
    }
}
