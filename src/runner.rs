//! SPMD entry point and the in-process launcher.
//!
//! [`run_rank`] is what every rank executes, whatever the backend; the
//! coordinator returns a [`RunReport`], workers return `None`. A rank whose
//! run fails after the usage checks aborts the whole group, so peers blocked
//! in a receive or barrier terminate instead of waiting forever.

use crate::COORDINATOR;
use crate::algs::communicator::{Communicator, LocalComm};
use crate::algs::pipeline::{RunReport, run_coordinator, run_worker};
use crate::config::RunConfig;
use crate::stencil_error::StencilError;
use log::error;

/// Run this rank's role to completion.
pub fn run_rank<C: Communicator>(
    comm: &C,
    config: &RunConfig,
) -> Result<Option<RunReport>, StencilError> {
    // Every rank sees the same configuration, so each one rejects it on its
    // own and nobody has to be aborted.
    config.validate(comm.size())?;

    let outcome = if comm.rank() == COORDINATOR {
        run_coordinator(comm, config).map(Some)
    } else {
        run_worker(comm, config).map(|()| None)
    };

    if let Err(e) = &outcome {
        if !matches!(e, StencilError::Aborted { .. }) {
            error!("[rank {}] {e}", comm.rank());
            comm.abort(e.exit_code());
        }
    }
    outcome
}

/// Exit code used when a rank's thread panics.
pub const PANIC_EXIT_CODE: i32 = 101;

/// Aborts the group if dropped while its thread is unwinding from a panic.
pub struct AbortOnPanic<'a, C: Communicator> {
    comm: &'a C,
}

impl<'a, C: Communicator> AbortOnPanic<'a, C> {
    pub fn new(comm: &'a C) -> Self {
        Self { comm }
    }
}

impl<C: Communicator> Drop for AbortOnPanic<'_, C> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!("[rank {}] panicked", self.comm.rank());
            self.comm.abort(PANIC_EXIT_CODE);
        }
    }
}

/// Run a whole group of `ranks` ranks as threads of this process.
///
/// Returns the coordinator's report. If any rank fails, the first error
/// that is not a mere consequence of the abort is returned.
pub fn run_local(config: &RunConfig, ranks: usize) -> Result<RunReport, StencilError> {
    config.validate(ranks)?;
    let comms = LocalComm::universe(ranks);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = comms
            .iter()
            .map(|comm| {
                s.spawn(move || {
                    let _guard = AbortOnPanic::new(comm);
                    run_rank(comm, config)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(r) => r,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut report = None;
    let mut failure: Option<StencilError> = None;
    for result in results {
        match result {
            Ok(Some(r)) => report = Some(r),
            Ok(None) => {}
            Err(e) => {
                let replace = match &failure {
                    None => true,
                    Some(StencilError::Aborted { .. }) => {
                        !matches!(e, StencilError::Aborted { .. })
                    }
                    Some(_) => false,
                };
                if replace {
                    failure = Some(e);
                }
            }
        }
    }

    match (failure, report) {
        (Some(e), _) => Err(e),
        (None, Some(r)) => Ok(r),
        (None, None) => Err(StencilError::RankOutOfRange {
            rank: COORDINATOR,
            size: ranks,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_ranks_validate() {
        let report = run_local(&RunConfig::new(4, 4).with_seed(11), 2).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.rows_per_rank, 2);
    }

    #[test]
    fn panicking_rank_releases_blocked_peers() {
        let comms = LocalComm::universe(2);
        std::thread::scope(|s| {
            let peer = s.spawn(|| comms[1].barrier());
            let dying = s.spawn(|| {
                let _guard = AbortOnPanic::new(&comms[0]);
                panic!("rank 0 failed");
            });
            assert!(dying.join().is_err());
            assert!(matches!(
                peer.join().unwrap(),
                Err(StencilError::Aborted {
                    code: PANIC_EXIT_CODE
                })
            ));
        });
    }

    #[test]
    fn usage_error_before_spawning() {
        assert!(matches!(
            run_local(&RunConfig::new(5, 4), 2),
            Err(StencilError::IndivisibleRows { rows: 5, ranks: 2 })
        ));
    }
}
