// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cooperative cancellation.  A render that has been superseded, or
//! that has run past its deadline, should give its threads back
//! promptly instead of finishing on stale parameters.  Workers poll
//! once per column.
//!
//! The token is an epoch counter rather than a flag.  Each render
//! snapshots the epoch when it starts and stops once the epoch moves on,
//! so cancelling only ever reaches renders already in flight.  The next
//! render on the same token starts clean; there is nothing to reset.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A cloneable handle shared between whoever starts renders and whoever
/// wants to abandon them.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicU64>);

impl CancelToken {
    /// A fresh token.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Abandon every render currently watching this token.  Renders
    /// started afterwards are unaffected.
    pub fn cancel(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// How many times `cancel` has been called.
    pub fn epoch(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a worker polls: the render's token, the epoch it started in,
/// and an optional deadline.
#[derive(Copy, Clone, Debug)]
pub struct Interrupt<'a> {
    token: &'a CancelToken,
    epoch: u64,
    deadline: Option<Instant>,
}

impl<'a> Interrupt<'a> {
    /// Starts watching `token` from its current epoch.
    pub fn new(token: &'a CancelToken, deadline: Option<Instant>) -> Interrupt<'a> {
        Interrupt {
            token,
            epoch: token.epoch(),
            deadline,
        }
    }

    /// True once the token has been cancelled since `new`, or the
    /// deadline has passed.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.token.epoch() != self.epoch || self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}
