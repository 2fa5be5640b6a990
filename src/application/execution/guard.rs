//! Per-allocation in-flight guard.
//!
//! At most one execution per allocation may be running or awaiting
//! confirmation. A lease is held for the duration and released on drop.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::id::AllocationId;

/// Set of allocations with an execution in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlightAllocations {
    active: Arc<Mutex<HashSet<AllocationId>>>,
}

impl InFlightAllocations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `allocation_id`, or `None` if it is already claimed.
    #[must_use]
    pub fn try_acquire(&self, allocation_id: &AllocationId) -> Option<AllocationLease> {
        let mut active = self.active.lock();
        if !active.insert(allocation_id.clone()) {
            return None;
        }
        Some(AllocationLease {
            allocation_id: allocation_id.clone(),
            active: Arc::clone(&self.active),
        })
    }

    #[must_use]
    pub fn is_in_flight(&self, allocation_id: &AllocationId) -> bool {
        self.active.lock().contains(allocation_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }
}

/// Exclusive claim on an allocation. Dropping it releases the claim.
#[derive(Debug)]
pub struct AllocationLease {
    allocation_id: AllocationId,
    active: Arc<Mutex<HashSet<AllocationId>>>,
}

impl AllocationLease {
    #[must_use]
    pub fn allocation_id(&self) -> &AllocationId {
        &self.allocation_id
    }
}

impl Drop for AllocationLease {
    fn drop(&mut self) {
        self.active.lock().remove(&self.allocation_id);
    }
}
