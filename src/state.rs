use serde::{Deserialize, Serialize};
use std::{
	fmt,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
};

/// Opaque identifier of an automaton state.
///
/// Identifiers are handed out by a [`StateAllocator`] and never reused, so states
/// of two automata drawn from the same allocator can be merged without renaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(u32);

impl From<u32> for State {
	fn from(id: u32) -> Self {
		Self(id)
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Shared, monotonically increasing source of state identifiers.
///
/// Cloning the allocator yields another handle to the same counter.
/// Every automaton of a building session should hold a handle to one allocator.
#[derive(Clone, Debug, Default)]
pub struct StateAllocator {
	// one past the highest `u32` id once every identifier is spent
	next: Arc<AtomicU64>,
}

impl StateAllocator {
	/// Creates a new allocator starting at identifier 0.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a fresh state identifier.
	///
	/// # Panics
	/// Panics once all `u32` identifiers have been issued or observed.
	pub fn next_state(&self) -> State {
		match self
			.next
			.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
				if next <= u64::from(u32::MAX) {
					Some(next + 1)
				} else {
					None
				}
			}) {
			Ok(id) => State(id as u32),
			Err(_) => panic!("state identifiers exhausted"),
		}
	}

	/// Makes sure `state` is never issued by this allocator in the future.
	pub fn observe(&self, state: State) {
		self.next
			.fetch_max(u64::from(state.0) + 1, Ordering::Relaxed);
	}

	/// Checks whether both handles share the same counter.
	pub fn shares_counter(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.next, &other.next)
	}
}
