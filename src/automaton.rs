use super::{State, StateAllocator};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};
use thiserror::Error;

/// Trait representing the state store shared by NFAs and DFAs.
///
/// Mutators follow auto-insert semantics: referring to a state the automaton
/// does not contain yet adds it.
pub trait Automaton {
	/// Allocator the automaton draws its fresh states from.
	fn allocator(&self) -> &StateAllocator;

	/// All states, in ascending order.
	fn states(&self) -> &BTreeSet<State>;

	/// Final (accepting) states.
	fn finals(&self) -> &BTreeSet<State>;

	/// Input symbols, excluding epsilon.
	fn alphabet(&self) -> &BTreeSet<char>;

	/// Start state, if one was set.
	fn start(&self) -> Option<State>;

	/// Adds a state with an empty transition row. Does nothing if the state exists.
	fn add_state(&mut self, state: State);

	/// Sets (or resets) the start state.
	fn set_start(&mut self, state: State);

	/// Marks a state as final or removes its final status.
	/// Clearing the status keeps the state itself.
	fn set_final(&mut self, state: State, accept: bool);

	/// Number of transition destinations leaving `state`, over all labels.
	fn out_degree(&self, state: State) -> usize;

	/// Creates a new state with a globally fresh identifier.
	fn new_state(&mut self) -> State {
		let state = self.allocator().next_state();
		self.add_state(state);
		state
	}

	/// Checks whether the automaton includes a state.
	fn has_state(&self, state: State) -> bool {
		self.states().contains(&state)
	}

	/// Checks whether a state is final.
	fn is_final(&self, state: State) -> bool {
		self.finals().contains(&state)
	}

	fn num_states(&self) -> usize {
		self.states().len()
	}

	/// Collects size statistics of the automaton.
	fn stats(&self) -> Stats {
		let mut degrees = BTreeMap::new();
		for &state in self.states() {
			*degrees.entry(self.out_degree(state)).or_insert(0) += 1;
		}
		Stats {
			states: self.num_states(),
			finals: self.finals().len(),
			degrees,
		}
	}
}

/// Enum representing an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutomatonError {
	#[error("Invalid label \"{0}\": expected an empty string or a single character")]
	InvalidLabel(String),
}

/// Size statistics of an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
	pub states: usize,
	pub finals: usize,
	/// Number of states per out-degree.
	pub degrees: BTreeMap<usize, usize>,
}

impl Stats {
	/// Total number of transition destinations.
	pub fn transitions(&self) -> usize {
		self.degrees
			.iter()
			.map(|(degree, count)| degree * count)
			.sum()
	}
}

impl fmt::Display for Stats {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(f, "FiniteAutomaton")?;
		writeln!(f, "  {} states", self.states)?;
		writeln!(f, "  {} final states", self.finals)?;
		write!(f, "  {} transitions", self.transitions())?;
		for (degree, count) in &self.degrees {
			write!(f, "\n    {} states with {} transitions", count, degree)?;
		}
		Ok(())
	}
}

/// Writes the start, final, state and alphabet lines of the text report.
pub(crate) fn fmt_header<A>(automaton: &A, f: &mut fmt::Formatter) -> fmt::Result
where
	A: Automaton + ?Sized,
{
	write!(f, "% Start ")?;
	if let Some(start) = automaton.start() {
		write!(f, "{}", start)?;
	}
	writeln!(f)?;
	fmt_list(f, "Final", automaton.finals())?;
	fmt_list(f, "States", automaton.states())?;
	fmt_list(f, "Alphabet", automaton.alphabet())?;
	writeln!(f, "% Transitions {{")
}

fn fmt_list<T: fmt::Display>(
	f: &mut fmt::Formatter,
	name: &str,
	items: &BTreeSet<T>,
) -> fmt::Result {
	write!(f, "% {} {{", name)?;
	for item in items {
		write!(f, " {}", item)?;
	}
	writeln!(f, " }}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreemap;

	#[test]
	fn stats_display() {
		let stats = Stats {
			states: 3,
			finals: 1,
			degrees: btreemap! {0 => 1, 1 => 2},
		};
		assert_eq!(2, stats.transitions(), "Incorrect transition total");
		assert_eq!(
			"FiniteAutomaton\n  3 states\n  1 final states\n  2 transitions\n    1 states with 0 transitions\n    2 states with 1 transitions",
			stats.to_string()
		);
	}
}
