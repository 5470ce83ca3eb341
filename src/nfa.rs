use super::{
	automaton::{self, Automaton},
	DFA, Label, State, StateAllocator, EPSILON,
};
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt, mem,
};

type Row = BTreeMap<Label, BTreeSet<State>>;

/// A nondeterministic finite automaton with epsilon transitions.
#[derive(Default, Debug, Serialize, Deserialize)]
#[serde(from = "NFAFields")]
pub struct NFA {
	#[serde(skip)]
	ids: StateAllocator,
	start: Option<State>,
	states: BTreeSet<State>,
	finals: BTreeSet<State>,
	alphabet: BTreeSet<char>,
	transitions: BTreeMap<State, Row>,
}

/// Serialized form of an [`NFA`], without its allocator.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NFAFields {
	start: Option<State>,
	states: BTreeSet<State>,
	finals: BTreeSet<State>,
	alphabet: BTreeSet<char>,
	transitions: BTreeMap<State, Row>,
}

impl From<NFAFields> for NFA {
	fn from(fields: NFAFields) -> Self {
		let mut nfa = Self::default();
		for state in fields.states {
			nfa.add_state(state);
		}
		if let Some(start) = fields.start {
			nfa.set_start(start);
		}
		for state in fields.finals {
			nfa.set_final(state, true);
		}
		for (from, row) in fields.transitions {
			nfa.add_state(from);
			for (label, targets) in row {
				for to in targets {
					nfa.add_transition(from, label, to);
				}
			}
		}
		nfa.alphabet.extend(fields.alphabet);
		nfa
	}
}

impl NFA {
	/// Creates an empty NFA drawing its states from `ids`.
	pub fn new(ids: &StateAllocator) -> Self {
		Self {
			ids: ids.clone(),
			..Self::default()
		}
	}

	/// Creates an NFA accepting exactly the one-symbol string `label`,
	/// or only the empty string if `label` is epsilon.
	pub fn literal<L: Into<Label>>(ids: &StateAllocator, label: L) -> Self {
		let mut nfa = Self::new(ids);
		nfa.symbol(label);
		nfa
	}

	/// Adds a transition from `from` to `to`, keeping any existing destinations.
	/// Non-epsilon symbols join the alphabet.
	pub fn add_transition<L: Into<Label>>(&mut self, from: State, label: L, to: State) {
		let label = label.into();
		self.add_state(from);
		self.add_state(to);
		if let Some(c) = label.symbol() {
			self.alphabet.insert(c);
		}
		self.transitions
			.entry(from)
			.or_default()
			.entry(label)
			.or_default()
			.insert(to);
	}

	/// Returns the destinations of `from` on `label`, or `None` if there are none.
	pub fn get_transition<L: Into<Label>>(&self, from: State, label: L) -> Option<&BTreeSet<State>> {
		self.transitions.get(&from)?.get(&label.into())
	}

	/// Adds an input symbol to the alphabet without any transition on it.
	pub fn add_symbol(&mut self, c: char) {
		self.alphabet.insert(c);
	}

	/// Resets the automaton to accept only `label`: a fresh start state with a
	/// single transition to a fresh final state.
	pub fn symbol<L: Into<Label>>(&mut self, label: L) {
		*self = Self::new(&self.ids);
		let start = self.new_state();
		let end = self.new_state();
		self.set_start(start);
		self.set_final(end, true);
		self.add_transition(start, label, end);
	}

	/// Appends `other`: the result accepts `L(self)·L(other)`.
	pub fn concat(&mut self, other: Self) {
		let finals = mem::take(&mut self.finals);
		let (start, other_finals) = self.absorb(other);
		if let Some(start) = start {
			for &state in &finals {
				self.add_transition(state, EPSILON, start);
			}
		}
		self.finals = other_finals;
	}

	/// Joins `other`: the result accepts `L(self) ∪ L(other)`.
	pub fn union(&mut self, other: Self) {
		let start = self.new_state();
		let end = self.new_state();
		if let Some(old) = self.start {
			self.add_transition(start, EPSILON, old);
		}
		let finals = mem::take(&mut self.finals);
		let (other_start, other_finals) = self.absorb(other);
		if let Some(other_start) = other_start {
			self.add_transition(start, EPSILON, other_start);
		}
		self.set_start(start);
		for &state in finals.iter().chain(&other_finals) {
			self.add_transition(state, EPSILON, end);
		}
		self.set_final(end, true);
	}

	/// Applies the Kleene star: the result accepts `L(self)*`.
	pub fn closure(&mut self) {
		let start = self.new_state();
		let end = self.new_state();
		self.add_transition(start, EPSILON, end);
		self.add_transition(end, EPSILON, start);
		if let Some(old) = self.start {
			self.add_transition(start, EPSILON, old);
		}
		for state in mem::take(&mut self.finals) {
			self.add_transition(state, EPSILON, end);
		}
		self.set_start(start);
		self.set_final(end, true);
	}

	/// Moves the states, transitions and alphabet of `other` into `self`.
	/// Returns the start and final states `other` had.
	fn absorb(&mut self, other: Self) -> (Option<State>, BTreeSet<State>) {
		debug_assert!(
			self.ids.shares_counter(&other.ids),
			"absorbed automaton was built from a different allocator"
		);
		let Self {
			start,
			states,
			finals,
			alphabet,
			transitions,
			..
		} = other;
		self.states.extend(states);
		self.alphabet.extend(alphabet);
		for (state, row) in transitions {
			let own = self.transitions.entry(state).or_default();
			for (label, targets) in row {
				own.entry(label).or_default().extend(targets);
			}
		}
		(start, finals)
	}

	/// Computes the set of states reachable from `state` through epsilon transitions only.
	/// The set always contains `state` itself.
	pub fn epsilon_closure(&self, state: State) -> BTreeSet<State> {
		self.epsilon_closure_of(std::iter::once(state))
	}

	/// Computes the union of the epsilon closures of `states`.
	pub fn epsilon_closure_of<I>(&self, states: I) -> BTreeSet<State>
	where
		I: IntoIterator<Item = State>,
	{
		let mut closure = BTreeSet::new();
		let mut stack: Vec<State> = states.into_iter().collect();

		while let Some(state) = stack.pop() {
			if !closure.insert(state) {
				continue;
			}
			if let Some(targets) = self.get_transition(state, EPSILON) {
				stack.extend(targets.iter().filter(|target| !closure.contains(*target)));
			}
		}

		closure
	}

	/// Collects the destinations reachable from any state of `states` on symbol `c`.
	/// Epsilon transitions are not followed.
	fn step(&self, states: &BTreeSet<State>, c: char) -> BTreeSet<State> {
		states
			.iter()
			.filter_map(|&state| self.get_transition(state, c))
			.flatten()
			.copied()
			.collect()
	}

	/// Converts the automaton into an equivalent DFA using the subset construction.
	///
	/// Each DFA state stands for the epsilon closure of a set of NFA states. Sets whose
	/// closure is empty get no DFA state, so the result may be partial.
	pub fn to_dfa(&self) -> DFA {
		self.to_dfa_with(&self.ids)
	}

	/// Like [`NFA::to_dfa`], but draws the DFA states from `ids`.
	///
	/// Determinizing into a separate allocator leaves the numbering of this
	/// automaton's session untouched.
	pub fn to_dfa_with(&self, ids: &StateAllocator) -> DFA {
		let mut dfa = DFA::new(ids);
		for &c in &self.alphabet {
			dfa.add_symbol(c);
		}

		let start = match self.start {
			Some(start) => start,
			None => return dfa,
		};

		// sorted sets act as canonical keys
		let mut mapping: BTreeMap<BTreeSet<State>, State> = BTreeMap::new();
		let mut worklist = Vec::new();

		let initial = self.epsilon_closure(start);
		let initial_state = dfa.new_state();
		dfa.set_start(initial_state);
		mapping.insert(initial.clone(), initial_state);
		worklist.push((initial, initial_state));

		while let Some((current, from)) = worklist.pop() {
			for &c in &self.alphabet {
				let next = self.epsilon_closure_of(self.step(&current, c));
				if next.is_empty() {
					continue;
				}
				let to = match mapping.get(&next) {
					Some(&existing) => existing,
					None => {
						let state = dfa.new_state();
						mapping.insert(next.clone(), state);
						worklist.push((next, state));
						state
					}
				};
				dfa.add_transition(from, c, to);
			}
		}

		for (set, &state) in &mapping {
			if set.iter().any(|nfa_state| self.is_final(*nfa_state)) {
				dfa.set_final(state, true);
			}
		}
		dfa
	}
}

impl Automaton for NFA {
	fn allocator(&self) -> &StateAllocator {
		&self.ids
	}

	fn states(&self) -> &BTreeSet<State> {
		&self.states
	}

	fn finals(&self) -> &BTreeSet<State> {
		&self.finals
	}

	fn alphabet(&self) -> &BTreeSet<char> {
		&self.alphabet
	}

	fn start(&self) -> Option<State> {
		self.start
	}

	fn add_state(&mut self, state: State) {
		if self.states.insert(state) {
			self.ids.observe(state);
			self.transitions.entry(state).or_default();
		}
	}

	fn set_start(&mut self, state: State) {
		self.add_state(state);
		self.start = Some(state);
	}

	fn set_final(&mut self, state: State, accept: bool) {
		self.add_state(state);
		if accept {
			self.finals.insert(state);
		} else {
			self.finals.remove(&state);
		}
	}

	fn out_degree(&self, state: State) -> usize {
		self.transitions
			.get(&state)
			.map_or(0, |row| row.values().map(BTreeSet::len).sum())
	}
}

impl fmt::Display for NFA {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		automaton::fmt_header(self, f)?;
		for (from, row) in &self.transitions {
			for (label, targets) in row {
				let targets: Vec<_> = targets.iter().map(State::to_string).collect();
				writeln!(f, "%  ({} {} [{}])", from, label, targets.join(", "))?;
			}
		}
		write!(f, "% }}")
	}
}
