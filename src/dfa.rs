use super::{
	automaton::{self, Automaton},
	NFA, State, StateAllocator,
};
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};

/// A deterministic finite state automaton.
///
/// The transition function may be partial: a missing transition rejects the input.
#[derive(Default, Debug, Serialize, Deserialize)]
#[serde(from = "DFAFields")]
pub struct DFA {
	#[serde(skip)]
	ids: StateAllocator,
	start: Option<State>,
	states: BTreeSet<State>,
	finals: BTreeSet<State>,
	alphabet: BTreeSet<char>,
	transitions: BTreeMap<State, BTreeMap<char, State>>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DFAFields {
	start: Option<State>,
	states: BTreeSet<State>,
	finals: BTreeSet<State>,
	alphabet: BTreeSet<char>,
	transitions: BTreeMap<State, BTreeMap<char, State>>,
}

impl From<DFAFields> for DFA {
	fn from(fields: DFAFields) -> Self {
		let mut dfa = Self::default();
		for state in fields.states {
			dfa.add_state(state);
		}
		if let Some(start) = fields.start {
			dfa.set_start(start);
		}
		for state in fields.finals {
			dfa.set_final(state, true);
		}
		for (from, row) in fields.transitions {
			dfa.add_state(from);
			for (c, to) in row {
				dfa.add_transition(from, c, to);
			}
		}
		dfa.alphabet.extend(fields.alphabet);
		dfa
	}
}

impl DFA {
	/// Creates an empty DFA drawing its states from `ids`.
	pub fn new(ids: &StateAllocator) -> Self {
		Self {
			ids: ids.clone(),
			..Self::default()
		}
	}

	/// Sets the transition from `from` on `c`, replacing any previous destination.
	pub fn add_transition(&mut self, from: State, c: char, to: State) {
		self.add_state(from);
		self.add_state(to);
		self.alphabet.insert(c);
		self.transitions.entry(from).or_default().insert(c, to);
	}

	/// Returns the destination of `from` on `c`, or `None` if undefined.
	pub fn get_transition(&self, from: State, c: char) -> Option<State> {
		self.transitions.get(&from)?.get(&c).copied()
	}

	/// Adds an input symbol to the alphabet without any transition on it.
	pub fn add_symbol(&mut self, c: char) {
		self.alphabet.insert(c);
	}

	/// Checks whether the automaton accepts `input`.
	/// An undefined transition rejects immediately.
	pub fn accept(&self, input: &str) -> bool {
		let mut current = match self.start {
			Some(start) => start,
			None => return false,
		};
		for c in input.chars() {
			match self.get_transition(current, c) {
				Some(next) => current = next,
				None => return false,
			}
		}
		self.is_final(current)
	}

	/// Builds a DFA accepting exactly the strings over the alphabet this one rejects.
	///
	/// The copy is completed with a fresh sink state, then final status is flipped on
	/// every state. The sink therefore accepts, and so does every input that used to
	/// fall off an undefined transition.
	pub fn complement(&self) -> Self {
		let mut dfa = Self::new(&self.ids);
		dfa.alphabet = self.alphabet.clone();
		for &state in &self.states {
			dfa.add_state(state);
		}
		for (&from, row) in &self.transitions {
			for (&c, &to) in row {
				dfa.add_transition(from, c, to);
			}
		}

		let sink = dfa.new_state();
		dfa.set_start(self.start.unwrap_or(sink));

		let states: Vec<State> = dfa.states.iter().copied().collect();
		for &state in &states {
			for &c in &self.alphabet {
				if dfa.get_transition(state, c).is_none() {
					dfa.add_transition(state, c, sink);
				}
			}
		}
		for state in states {
			dfa.set_final(state, !self.is_final(state));
		}
		dfa
	}

	/// Converts the DFA into an equivalent NFA sharing its allocator.
	pub fn into_nfa(self) -> NFA {
		let mut nfa = NFA::new(&self.ids);
		for &state in &self.states {
			nfa.add_state(state);
		}
		if let Some(start) = self.start {
			nfa.set_start(start);
		}
		for &state in &self.finals {
			nfa.set_final(state, true);
		}
		for &c in &self.alphabet {
			nfa.add_symbol(c);
		}
		for (from, row) in self.transitions {
			for (c, to) in row {
				nfa.add_transition(from, c, to);
			}
		}
		nfa
	}
}

impl Automaton for DFA {
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
		self.transitions.get(&state).map_or(0, BTreeMap::len)
	}
}

impl fmt::Display for DFA {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		automaton::fmt_header(self, f)?;
		for (from, row) in &self.transitions {
			for (c, to) in row {
				writeln!(f, "%  ({} {} {})", from, c, to)?;
			}
		}
		write!(f, "% }}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreeset;

	fn s(id: u32) -> State {
		State::from(id)
	}

	#[test]
	fn construct() {
		let mut dfa = DFA::default();
		dfa.set_start(s(0));
		dfa.set_final(s(1), true);
		dfa.add_transition(s(0), 'a', s(1));
		dfa.add_transition(s(0), 'a', s(0));

		assert!(dfa.has_state(s(1)), "Later added state missing");
		assert!(!dfa.is_final(s(0)), "Start state incorrectly final");
		assert_eq!(
			Some(s(0)),
			dfa.get_transition(s(0), 'a'),
			"Transition not overwritten"
		);
		assert_eq!(None, dfa.get_transition(s(1), 'a'));
		assert_eq!(None, dfa.get_transition(s(5), 'a'), "Absent state found");
	}

	#[test]
	fn accept() {
		let mut dfa = DFA::default();
		dfa.set_start(s(0));
		dfa.set_final(s(1), true);
		dfa.add_transition(s(0), 'a', s(1));
		dfa.add_transition(s(1), 'a', s(1));
		dfa.add_transition(s(1), 'b', s(1));

		assert!(dfa.accept("aab"), "Incorrect result on accepting run");
		assert!(dfa.accept("a"));
		assert!(!dfa.accept(""), "Empty input accepted by a non-final start");
		assert!(!dfa.accept("ba"), "Undefined transition did not reject");
		assert!(!dfa.accept("ac"), "Unknown symbol did not reject");
	}

	#[test]
	fn complement_completes() {
		let mut dfa = DFA::default();
		dfa.set_start(s(0));
		dfa.set_final(s(1), true);
		dfa.add_transition(s(0), 'a', s(1));
		dfa.add_symbol('b');

		let complement = dfa.complement();
		assert_eq!(3, complement.num_states(), "Expected exactly one sink");
		for &state in complement.states() {
			for &c in complement.alphabet() {
				assert!(
					complement.get_transition(state, c).is_some(),
					"Complement is not complete at ({}, {})",
					state,
					c
				);
			}
		}

		let sink = complement.get_transition(s(0), 'b').unwrap();
		assert_eq!(Some(sink), complement.get_transition(sink, 'a'), "Sink not absorbing");
		assert!(complement.is_final(sink), "Sink must accept in the complement");
		assert!(!complement.is_final(s(1)));
		assert!(complement.is_final(s(0)));
	}

	#[test]
	fn complement_without_start() {
		let mut dfa = DFA::default();
		dfa.add_symbol('a');
		let complement = dfa.complement();
		assert!(complement.accept(""), "Complement of the empty language rejects \"\"");
		assert!(complement.accept("aaa"));
		assert!(!complement.accept("b"), "Symbol outside the alphabet accepted");
	}

	#[test]
	fn into_nfa() {
		let mut dfa = DFA::default();
		dfa.set_start(s(0));
		dfa.set_final(s(1), true);
		dfa.add_transition(s(0), 'a', s(1));
		dfa.add_symbol('b');

		let nfa = dfa.into_nfa();
		assert_eq!(Some(s(0)), nfa.start());
		assert_eq!(&btreeset![s(1)], nfa.finals());
		assert_eq!(&btreeset!['a', 'b'], nfa.alphabet());
		assert_eq!(Some(&btreeset![s(1)]), nfa.get_transition(s(0), 'a'));
	}

	#[test]
	fn display() {
		let mut dfa = DFA::default();
		dfa.set_start(s(0));
		dfa.set_final(s(1), true);
		dfa.add_transition(s(1), 'b', s(1));
		dfa.add_transition(s(0), 'a', s(1));

		assert_eq!(
			"% Start 0\n% Final { 1 }\n% States { 0 1 }\n% Alphabet { a b }\n% Transitions {\n%  (0 a 1)\n%  (1 b 1)\n% }",
			dfa.to_string()
		);
	}

	#[test]
	fn deserialize() {
		let yaml = r"{start: 0, finals: [1], transitions: {0: {a: 0, b: 1}, 1: {b: 1}}}";
		let dfa: DFA = serde_yaml::from_str(yaml).unwrap();
		assert!(dfa.has_state(s(0)), "Deserialized DFA is missing state 0");
		assert!(dfa.accept("aabbb"), "Incorrect result after run");
		assert!(!dfa.accept("ba"));
	}

	#[test]
	fn serialize_preserves_language() {
		let ids = StateAllocator::new();
		let mut dfa = NFA::literal(&ids, 'a').to_dfa();
		dfa.add_symbol('b');
		let complement = dfa.complement();

		let yaml = serde_yaml::to_string(&complement).unwrap();
		let loaded: DFA = serde_yaml::from_str(&yaml).unwrap();
		assert_eq!(complement.start(), loaded.start());
		assert!(!complement.words(3).is_empty());
		assert_eq!(complement.words(3), loaded.words(3), "Language changed after reload");
	}
}
