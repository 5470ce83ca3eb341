use crate::{Automaton, DFA};

impl DFA {
	/// Returns every accepted string of length at most `max_len`.
	///
	/// Strings are ordered by length, then lexicographically over the alphabet,
	/// so the empty string comes first. The walk only extends prefixes that still
	/// have a defined run, which yields the same set as testing every string over
	/// the alphabet.
	pub fn words(&self, max_len: usize) -> Vec<String> {
		let mut accepted = Vec::new();
		let start = match self.start() {
			Some(start) => start,
			None => return accepted,
		};

		let mut level = vec![(String::new(), start)];
		for len in 0..=max_len {
			accepted.extend(
				level
					.iter()
					.filter(|(_, state)| self.is_final(*state))
					.map(|(word, _)| word.clone()),
			);
			if len == max_len {
				break;
			}

			let mut next = Vec::with_capacity(level.len());
			for (word, state) in &level {
				for &c in self.alphabet() {
					if let Some(to) = self.get_transition(*state, c) {
						let mut extended = word.clone();
						extended.push(c);
						next.push((extended, to));
					}
				}
			}
			level = next;
		}
		accepted
	}
}

#[cfg(test)]
mod tests {
	use crate::{Automaton, NFA, StateAllocator};

	#[test]
	fn ordered_by_length() {
		let ids = StateAllocator::new();
		let mut nfa = NFA::literal(&ids, 'a');
		nfa.union(NFA::literal(&ids, 'b'));
		nfa.closure();
		let dfa = nfa.to_dfa();

		assert_eq!(
			vec!["", "a", "b", "aa", "ab", "ba", "bb"],
			dfa.words(2),
			"Incorrect enumeration"
		);
		assert_eq!(vec![""], dfa.words(0));
	}

	#[test]
	fn matches_exhaustive_search() {
		let ids = StateAllocator::new();
		let mut nfa = NFA::literal(&ids, 'a');
		nfa.concat(NFA::literal(&ids, 'b'));
		let mut tail = NFA::literal(&ids, 'a');
		tail.closure();
		nfa.concat(tail);
		let dfa = nfa.to_dfa();

		let mut exhaustive = vec![String::new()];
		let mut level = vec![String::new()];
		for _ in 0..4 {
			level = level
				.iter()
				.flat_map(|word| {
					dfa.alphabet().iter().map(move |c| format!("{}{}", word, c))
				})
				.collect();
			exhaustive.extend(level.iter().cloned());
		}
		exhaustive.retain(|word| dfa.accept(word));

		assert_eq!(exhaustive, dfa.words(4));
		assert_eq!(vec!["ab", "aba", "abaa"], dfa.words(4));
	}

	#[test]
	fn empty_language() {
		let dfa = NFA::default().to_dfa();
		assert!(dfa.words(3).is_empty(), "Automaton without start produced words");
	}
}
