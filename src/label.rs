use super::AutomatonError;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Label of an NFA transition.
///
/// Labels are written as strings: the empty string stands for epsilon,
/// any single character for the corresponding input symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
	Epsilon,
	Symbol(char),
}

/// The empty-string label.
pub const EPSILON: Label = Label::Epsilon;

impl Label {
	/// Returns the input symbol, or `None` for epsilon.
	pub fn symbol(self) -> Option<char> {
		match self {
			Self::Epsilon => None,
			Self::Symbol(c) => Some(c),
		}
	}
}

impl From<char> for Label {
	fn from(c: char) -> Self {
		Self::Symbol(c)
	}
}

impl TryFrom<&str> for Label {
	type Error = AutomatonError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		let mut chars = s.chars();
		match (chars.next(), chars.next()) {
			(None, _) => Ok(Self::Epsilon),
			(Some(c), None) => Ok(Self::Symbol(c)),
			_ => Err(AutomatonError::InvalidLabel(s.to_owned())),
		}
	}
}

impl TryFrom<String> for Label {
	type Error = AutomatonError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		Self::try_from(s.as_str())
	}
}

impl From<Label> for String {
	fn from(label: Label) -> Self {
		label.to_string()
	}
}

impl fmt::Display for Label {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Epsilon => Ok(()),
			Self::Symbol(c) => write!(f, "{}", c),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse() {
		assert_eq!(Ok(EPSILON), Label::try_from(""), "Empty string is not epsilon");
		assert_eq!(Ok(Label::Symbol('a')), Label::try_from("a"));
		assert_eq!(
			Err(AutomatonError::InvalidLabel("ab".into())),
			Label::try_from("ab"),
			"Multi-character label accepted"
		);
	}

	#[test]
	fn epsilon_sorts_first() {
		assert!(EPSILON < Label::from('a'));
		assert!(Label::from('a') < Label::from('b'));
		assert_eq!(None, EPSILON.symbol());
		assert_eq!("", EPSILON.to_string());
	}
}
