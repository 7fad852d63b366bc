const DEFAULT_CLOSING_NAMES: [&str; 3] = ["done", "resolved", "close"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// Transition names that count as closing a ticket, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMatcher {
    names: Vec<String>,
}

impl Default for TransitionMatcher {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLOSING_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl TransitionMatcher {
    /// Parses a comma-separated list. Returns `None` when no name survives trimming.
    pub fn from_list(list: &str) -> Option<Self> {
        let names = list
            .split(',')
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matches(&self, transition_name: &str) -> bool {
        let candidate = transition_name.to_lowercase();
        self.names.iter().any(|name| *name == candidate)
    }

    /// First transition in tracker order whose name matches.
    pub fn select<'a>(&self, transitions: &'a [Transition]) -> Option<&'a Transition> {
        transitions
            .iter()
            .find(|transition| self.matches(&transition.name))
    }
}
