use std::fmt;

/// Workflow state of a work item as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    New,
    Active,
    Resolved,
    Closed,
    Unknown,
}

impl State {
    /// Map a tracker state name onto a known state. Matching is exact, anything
    /// unrecognised (including a missing state) becomes `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "New" => State::New,
            "Active" => State::Active,
            "Resolved" => State::Resolved,
            "Closed" => State::Closed,
            _ => State::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            State::New => "New",
            State::Active => "Active",
            State::Resolved => "Resolved",
            State::Closed => "Closed",
            State::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: u32,
    pub title: String,
    pub state: State,
    /// Id of the parent reached through the reverse hierarchy link, if any.
    pub parent_id: Option<u32>,
}
