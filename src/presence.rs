//! Roster of participants shown as online.

use crate::chat::DEFAULT_AVATAR;

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub avatar: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// Supplies who is currently online, in display order.
pub trait PresenceSource {
    fn participants(&self) -> Vec<Participant>;
}

/// Fixed roster; nobody ever comes or goes.
#[derive(Debug, Clone)]
pub struct StaticRoster {
    participants: Vec<Participant>,
}

impl StaticRoster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }
}

impl Default for StaticRoster {
    fn default() -> Self {
        Self::new(
            ["John Doe", "Jane Smith", "Bob Johnson"]
                .into_iter()
                .map(|name| Participant::new(name, DEFAULT_AVATAR))
                .collect(),
        )
    }
}

impl PresenceSource for StaticRoster {
    fn participants(&self) -> Vec<Participant> {
        self.participants.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_order() {
        let names: Vec<String> = StaticRoster::default()
            .participants()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["John Doe", "Jane Smith", "Bob Johnson"]);
    }

    #[test]
    fn test_custom_roster_is_returned_as_given() {
        let roster = StaticRoster::new(vec![Participant::new("Zed", "/z.png"), Participant::new("Amy", "/a.png")]);
        let names: Vec<String> = roster.participants().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }
}
