//! The closed action vocabulary.
//!
//! # Purpose
//! Policy rules carry exactly seven capability flags; this enum is the only
//! way to name one of them. Strings outside the set do not parse, so an
//! unknown action can never reach the evaluator.

/// One of the seven rule capabilities. The `*All` variants cover records
/// not owned by the caller; the evaluator itself is ownership-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    ReadAll,
    UpdateAll,
    DeleteAll,
}

impl Action {
    pub fn parse(name: &str) -> Option<Action> {
        match name {
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "read_all" => Some(Action::ReadAll),
            "update_all" => Some(Action::UpdateAll),
            "delete_all" => Some(Action::DeleteAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ReadAll => "read_all",
            Action::UpdateAll => "update_all",
            Action::DeleteAll => "delete_all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_action() {
        let all = [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::ReadAll,
            Action::UpdateAll,
            Action::DeleteAll,
        ];
        for action in all {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn unknown_names_do_not_parse() {
        assert_eq!(Action::parse("write"), None);
        assert_eq!(Action::parse("READ"), None);
        assert_eq!(Action::parse(""), None);
    }
}
