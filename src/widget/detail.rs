//! Payloads carried by semantic widget events.

use std::fmt;

/// Tri-state checked value used by checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckedState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckedState {
    /// Value for `aria-checked`.
    pub fn aria_value(self) -> &'static str {
        match self {
            Self::Unchecked => "false",
            Self::Checked => "true",
            Self::Indeterminate => "mixed",
        }
    }

    /// Value for `data-state`.
    pub fn data_state(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Checked => "checked",
            Self::Indeterminate => "indeterminate",
        }
    }

    /// State after a user toggle. Indeterminate always resolves to checked.
    pub fn toggled(self) -> Self {
        match self {
            Self::Checked => Self::Unchecked,
            Self::Unchecked | Self::Indeterminate => Self::Checked,
        }
    }

    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }
}

impl From<bool> for CheckedState {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

impl fmt::Display for CheckedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_state())
    }
}

/// Detail of a semantic event emitted by a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// `valueChange`, `itemOpen`, `itemClose`, `select`.
    Value(String),
    /// `valueChange` of a multi-value widget.
    Values(Vec<String>),
    /// `openChange`.
    Open(bool),
    /// `checkedChange`.
    Checked(CheckedState),
}

impl Detail {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_values(&self) -> Option<&[String]> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_open(&self) -> Option<bool> {
        match self {
            Self::Open(open) => Some(*open),
            _ => None,
        }
    }

    pub fn as_checked(&self) -> Option<CheckedState> {
        match self {
            Self::Checked(state) => Some(*state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_never_returns_to_indeterminate() {
        assert_eq!(CheckedState::Indeterminate.toggled(), CheckedState::Checked);
        assert_eq!(CheckedState::Checked.toggled(), CheckedState::Unchecked);
        assert_eq!(CheckedState::Unchecked.toggled(), CheckedState::Checked);
    }

    #[test]
    fn attribute_spellings() {
        assert_eq!(CheckedState::Indeterminate.aria_value(), "mixed");
        assert_eq!(CheckedState::from(true).data_state(), "checked");
        assert_eq!(CheckedState::from(false).to_string(), "unchecked");
    }

    #[test]
    fn detail_accessors() {
        assert_eq!(Detail::Value("a".into()).as_value(), Some("a"));
        assert_eq!(Detail::Open(true).as_open(), Some(true));
        assert_eq!(Detail::Open(true).as_value(), None);
        assert_eq!(
            Detail::Values(vec!["x".into()]).as_values(),
            Some(&["x".to_owned()][..])
        );
    }
}
