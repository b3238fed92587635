//! Screen descriptors and the fixed screen table.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Analytics names of the default screens, in display order.
pub const DEFAULT_SCREEN_NAMES: [&str; 3] = ["welcome", "service_providers", "management_tools"];

/// Name reported for an index outside the table.
pub const UNKNOWN_SCREEN: &str = "unknown";

/// Primary button label on every screen but the last.
pub const NEXT_LABEL: &str = "Next";

/// Primary button label on the last screen.
pub const GET_STARTED_LABEL: &str = "Get Started";

/// One step of the onboarding sequence. Immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDescriptor {
    pub index: usize,
    /// Identifier used in analytics payloads.
    pub name: String,
    /// The logo is only shown on the first screen.
    pub is_first: bool,
    /// The primary button reads "Get Started" on the last screen.
    pub is_last: bool,
}

impl ScreenDescriptor {
    /// Label the primary button should carry while this screen is active.
    pub fn button_label(&self) -> &'static str {
        if self.is_last {
            GET_STARTED_LABEL
        } else {
            NEXT_LABEL
        }
    }

    pub fn logo_visible(&self) -> bool {
        self.is_first
    }
}

/// Ordered, non-empty list of screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenTable {
    screens: Vec<ScreenDescriptor>,
}

impl ScreenTable {
    /// Build a table from screen names. Fails on an empty list.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptyScreenTable);
        }

        let last = names.len() - 1;
        let screens = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ScreenDescriptor {
                index,
                name,
                is_first: index == 0,
                is_last: index == last,
            })
            .collect();

        Ok(Self { screens })
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScreenDescriptor> {
        self.screens.get(index)
    }

    /// Analytics name for `index`, or `"unknown"` when out of range.
    pub fn name(&self, index: usize) -> &str {
        self.get(index)
            .map(|s| s.name.as_str())
            .unwrap_or(UNKNOWN_SCREEN)
    }

    pub fn last_index(&self) -> usize {
        self.screens.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenDescriptor> {
        self.screens.iter()
    }
}

impl Default for ScreenTable {
    fn default() -> Self {
        let screens = DEFAULT_SCREEN_NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| ScreenDescriptor {
                index,
                name: (*name).to_string(),
                is_first: index == 0,
                is_last: index == DEFAULT_SCREEN_NAMES.len() - 1,
            })
            .collect();
        Self { screens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_three_named_screens() {
        let table = ScreenTable::default();
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(0), "welcome");
        assert_eq!(table.name(1), "service_providers");
        assert_eq!(table.name(2), "management_tools");
        assert_eq!(table.last_index(), 2);
    }

    #[test]
    fn out_of_range_name_is_unknown() {
        let table = ScreenTable::default();
        assert_eq!(table.name(3), UNKNOWN_SCREEN);
        assert_eq!(table.name(usize::MAX), UNKNOWN_SCREEN);
        assert!(table.get(3).is_none());
    }

    #[test]
    fn first_and_last_flags() {
        let table = ScreenTable::default();
        let flags: Vec<(bool, bool)> = table.iter().map(|s| (s.is_first, s.is_last)).collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    }

    #[test]
    fn labels_and_logo_follow_position() {
        let table = ScreenTable::default();
        assert_eq!(table.get(0).unwrap().button_label(), NEXT_LABEL);
        assert_eq!(table.get(1).unwrap().button_label(), NEXT_LABEL);
        assert_eq!(table.get(2).unwrap().button_label(), GET_STARTED_LABEL);

        assert!(table.get(0).unwrap().logo_visible());
        assert!(!table.get(1).unwrap().logo_visible());
        assert!(!table.get(2).unwrap().logo_visible());
    }

    #[test]
    fn new_matches_default_for_default_names() {
        let table = ScreenTable::new(DEFAULT_SCREEN_NAMES).unwrap();
        assert_eq!(table, ScreenTable::default());
    }

    #[test]
    fn single_screen_is_first_and_last() {
        let table = ScreenTable::new(["only"]).unwrap();
        let screen = table.get(0).unwrap();
        assert!(screen.is_first);
        assert!(screen.is_last);
        assert_eq!(screen.button_label(), GET_STARTED_LABEL);
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = ScreenTable::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyScreenTable));
    }
}
