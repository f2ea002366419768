/// Key name hosts report for the Return/Enter key.
pub const ENTER: &str = "Enter";

/// The last two key names pressed, oldest first.
///
/// Two named slots rather than a growable list: recording a key shifts
/// `current` into `previous` and drops whatever `previous` held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyHistory {
    previous: Option<String>,
    current: Option<String>,
}

impl KeyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one key-down event. Call exactly once per event, in order.
    pub fn record(&mut self, key: impl Into<String>) {
        self.previous = self.current.take();
        self.current = Some(key.into());
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Both remembered keys are Enter: the user wants to leave the list.
    pub fn is_double_enter(&self) -> bool {
        self.previous() == Some(ENTER) && self.current() == Some(ENTER)
    }

    pub fn clear(&mut self) {
        self.previous = None;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = KeyHistory::new();
        assert_eq!(history.previous(), None);
        assert_eq!(history.current(), None);
        assert!(!history.is_double_enter());
    }

    #[test]
    fn keeps_only_the_last_two_keys() {
        let mut history = KeyHistory::new();
        history.record("a");
        history.record("b");
        history.record("c");
        assert_eq!(history.previous(), Some("b"));
        assert_eq!(history.current(), Some("c"));
    }

    #[test]
    fn single_enter_is_not_double() {
        let mut history = KeyHistory::new();
        history.record("m");
        history.record(ENTER);
        assert!(!history.is_double_enter());
    }

    #[test]
    fn two_enters_in_a_row() {
        let mut history = KeyHistory::new();
        history.record(ENTER);
        history.record(ENTER);
        assert!(history.is_double_enter());

        history.record("x");
        assert!(!history.is_double_enter());
    }

    #[test]
    fn enter_separated_by_another_key_is_not_double() {
        let mut history = KeyHistory::new();
        history.record(ENTER);
        history.record("Shift");
        history.record(ENTER);
        assert!(!history.is_double_enter());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut history = KeyHistory::new();
        history.record(ENTER);
        history.record(ENTER);
        history.clear();
        assert_eq!(history, KeyHistory::default());
    }
}
