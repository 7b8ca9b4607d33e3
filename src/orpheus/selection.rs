use crate::error::{OrpheusError, Result};
use crate::format::CandidateTable;
use crate::picker::Picker;
use tracing::debug;

/// Inputs that abort the selection instead of choosing.
pub const QUIT_ALIASES: [&str; 5] = ["e", "q", "x", "exit", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Zero-based index into the candidate list.
    Selected(usize),
    /// The user asked to quit.
    Aborted,
}

/// Interprets a raw 1-based selection against `count` candidates.
pub fn validate_selection(raw: &str, count: usize) -> Result<SelectionOutcome> {
    let lower = raw.to_lowercase();
    if QUIT_ALIASES.contains(&lower.as_str()) {
        return Ok(SelectionOutcome::Aborted);
    }

    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrpheusError::InvalidInput("Input a number".into()));
    }

    match raw.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Ok(SelectionOutcome::Selected(n - 1)),
        _ => Err(OrpheusError::InvalidInput("Invalid selection".into())),
    }
}

/// Runs the interactive picker when one was detected, otherwise (or when it
/// yields nothing) the fallback prompt, then validates the answer.
pub struct Selector {
    interactive: Option<Box<dyn Picker>>,
    fallback: Box<dyn Picker>,
}

impl Selector {
    pub fn new(interactive: Option<Box<dyn Picker>>, fallback: Box<dyn Picker>) -> Self {
        Self {
            interactive,
            fallback,
        }
    }

    pub fn prompt_only(fallback: Box<dyn Picker>) -> Self {
        Self::new(None, fallback)
    }

    pub fn has_interactive(&self) -> bool {
        self.interactive.is_some()
    }

    pub fn select(&mut self, table: &CandidateTable) -> Result<SelectionOutcome> {
        let mut raw = match self.interactive.as_mut() {
            Some(picker) => picker.pick(table)?,
            None => None,
        };

        if raw.as_deref().map_or(true, str::is_empty) {
            if self.interactive.is_some() {
                debug!("interactive picker gave no selection, using prompt");
            }
            raw = self.fallback.pick(table)?;
        }

        validate_selection(raw.as_deref().unwrap_or_default().trim(), table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_candidates;
    use crate::model::{MediaType, SearchResult};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn numbers_map_to_zero_based_indexes() {
        for count in 1..=5 {
            for n in 1..=count {
                assert_eq!(
                    validate_selection(&n.to_string(), count).unwrap(),
                    SelectionOutcome::Selected(n - 1)
                );
            }
        }
    }

    #[test]
    fn out_of_range_is_invalid_selection() {
        for raw in ["0", "4", "99999999999999999999999"] {
            let err = validate_selection(raw, 3).unwrap_err();
            assert_eq!(err.to_string(), "Invalid selection");
        }
    }

    #[test]
    fn non_numeric_asks_for_a_number() {
        for raw in ["", "abc", "-1", "1.5", "2x"] {
            let err = validate_selection(raw, 3).unwrap_err();
            assert_eq!(err.to_string(), "Input a number", "input {:?}", raw);
        }
    }

    #[test]
    fn quit_aliases_abort_case_insensitively() {
        for raw in ["e", "Q", "x", "EXIT", "Quit"] {
            assert_eq!(
                validate_selection(raw, 3).unwrap(),
                SelectionOutcome::Aborted
            );
        }
    }

    struct Fixed {
        answer: Option<String>,
        calls: Rc<Cell<usize>>,
    }

    impl Picker for Fixed {
        fn pick(&mut self, _table: &CandidateTable) -> Result<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answer.clone())
        }
    }

    fn fixed(answer: Option<&str>) -> (Box<dyn Picker>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let picker = Fixed {
            answer: answer.map(str::to_string),
            calls: calls.clone(),
        };
        (Box::new(picker), calls)
    }

    fn table() -> CandidateTable {
        let items = vec![SearchResult::new("1", "a"), SearchResult::new("2", "b")];
        format_candidates(&items, MediaType::Track)
    }

    #[test]
    fn interactive_answer_skips_the_prompt() {
        let (interactive, _) = fixed(Some("2"));
        let (fallback, fallback_calls) = fixed(Some("1"));
        let mut selector = Selector::new(Some(interactive), fallback);

        assert_eq!(
            selector.select(&table()).unwrap(),
            SelectionOutcome::Selected(1)
        );
        assert_eq!(fallback_calls.get(), 0);
    }

    #[test]
    fn failed_interactive_falls_back_to_prompt() {
        let (interactive, interactive_calls) = fixed(None);
        let (fallback, fallback_calls) = fixed(Some(" 1 "));
        let mut selector = Selector::new(Some(interactive), fallback);

        assert_eq!(
            selector.select(&table()).unwrap(),
            SelectionOutcome::Selected(0)
        );
        assert_eq!(interactive_calls.get(), 1);
        assert_eq!(fallback_calls.get(), 1);
    }

    #[test]
    fn prompt_only_selector_validates_answer() {
        let (fallback, _) = fixed(Some("3"));
        let mut selector = Selector::prompt_only(fallback);
        assert!(!selector.has_interactive());
        assert!(matches!(
            selector.select(&table()),
            Err(OrpheusError::InvalidInput(_))
        ));
    }

    #[test]
    fn quit_from_prompt_is_an_abort() {
        let (fallback, _) = fixed(Some("quit"));
        let mut selector = Selector::prompt_only(fallback);
        assert_eq!(
            selector.select(&table()).unwrap(),
            SelectionOutcome::Aborted
        );
    }
}
