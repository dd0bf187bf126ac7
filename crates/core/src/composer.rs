/// Emitted when the user submits a non-empty draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeEvent {
    pub text: String,
}

impl ComposeEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Trailing action offered next to the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Send,
    RecordVoice,
}

/// Draft state for the message input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    draft: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }

    pub fn affordance(&self) -> Affordance {
        if self.draft.trim().is_empty() {
            Affordance::RecordVoice
        } else {
            Affordance::Send
        }
    }

    /// Takes the trimmed draft as a submission and clears it.
    ///
    /// Whitespace-only drafts are left untouched and produce nothing.
    pub fn take_submission(&mut self) -> Option<ComposeEvent> {
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }

        let event = ComposeEvent::new(text);
        self.draft.clear();
        Some(event)
    }

    /// Hands a submission to `on_submit`, returning whether one was emitted.
    pub fn submit(&mut self, on_submit: impl FnOnce(ComposeEvent)) -> bool {
        match self.take_submission() {
            Some(event) => {
                on_submit(event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_emits_trimmed_text_and_clears() {
        let mut composer = Composer::new();
        composer.set_draft("  hello there \n");

        let mut emitted = Vec::new();
        assert!(composer.submit(|event| emitted.push(event)));

        assert_eq!(emitted, vec![ComposeEvent::new("hello there")]);
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn whitespace_draft_is_a_no_op() {
        let mut composer = Composer::new();
        composer.set_draft("   \t");

        let mut called = false;
        assert!(!composer.submit(|_| called = true));
        assert!(!called);
        assert_eq!(composer.draft(), "   \t");

        // Repeating the no-op leaves the same state behind.
        assert!(composer.take_submission().is_none());
        assert_eq!(composer.draft(), "   \t");
    }

    #[test]
    fn affordance_tracks_trimmed_draft() {
        let mut composer = Composer::new();
        assert_eq!(composer.affordance(), Affordance::RecordVoice);

        composer.set_draft("  ");
        assert_eq!(composer.affordance(), Affordance::RecordVoice);

        composer.set_draft("hi");
        assert_eq!(composer.affordance(), Affordance::Send);
    }
}
