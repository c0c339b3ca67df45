use crate::completion::{AutocompleteIndex, CompletionCandidate, CompletionEngine};
use crate::edit_state::{EditState, char_count, char_to_byte_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Suggesting,
    Navigating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    TextChanged { content: String, cursor: usize },
    CursorMoved { content: String, cursor: usize },
    ArrowDown,
    ArrowUp,
    Tab,
    Enter,
    Escape,
    Blur,
}

/// Replace chars `[start, end)` with `text` and put the cursor at `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub cursor: usize,
}

impl Splice {
    pub fn apply(&self, content: &str) -> String {
        let start = char_to_byte_index(content, self.start);
        let end = char_to_byte_index(content, self.end);
        let mut out = String::with_capacity(content.len() + self.text.len());
        out.push_str(&content[..start]);
        out.push_str(&self.text);
        out.push_str(&content[end..]);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The machine used the event; the editor must not act on it.
    Handled,
    /// Not meant for the suggestion box; the editor handles it as usual.
    PassThrough,
    Apply(Splice),
}

/// Suggestion box state for one editing session.
///
/// Never blocks and never fails: anything inconsistent drops back to
/// [`Phase::Idle`] so plain typing is never interrupted.
#[derive(Debug, Default)]
pub struct Autocomplete {
    engine: CompletionEngine,
    phase: Phase,
    edit: Option<EditState>,
    candidates: Vec<CompletionCandidate>,
    highlighted: Option<usize>,
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn candidates(&self) -> &[CompletionCandidate] {
        &self.candidates
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn handle(&mut self, event: EditorEvent, index: &AutocompleteIndex) -> Outcome {
        match event {
            EditorEvent::TextChanged { content, cursor }
            | EditorEvent::CursorMoved { content, cursor } => {
                self.recompute(&content, cursor, index);
                Outcome::Handled
            }
            EditorEvent::ArrowDown => self.step(1),
            EditorEvent::ArrowUp => self.step(-1),
            EditorEvent::Tab | EditorEvent::Enter => self.accept(),
            EditorEvent::Escape | EditorEvent::Blur => {
                let was_visible = self.is_visible();
                self.reset();
                if was_visible {
                    Outcome::Handled
                } else {
                    Outcome::PassThrough
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.edit = None;
        self.candidates.clear();
        self.highlighted = None;
    }

    fn recompute(&mut self, content: &str, cursor: usize, index: &AutocompleteIndex) {
        let Some(edit) = EditState::analyze(content, cursor) else {
            self.reset();
            return;
        };
        if !self.engine.should_suggest(&edit) {
            self.reset();
            return;
        }

        let candidates = self.engine.candidates(index, &edit);
        if candidates.is_empty() {
            self.reset();
            return;
        }

        self.phase = Phase::Suggesting;
        self.candidates = candidates;
        self.highlighted = None;
        self.edit = Some(edit);
    }

    fn step(&mut self, delta: isize) -> Outcome {
        if self.phase == Phase::Idle {
            return Outcome::PassThrough;
        }
        let len = self.candidates.len();
        if len == 0 {
            self.reset();
            return Outcome::PassThrough;
        }

        let next = match (self.highlighted, delta > 0) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.highlighted = Some(next);
        self.phase = Phase::Navigating;
        Outcome::Handled
    }

    fn accept(&mut self) -> Outcome {
        let chosen = match self.phase {
            Phase::Idle => return Outcome::PassThrough,
            Phase::Suggesting => self.highlighted.unwrap_or(0),
            Phase::Navigating => match self.highlighted {
                Some(i) => i,
                None => {
                    self.reset();
                    return Outcome::PassThrough;
                }
            },
        };

        let splice = match (self.edit.as_ref(), self.candidates.get(chosen)) {
            (Some(edit), Some(candidate)) => {
                let (start, end) = edit.token_span();
                Some(Splice {
                    start,
                    end,
                    text: candidate.text.clone(),
                    cursor: start + char_count(&candidate.text),
                })
            }
            _ => None,
        };
        self.reset();
        splice.map_or(Outcome::PassThrough, Outcome::Apply)
    }
}
