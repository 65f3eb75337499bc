//! Message sequences cycled through the dialog header.

use crate::constants::dialog::ELLIPSIS_FRAMES;
use crate::error::AppError;
use std::fmt;
use std::sync::Arc;

/// The header text as seen by a step function.
///
/// Reading gives the text currently rendered; writing replaces it once the
/// step returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSlot {
    text: String,
    changed: bool,
}

impl HeaderSlot {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            changed: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.changed = true;
    }

    /// The new text, if the step wrote one
    pub fn into_update(self) -> Option<String> {
        self.changed.then_some(self.text)
    }
}

/// Step function of a dynamic sequence.
pub type StepFn = Arc<dyn Fn(&mut HeaderSlot) + Send + Sync>;

/// What an animation job writes into the header on every tick.
#[derive(Clone)]
pub enum MessageSequence {
    /// Ordered frames. Each tick moves to the frame after the one currently
    /// shown, starting over at the first frame after the last one or when
    /// the header shows something that is not a frame.
    Fixed(Vec<String>),
    /// Caller-supplied step that updates the header itself.
    Dynamic(StepFn),
}

impl MessageSequence {
    pub fn fixed<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MessageSequence::Fixed(frames.into_iter().map(Into::into).collect())
    }

    /// `base` followed by a growing run of dots: `base..`, `base....`,
    /// `base......`
    pub fn ellipsis(base: &str) -> Self {
        MessageSequence::Fixed(
            ELLIPSIS_FRAMES
                .iter()
                .map(|dots| format!("{base}{dots}"))
                .collect(),
        )
    }

    pub fn dynamic<F>(step: F) -> Self
    where
        F: Fn(&mut HeaderSlot) + Send + Sync + 'static,
    {
        MessageSequence::Dynamic(Arc::new(step))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            MessageSequence::Fixed(frames) if frames.is_empty() => Err(
                AppError::invalid_argument("message sequence must contain at least one frame"),
            ),
            _ => Ok(()),
        }
    }

    /// Applies one tick to `slot`.
    pub fn step(&self, slot: &mut HeaderSlot) {
        match self {
            MessageSequence::Fixed(frames) => {
                if frames.is_empty() {
                    return;
                }
                let next = match frames.iter().position(|frame| frame == slot.text()) {
                    Some(current) if current + 1 < frames.len() => current + 1,
                    _ => 0,
                };
                slot.set_text(frames[next].clone());
            }
            MessageSequence::Dynamic(step) => step(slot),
        }
    }
}

impl fmt::Debug for MessageSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSequence::Fixed(frames) => f.debug_tuple("Fixed").field(frames).finish(),
            MessageSequence::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for MessageSequence {
    fn from(base: &str) -> Self {
        MessageSequence::ellipsis(base)
    }
}

impl From<Vec<String>> for MessageSequence {
    fn from(frames: Vec<String>) -> Self {
        MessageSequence::Fixed(frames)
    }
}

impl From<Vec<&str>> for MessageSequence {
    fn from(frames: Vec<&str>) -> Self {
        MessageSequence::fixed(frames)
    }
}
