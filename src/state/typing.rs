//! Typing Sequencer - Type, hold, delete, next phrase. Forever.
//!
//! [`TypingSequencer`] is a plain state machine: every [`step`] performs one
//! character-level transition on its sink and reports how long to wait before
//! the next one. It owns no timer, so tests can step it directly.
//!
//! [`TypingLoop`] drives a sequencer on a [`Timeline`] by rescheduling itself
//! after each step. Step N+1 is only scheduled once step N has returned, so two
//! mutations of the sink can never interleave.
//!
//! # States
//!
//! ```text
//! Typing --(count == len)--> PausedAtFull --(pause)--> Deleting
//!    ^                                                     |
//!    +------------- Advancing (index + 1) <--(count == 0)--+
//! ```
//!
//! Lengths are grapheme clusters, so "café" types as four characters and a
//! prefix never ends halfway through a code point.
//!
//! [`step`]: TypingSequencer::step

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TypingConfig;
use crate::error::Result;
use crate::scheduler::{TimerId, Timeline};
use crate::surface::{RenderTarget, Surface};
use crate::types::{ElementId, Millis};

// =============================================================================
// TYPES
// =============================================================================

/// Outcome of one [`TypingSequencer::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One more character written.
    Typed { delay: Millis },
    /// Phrase complete; text untouched, holding before deletion.
    Held { delay: Millis },
    /// One character removed.
    Deleted { delay: Millis },
    /// Phrase fully deleted, moved on to the next one. Continue immediately.
    Advanced,
    /// Stopped, or the sink went away. No further steps.
    Stopped,
}

impl Step {
    /// Delay before the next step, or `None` if there is no next step.
    pub fn delay(&self) -> Option<Millis> {
        match *self {
            Self::Typed { delay } | Self::Held { delay } | Self::Deleted { delay } => Some(delay),
            Self::Advanced => Some(0),
            Self::Stopped => None,
        }
    }
}

/// Which transition the next step will take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    PausedAtFull,
    Deleting,
    Advancing,
}

// =============================================================================
// SEQUENCER
// =============================================================================

pub struct TypingSequencer {
    phrases: Vec<String>,
    /// Grapheme count per phrase.
    lengths: Vec<usize>,
    index: usize,
    count: usize,
    deleting: bool,
    holding: bool,
    stopped: bool,
    type_delay_ms: Millis,
    delete_delay_ms: Millis,
    pause_ms: Millis,
    sink: Rc<dyn RenderTarget>,
}

impl TypingSequencer {
    /// Build a sequencer writing into `sink`. Fails only on an empty phrase list.
    pub fn new(config: &TypingConfig, sink: Rc<dyn RenderTarget>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            lengths: config.phrases.iter().map(|p| p.graphemes(true).count()).collect(),
            phrases: config.phrases.clone(),
            index: 0,
            count: 0,
            deleting: false,
            holding: false,
            stopped: false,
            type_delay_ms: config.type_delay_ms,
            delete_delay_ms: config.delete_delay_ms,
            pause_ms: config.pause_ms,
            sink,
        })
    }

    /// Perform exactly one transition.
    pub fn step(&mut self) -> Step {
        if self.stopped {
            return Step::Stopped;
        }
        if !self.sink.is_attached() {
            debug!(sink = %self.sink.id(), "typing sink detached, stopping");
            self.stopped = true;
            return Step::Stopped;
        }

        let len = self.lengths[self.index];

        if self.holding {
            self.holding = false;
            self.deleting = true;
        }

        if !self.deleting {
            if self.count < len {
                self.count += 1;
                self.write();
                return Step::Typed {
                    delay: self.type_delay_ms,
                };
            }
            // Zero-length phrases land here on their first step
            self.holding = true;
            return Step::Held {
                delay: self.pause_ms,
            };
        }

        if self.count > 0 {
            self.count -= 1;
            self.write();
            return Step::Deleted {
                delay: self.delete_delay_ms,
            };
        }

        self.deleting = false;
        self.index = (self.index + 1) % self.phrases.len();
        debug!(index = self.index, "next phrase");
        Step::Advanced
    }

    fn write(&self) {
        self.sink.set_text(self.current_text());
    }

    /// Prevent any further step from running.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn phrase_index(&self) -> usize {
        self.index
    }

    pub fn char_count(&self) -> usize {
        self.count
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.index]
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// The visible prefix of the current phrase.
    pub fn current_text(&self) -> &str {
        grapheme_prefix(self.current_phrase(), self.count)
    }

    /// The transition the next [`step`](Self::step) will take.
    pub fn phase(&self) -> TypingPhase {
        // The step after the hold already counts as deleting
        if self.holding || self.deleting {
            if self.count == 0 {
                TypingPhase::Advancing
            } else {
                TypingPhase::Deleting
            }
        } else if self.count == self.lengths[self.index] {
            TypingPhase::PausedAtFull
        } else {
            TypingPhase::Typing
        }
    }
}

/// First `count` grapheme clusters of `text`.
fn grapheme_prefix(text: &str, count: usize) -> &str {
    match text.grapheme_indices(true).nth(count) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

// =============================================================================
// LOOP
// =============================================================================

/// A sequencer stepping itself on a timeline until stopped.
pub struct TypingLoop {
    sequencer: Rc<RefCell<TypingSequencer>>,
    timeline: Timeline,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl TypingLoop {
    /// Start stepping `sequencer`. The first step runs on the next
    /// timeline flush.
    pub fn start(sequencer: TypingSequencer, timeline: &Timeline) -> Self {
        let handle = Self {
            sequencer: Rc::new(RefCell::new(sequencer)),
            timeline: timeline.clone(),
            pending: Rc::new(Cell::new(None)),
        };
        schedule_step(
            handle.sequencer.clone(),
            handle.timeline.clone(),
            handle.pending.clone(),
            0,
        );
        handle
    }

    /// Resolve `sink` on `surface` and start typing into it.
    ///
    /// Returns `Ok(None)` without scheduling anything when the sink is missing
    /// or detached.
    pub fn start_on(
        surface: &dyn Surface,
        sink: &ElementId,
        config: &TypingConfig,
        timeline: &Timeline,
    ) -> Result<Option<Self>> {
        let Some(target) = surface.attached_target(sink) else {
            debug!(sink = %sink, "typing sink missing, not starting");
            return Ok(None);
        };
        let sequencer = TypingSequencer::new(config, target)?;
        info!(sink = %sink, phrases = sequencer.phrase_count(), "typing started");
        Ok(Some(Self::start(sequencer, timeline)))
    }

    /// Stop the loop. The pending step is cancelled and no step runs again.
    pub fn stop(&self) {
        self.sequencer.borrow_mut().stop();
        if let Some(id) = self.pending.take() {
            self.timeline.cancel(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn sequencer(&self) -> Ref<'_, TypingSequencer> {
        self.sequencer.borrow()
    }
}

fn schedule_step(
    sequencer: Rc<RefCell<TypingSequencer>>,
    timeline: Timeline,
    pending: Rc<Cell<Option<TimerId>>>,
    delay: Millis,
) {
    let next_timeline = timeline.clone();
    let next_pending = pending.clone();
    let id = timeline.schedule(delay, move || {
        next_pending.set(None);
        let step = sequencer.borrow_mut().step();
        if let Some(delay) = step.delay() {
            schedule_step(sequencer, next_timeline, next_pending, delay);
        }
    });
    pending.set(Some(id));
}

// =============================================================================
// TESTS
// =============================================================================
