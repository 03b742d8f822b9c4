//! Interaction model of the upload form and the before/after comparator.
//!
//! The browser page served by [`crate::server`] implements the same rules in
//! script; this module is the reference state machine:
//!
//! ```text
//! Idle -> Validating -> AwaitingModel -> Resolved
//!   \          \               \-------> Failed
//!    \          \------------------------> Failed (local)
//!     \----------------------------------> Failed (no file)
//! ```

use crate::gateway::{TransformFailure, TransformResult, TransformSuccess};
use crate::renovation::{
    validate, InteriorStyle, TransformOptions, UploadCandidate, WallColor, CHOOSE_IMAGE_HINT,
};

/// Comparator position shown for a fresh pair of images.
pub const DEFAULT_REVEAL_PERCENT: f64 = 50.0;

/// How much of the generated image is revealed over the original.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparator {
    reveal_percent: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            reveal_percent: DEFAULT_REVEAL_PERCENT,
        }
    }
}

impl Comparator {
    /// Current split position in `[0, 100]`.
    pub fn reveal_percent(&self) -> f64 {
        self.reveal_percent
    }

    /// Sets the position directly (range input, keyboard); clamped.
    pub fn set(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.reveal_percent = percent.clamp(0.0, 100.0);
    }

    /// Moves the split to a pointer position inside a container.
    ///
    /// Positions outside the container clamp to the nearest edge. A
    /// zero-width container (not laid out yet) leaves the value unchanged.
    pub fn drag_to(&mut self, pointer_x: f64, container_left: f64, container_width: f64) {
        if container_width <= 0.0 || !container_width.is_finite() {
            return;
        }
        self.set((pointer_x - container_left) / container_width * 100.0);
    }

    /// Back to the default position.
    pub fn reset(&mut self) {
        self.reveal_percent = DEFAULT_REVEAL_PERCENT;
    }

    /// Opacity of the generated image when blending instead of splitting.
    pub fn overlay_opacity(&self) -> f64 {
        self.reveal_percent / 100.0
    }
}

/// Where the current submission stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing submitted yet, or a new file was chosen.
    Idle,
    /// Local checks are running.
    Validating,
    /// The request is in flight; submit is disabled.
    AwaitingModel,
    /// The last submission produced an image.
    Resolved,
    /// The last submission failed with this reason.
    Failed(String),
}

/// A submission handed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The file to transform.
    pub upload: UploadCandidate,
    /// Options captured at submit time.
    pub options: TransformOptions,
    /// File selection this submission belongs to; pass it back to [`FormView::resolve`].
    pub ticket: u64,
}

/// State of one form instance.
#[derive(Debug, Clone)]
pub struct FormView {
    file: Option<UploadCandidate>,
    style: InteriorStyle,
    wall_color: WallColor,
    default_wall_color: WallColor,
    phase: Phase,
    selection: u64,
    result: Option<TransformSuccess>,
    error: Option<String>,
    comparator: Comparator,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new(WallColor::NoChange)
    }
}

impl FormView {
    /// A blank form preselecting `default_wall_color`.
    pub fn new(default_wall_color: WallColor) -> Self {
        Self {
            file: None,
            style: InteriorStyle::default(),
            wall_color: default_wall_color.clone(),
            default_wall_color,
            phase: Phase::Idle,
            selection: 0,
            result: None,
            error: None,
            comparator: Comparator::default(),
        }
    }

    /// Chooses a new source photo, discarding any previous result and error.
    ///
    /// An answer still in flight for the previous photo is dropped when it
    /// arrives.
    pub fn select_file(&mut self, file: Option<UploadCandidate>) {
        self.file = file;
        self.selection += 1;
        self.result = None;
        self.error = None;
        if self.phase != Phase::AwaitingModel {
            self.phase = Phase::Idle;
        }
    }

    /// Chooses the décor style for the next submission.
    pub fn select_style(&mut self, style: InteriorStyle) {
        self.style = style;
    }

    /// Chooses the wall colour for the next submission.
    pub fn select_wall_color(&mut self, color: WallColor) {
        self.wall_color = color;
    }

    /// Starts a submission.
    ///
    /// Returns `None` while another request is in flight, when no file is
    /// selected, or when the local check fails; the last two move to
    /// [`Phase::Failed`]. The local check is advisory; the gateway
    /// validates again.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.is_submit_enabled() {
            return None;
        }

        let Some(file) = self.file.clone() else {
            self.fail(CHOOSE_IMAGE_HINT.to_string());
            return None;
        };

        self.phase = Phase::Validating;
        self.error = None;
        if let Err(e) = validate(Some(&file)) {
            self.fail(e.to_string());
            return None;
        }

        self.phase = Phase::AwaitingModel;
        Some(Submission {
            upload: file,
            options: TransformOptions::new(self.style, self.wall_color.clone()),
            ticket: self.selection,
        })
    }

    /// Applies the gateway's answer to the in-flight submission.
    ///
    /// Ignored unless a request is awaited. An answer whose `ticket` predates
    /// the current file selection is discarded, since it shows another room.
    /// A failure keeps the image of an earlier submission on screen.
    pub fn resolve(&mut self, ticket: u64, outcome: TransformResult) {
        if self.phase != Phase::AwaitingModel {
            return;
        }
        if ticket != self.selection {
            tracing::debug!(ticket, selection = self.selection, "dropping stale answer");
            self.phase = Phase::Idle;
            return;
        }
        match outcome {
            TransformResult::Success(success) => {
                self.result = Some(success);
                self.error = None;
                self.comparator.reset();
                self.phase = Phase::Resolved;
            }
            TransformResult::Failure(TransformFailure { reason, .. }) => self.fail(reason),
        }
    }

    /// Clears everything back to a blank form. No-op while awaiting the model.
    pub fn reset(&mut self) {
        if self.phase == Phase::AwaitingModel {
            return;
        }
        let selection = self.selection + 1;
        *self = Self::new(self.default_wall_color.clone());
        self.selection = selection;
    }

    /// Submit is disabled while a request is in flight.
    pub fn is_submit_enabled(&self) -> bool {
        self.phase != Phase::AwaitingModel
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Currently selected file.
    pub fn file(&self) -> Option<&UploadCandidate> {
        self.file.as_ref()
    }

    /// Currently selected style.
    pub fn style(&self) -> InteriorStyle {
        self.style
    }

    /// Currently selected wall colour.
    pub fn wall_color(&self) -> &WallColor {
        &self.wall_color
    }

    /// Last successful result still on display.
    pub fn result(&self) -> Option<&TransformSuccess> {
        self.result.as_ref()
    }

    /// Error text on display.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Comparator state.
    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Comparator state, for pointer and range-input updates.
    pub fn comparator_mut(&mut self) -> &mut Comparator {
        &mut self.comparator
    }

    fn fail(&mut self, reason: String) {
        self.error = Some(reason.clone());
        self.phase = Phase::Failed(reason);
    }
}
