//! Puzzle wrapper that adds animation, move history, and scramble/replay
//! functionality.
//!
//! One controller owns one puzzle session. All animation is cooperative and
//! frame-driven: the host calls [`PuzzleController::advance`] once per
//! display refresh and the controller steps the front of its FIFO move queue,
//! pushing derived transforms into the render sink. Per-frame poses are
//! always recomputed from the state before the animating move, never
//! compounded frame over frame.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::time::Duration;

use super::common::*;
use super::interpolate;
use super::scramble;
use crate::preferences::InteractionPreferences;
use crate::render::RenderSink;

/// If at least this much of a move is animated in one frame, just skip the
/// animation to reduce unnecessary flashing.
const MIN_TWIST_DELTA: f32 = 1.0 / 3.0;

/// Higher number means faster exponential increase in animation speed.
const EXP_TWIST_FACTOR: f32 = 0.5;

/// Quarter-turn duration the base durations are calibrated against.
const REFERENCE_TWIST_DURATION: f32 = 0.3;

const MOVE_INTERPOLATION_FN: interpolate::InterpolateFn = interpolate::QUADRATIC;

/// Whether the puzzle has been scrambled.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ScrambleState {
    /// Unscrambled.
    #[default]
    None,
    /// Some small number of scramble moves.
    Partial,
    /// Fully scrambled.
    Full,
    /// Was solved by the user even if not currently solved.
    Solved,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct QueuedMove {
    mv: Move,
    /// Part of an inverse replay?
    replay: bool,
}

#[derive(Debug, Clone)]
struct ActiveMove {
    pieces: Vec<PieceId>,
    geometry: super::geometry::MoveGeometry,
}

/// Session controller for one puzzle instance.
///
/// State machine per session: Idle → Animating → Idle, with a FIFO queue
/// absorbing moves requested while animating. Queued moves are never dropped,
/// reordered, or merged; a queued move always eventually runs. Switching
/// puzzles discards the whole session, which is the only way to abandon
/// queued moves.
#[derive(Debug, Clone)]
pub struct PuzzleController {
    /// State of the puzzle right before the move being animated right now.
    displayed: Puzzle,
    /// State of the puzzle with all queued moves applied (used for validity
    /// checks, history, and scrambling).
    latest: Puzzle,
    /// Queue of moves that transform the displayed state into the latest
    /// state.
    queue: VecDeque<QueuedMove>,
    /// Maximum number of moves in the queue (reset when the queue empties).
    queue_max: usize,
    /// Progress of the animation in the current move, from 0.0 to 1.0.
    progress: f32,
    /// Selection and rotation of the move being animated, computed once at
    /// animation start.
    active: Option<ActiveMove>,

    /// Executed moves, in order. Cleared on scramble and drained by replay.
    history: Vec<Move>,
    /// Whether an inverse replay is in flight.
    replaying: bool,
    /// Moves still to settle before the replay completes.
    replay_remaining: usize,
    /// Length of the history the running replay is undoing.
    replay_total: usize,
    /// Completion note from the last finished replay.
    finished_replay: Option<usize>,

    scramble_state: ScrambleState,
    prefs: InteractionPreferences,
}
impl Default for PuzzleController {
    fn default() -> Self {
        Self::new(PuzzleTypeEnum::default())
    }
}
impl PuzzleController {
    /// Constructs a controller with a solved puzzle.
    pub fn new(ty: PuzzleTypeEnum) -> Self {
        Self::with_preferences(ty, InteractionPreferences::default())
    }
    /// Constructs a controller with a solved puzzle and explicit preferences.
    pub fn with_preferences(ty: PuzzleTypeEnum, prefs: InteractionPreferences) -> Self {
        Self {
            displayed: Puzzle::new(ty),
            latest: Puzzle::new(ty),
            queue: VecDeque::new(),
            queue_max: 0,
            progress: 0.0,
            active: None,

            history: vec![],
            replaying: false,
            replay_remaining: 0,
            replay_total: 0,
            finished_replay: None,

            scramble_state: ScrambleState::None,
            prefs,
        }
    }

    /// Discards this session and starts a fresh one for `ty`, detaching and
    /// re-attaching the render sink's pieces.
    pub fn switch_puzzle(&mut self, ty: PuzzleTypeEnum, sink: &mut dyn RenderSink) {
        log::info!("switching puzzle to {ty}");
        sink.detach_all();
        *self = Self::with_preferences(ty, self.prefs);
        self.attach_all(sink);
    }

    /// Registers every piece of the current puzzle with the render sink.
    pub fn attach_all(&self, sink: &mut dyn RenderSink) {
        for i in 0..self.displayed.pieces().len() {
            let piece = PieceId(i as u16);
            sink.attach_piece(piece, self.displayed.rest_transform(piece));
        }
    }

    /// Returns the logical state with all queued moves applied.
    pub fn latest(&self) -> &Puzzle {
        &self.latest
    }
    /// Returns the state being displayed, not including the move currently
    /// animating.
    pub fn displayed(&self) -> &Puzzle {
        &self.displayed
    }
    /// Returns the puzzle type.
    pub fn ty(&self) -> PuzzleTypeEnum {
        self.latest.ty()
    }

    /// Returns the animation preferences.
    pub fn preferences(&self) -> &InteractionPreferences {
        &self.prefs
    }
    /// Replaces the animation preferences.
    pub fn set_preferences(&mut self, prefs: InteractionPreferences) {
        self.prefs = prefs;
    }

    /// Requests a move. Returns `false` (a completed no-op) when the move
    /// does not apply to the current state: an axis with a single layer, a
    /// straddled slice, or an out-of-range slice depth. Otherwise the move is
    /// queued behind any moves already animating, strictly FIFO.
    pub fn push_move(&mut self, mv: Move) -> bool {
        self.enqueue(mv, true, false)
    }

    fn enqueue(&mut self, mv: Move, record: bool, replay: bool) -> bool {
        if !self.latest.is_legal(mv) {
            // UI stays responsive to rapid or accidental input; an invalid
            // target completes immediately with no visual change.
            log::debug!("ignoring no-op move {mv}");
            return false;
        }
        self.latest.apply(mv);
        self.queue.push_back(QueuedMove { mv, replay });
        self.queue_max = std::cmp::max(self.queue_max, self.queue.len());
        if record {
            self.history.push(mv);
        }
        true
    }

    /// Returns whether a move animation is in flight or queued.
    pub fn is_animating(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Advances the animation to the next frame, using the given time delta
    /// between this frame and the last. Transforms for moving pieces are
    /// pushed to the sink every frame; when a move settles, its pieces are
    /// pushed once at rest pose and the sink receives one settled snapshot.
    pub fn advance(&mut self, delta: Duration, sink: &mut dyn RenderSink) {
        let Some(&QueuedMove { mv, .. }) = self.queue.front() else {
            self.queue_max = 0;
            return;
        };
        if self.active.is_none() {
            self.active = Some(ActiveMove {
                pieces: self.displayed.select(mv),
                geometry: self.displayed.move_geometry(mv),
            });
        }
        let Some(active) = &self.active else {
            return;
        };

        // `base_duration` is calibrated for the default twist duration;
        // preference scaling keeps the relative lengths of quarter turns,
        // half turns, and slices.
        let duration = active.geometry.base_duration.as_secs_f32() * self.prefs.twist_duration
            / REFERENCE_TWIST_DURATION;
        let base_speed = delta.as_secs_f32() / duration;
        // Animate exponentially faster if there are/were more moves in the
        // queue.
        let speed_mod = match self.prefs.dynamic_twist_speed {
            true => ((self.queue_max - 1) as f32 * EXP_TWIST_FACTOR).exp(),
            false => 1.0,
        };
        let mut move_delta = base_speed * speed_mod;
        // Cap the delta at 1.0, and also handle the case where something went
        // wrong with the calculation (e.g., division by zero).
        if !(0.0..MIN_TWIST_DELTA).contains(&move_delta) {
            move_delta = 1.0; // Instantly complete the move.
        }
        self.progress += move_delta;
        if self.progress >= 1.0 {
            self.settle(sink);
            return;
        }

        let t = MOVE_INTERPOLATION_FN(self.progress);
        let geometry = active.geometry;
        for &piece in &active.pieces {
            // Recomputed from the pre-move state every frame so that float
            // error cannot accumulate across frames.
            let rest = self.displayed.rest_transform(piece);
            sink.update_transform(
                piece,
                rest.rotated(geometry.axis, geometry.angle * t, geometry.pivot),
            );
        }
    }

    fn settle(&mut self, sink: &mut dyn RenderSink) {
        let Some(entry) = self.queue.pop_front() else {
            return;
        };
        let pieces = match self.active.take() {
            Some(active) => active.pieces,
            None => self.displayed.select(entry.mv),
        };
        self.displayed.apply(entry.mv);
        self.progress = 0.0;

        for piece in pieces {
            sink.update_transform(piece, self.displayed.rest_transform(piece));
        }
        log::trace!("settled move {}", entry.mv);
        sink.on_move_settled(&self.displayed.snapshot());

        if entry.replay && self.replaying {
            self.replay_remaining -= 1;
            if self.replay_remaining == 0 {
                self.replaying = false;
                self.finished_replay = Some(self.replay_total);
                log::info!("replay of {} moves complete", self.replay_total);
            }
        }
    }

    /// Skips the animations for all queued moves.
    pub fn catch_up(&mut self, sink: &mut dyn RenderSink) {
        while !self.queue.is_empty() {
            self.settle(sink);
        }
        self.progress = 0.0;
        debug_assert_eq!(self.displayed, self.latest);
    }

    /// Returns the executed moves since the last scramble or replay.
    pub fn history(&self) -> &[Move] {
        &self.history
    }
    /// Returns whether there is a move to undo.
    pub fn has_undo(&self) -> bool {
        !self.history.is_empty()
    }
    /// Undoes the most recent move in the history.
    pub fn undo(&mut self) -> Result<(), &'static str> {
        match self.history.pop() {
            Some(mv) => {
                if self.enqueue(mv.reverse(), false, false) {
                    Ok(())
                } else {
                    Err("could not undo move")
                }
            }
            None => Err("nothing to undo"),
        }
    }

    /// Clears the history and queues a fresh scramble sequence of `count`
    /// moves (or the puzzle's default). Moves execute sequentially through
    /// the same queue as user moves and are recorded, so a subsequent
    /// [`Self::solve_by_replay`] undoes the scramble. Returns the number of
    /// moves queued.
    pub fn scramble(&mut self, count: Option<usize>) -> usize {
        let mut rng = rand::rng();
        self.scramble_with_rng(count, &mut rng)
    }
    /// Like [`Self::scramble`] but deterministic for a given seed.
    pub fn scramble_with_seed(&mut self, seed: u64, count: Option<usize>) -> usize {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.scramble_with_rng(count, &mut rng)
    }
    fn scramble_with_rng<R: Rng + ?Sized>(&mut self, count: Option<usize>, rng: &mut R) -> usize {
        let default_count = self.latest.scramble_moves_count();
        let n = count.unwrap_or(default_count);
        self.history.clear();
        let moves = scramble::scramble_moves(&self.latest, n, rng);
        log::info!("scrambling {} with {} moves", self.ty(), moves.len());
        let mut queued = 0;
        for mv in moves {
            if self.enqueue(mv, true, false) {
                queued += 1;
            }
        }
        self.scramble_state = if n >= default_count {
            ScrambleState::Full
        } else {
            ScrambleState::Partial
        };
        queued
    }

    /// Replays the whole history in reverse with inverted directions, then
    /// clears it.
    ///
    /// This is a heuristic undo, not a shortest-path solve: for most puzzles
    /// it simply mirrors the scramble. Returns the number of history moves
    /// being undone; the same count is surfaced through
    /// [`Self::take_finished_replay`] once the last replayed move settles.
    pub fn solve_by_replay(&mut self) -> usize {
        let original = self.history.len();
        let inverted: Vec<Move> = self.history.drain(..).rev().map(Move::reverse).collect();
        self.replay_total = original;
        self.replay_remaining = 0;
        for mv in inverted {
            if self.enqueue(mv, false, true) {
                self.replay_remaining += 1;
            }
        }
        if self.replay_remaining == 0 {
            // Nothing to animate; the puzzle was already at its pre-history
            // state.
            self.finished_replay = Some(original);
        } else {
            self.replaying = true;
            log::info!("replaying {original} moves in reverse");
        }
        original
    }
    /// Returns whether an inverse replay is still executing.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }
    /// Takes the completion note of the last finished replay: the number of
    /// history moves it undid.
    pub fn take_finished_replay(&mut self) -> Option<usize> {
        self.finished_replay.take()
    }

    /// Returns whether the puzzle has been scrambled, solved, etc..
    pub fn scramble_state(&self) -> ScrambleState {
        self.scramble_state
    }
    /// Returns whether the puzzle is currently in a solved configuration.
    pub fn is_solved(&self) -> bool {
        self.latest.is_solved()
    }
    /// Checks whether the puzzle was scrambled and is now solved. If so,
    /// updates the scramble state and returns `true`.
    pub fn check_just_solved(&mut self) -> bool {
        let has_been_scrambled = matches!(
            self.scramble_state,
            ScrambleState::Partial | ScrambleState::Full,
        );
        if has_been_scrambled && self.is_solved() {
            self.scramble_state = ScrambleState::Solved;
            true
        } else {
            false
        }
    }
}
