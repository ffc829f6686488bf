//! Twisty-puzzle state and move engine.
//!
//! This crate is the logic core of a virtual puzzle viewer: it owns the
//! pieces of the active puzzle, decides which pieces a move affects, animates
//! moves over time, and commits the resulting discrete state. Rendering and
//! camera capture live in the host application and talk to the core through
//! the [`render::RenderSink`] and [`capture::ColorSampler`] traits.
//!
//! The usual entry point is [`puzzle::PuzzleController`]:
//!
//! ```
//! use std::time::Duration;
//! use polytwist::puzzle::{Face, Move, PuzzleController, PuzzleTypeEnum, TwistDirection};
//! use polytwist::render::NullSink;
//!
//! let mut controller = PuzzleController::new(PuzzleTypeEnum::Rubiks { layer_count: 3 });
//! controller.push_move(Move::Face {
//!     face: Face::Up,
//!     direction: TwistDirection::CW,
//!     depth: 1,
//!     wide: false,
//! });
//! // The host calls `advance` once per frame; `NullSink` discards output.
//! controller.advance(Duration::from_millis(16), &mut NullSink);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[macro_use]
extern crate lazy_static;

pub mod capture;
pub mod colors;
pub mod preferences;
pub mod puzzle;
pub mod render;
