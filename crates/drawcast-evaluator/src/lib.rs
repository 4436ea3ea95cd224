//! Scoring system for ranking zodiac categories from a draw history.
//!
//! This crate implements a three-level scoring architecture:
//!
//! 1. **Dimension scoring** ([`dimension`]) - Each of ten independent heuristics turns the
//!    history into a [`ScoreBoard`](score_board::ScoreBoard) over the 12 zodiac signs,
//!    normalized to \[0, 100\].
//!
//! 2. **Combination** ([`combiner`]) - A weight vector linearly combines the dimension boards
//!    into one board, which is then ranked.
//!
//! 3. **Prediction** ([`prediction`]) - The ranked board is turned into a
//!    [`Prediction`](prediction::Prediction): top and core signs, banned signs from the
//!    [`kill_list`], color/size/parity calls and a confidence figure.
//!
//! # Architecture
//!
//! ```text
//! Prediction (top 6 / core 3 / banned / calls)
//!     ↓ uses
//! Combined board (Σ weightᵢ × boardᵢ, kill override, optional jitter)
//!     ↓ uses
//! Dimension boards (10 heuristics over the history)
//! ```
//!
//! The weights are tuned by the genetic algorithm in `drawcast-training`, which replays the
//! combination step against past draws.
//!
//! # Design Principles
//!
//! ## Boards are rebuilt every pass
//!
//! Dimensions hold no state between calls. A [`ScoringContext`](scoring_context::ScoringContext)
//! precomputes the per-draw lookups once and every dimension reads from it.
//!
//! ## Deterministic unless asked otherwise
//!
//! Combination and ranking are pure; ties are broken by zodiac declaration order. The only
//! randomness is the bounded [`Jitter`](combiner::Jitter) on the prediction path, which draws
//! from a caller-provided generator.
//!
//! # Current Limitations
//!
//! - **Linear combination**: dimension interactions are not modeled.
//! - **No predictive power**: draws are independent; the scores are heuristics, nothing more.

pub mod combiner;
pub mod dimension;
pub mod kill_list;
pub mod prediction;
pub mod score_board;
pub mod scoring_context;
