//! Pipeline stages for one conversion cycle.
//!
//! Each submodule implements exactly one step. The orchestrator strings them
//! together and owns all state; the stages themselves are stateless.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ stage ──▶ (engine) ──▶ publish
//! (controls)   (bytes)    (svg)       (preview + data URI)
//! ```
//!
//! 1. [`validate`]: parse width/spacing text, flip the background checkbox
//!    into the engine's invert flag; rejection is a silent skip
//! 2. [`stage`]: read the selected file; the only `.await` in a cycle
//! 3. [`publish`]: prefix the XML declaration, base64-wrap into a
//!    `data:` URI, keep the bare document for the preview; optionally
//!    write the standalone file atomically

pub mod publish;
pub mod stage;
pub mod validate;
