//! # hif-core
//!
//! Core of a language-neutral intermediate representation ("HIF") bridging hardware
//! description languages (VHDL, Verilog, SystemC) and a canonical HIF form.
//!
//! This crate covers the non-trivial, language-independent engineering underneath the
//! per-language front ends. Parsers/writers, the name table's string storage, and the
//! full "language semantics" policy object live outside this crate; it only consumes
//! them through the interfaces in [`semantics`] and [`nametable`].
//!
//! - [`ir`]: the closed ~90-variant node universe, arena-owned, with parent back-references.
//! - [`visit`]: `MonoVisitor`/`BiVisitor`, the double-dispatch substrate every analysis is built on.
//! - [`compare`]: a strict total order over IR trees, used to canonicalize and deduplicate.
//! - [`transform`]: bit-exact coercion of constant values across hardware-typed targets.
//! - [`scope_mover`]: relocating declarations/generates/instances/etc. between scopes.
//! - [`hsymbol`]: hierarchical symbol construction (`a.b.(c)`-style names).
//! - [`lhs`]: the left-hand-side-of-assignment query.
//! - [`semantics`]: the external "language semantics" collaborator interface.
//! - [`nametable`]: fresh-name minting and conflict detection.
//!
//! Scheduling model is single-threaded and synchronous: no operation here suspends,
//! and every IR mutation happens on the calling thread.

pub mod compare;
pub mod hsymbol;
pub mod ir;
pub mod lhs;
pub mod nametable;
pub mod scope_mover;
pub mod semantics;
pub mod transform;
pub mod visit;

pub use compare::compare;
pub use hsymbol::{DefinitionStyle, build_hierarchical_symbol};
pub use ir::{Hif, Kind, NodeId};
pub use lhs::{LeftHandSideOptions, get_left_hand_side, is_in_left_hand_side};
pub use nametable::NameTable;
pub use scope_mover::move_to_scope;
pub use semantics::LanguageSemantics;
pub use transform::{TransformPolicy, transform_constant, transform_value};

/// Result type alias used throughout hif-core.
pub type Result<T> = hif_error::Result<T>;
