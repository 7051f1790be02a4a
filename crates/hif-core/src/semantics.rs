//! The external "language semantics" collaborator.
//!
//! Every per-language policy question (what type a constant has, how wide a span
//! is, whether a type is signed) is answered by a [`LanguageSemantics`]
//! implementation supplied by the caller. This crate never implements the policy
//! itself, only the interface and the algorithms built on top of it.

use crate::ir::{Hif, NodeId};
use crate::Result;

/// Per-language policy queries consumed by the comparator, the constant
/// transformer, the scope mover, and the hierarchical symbol builder.
///
/// Implementations are expected to be cheap and side-effect free; none of the
/// algorithms in this crate cache their results across calls.
pub trait LanguageSemantics {
    /// Returns the canonical type for a constant, as the source language would
    /// infer it (e.g. an unsized Verilog integer literal gets a 32-bit `Int`).
    fn get_type_for_constant(&self, hif: &Hif, value: NodeId) -> Result<NodeId>;

    /// Converts a `Real` value to its nearest representable integer, following
    /// the source language's rounding rule (VHDL and Verilog disagree on this).
    fn transform_real_to_int(&self, value: f64) -> i64;

    /// Bit width of a `Range` span node (`|left - right| + 1`, language rounding
    /// rules for non-numeric bounds aside).
    fn span_get_bitwidth(&self, hif: &Hif, span: NodeId) -> Result<u64>;

    /// Total storage width of a type, including nested element types for arrays.
    fn type_get_total_span_size(&self, hif: &Hif, ty: NodeId) -> Result<u64>;

    /// Width of a type's own span, without descending into element types.
    fn type_get_span_bitwidth(&self, hif: &Hif, ty: NodeId) -> Result<u64>;

    fn type_is_signed(&self, hif: &Hif, ty: NodeId) -> bool;
    fn type_is_logic(&self, hif: &Hif, ty: NodeId) -> bool;
    fn type_is_resolved(&self, hif: &Hif, ty: NodeId) -> bool;
    fn type_is_constexpr(&self, hif: &Hif, ty: NodeId) -> bool;

    /// Resolves the semantic type of an arbitrary value or typed expression node.
    fn get_semantic_type(&self, hif: &Hif, obj: NodeId) -> Result<NodeId>;

    /// Resolves a `Reference`/`FunctionCall`/`Instance` to its declaration.
    fn get_declaration(&self, hif: &Hif, obj: NodeId) -> Result<NodeId>;

    /// Every node in the tree that refers to `declaration` by name (used by the
    /// scope mover to rewrite references after a rename).
    fn get_references(&self, hif: &Hif, declaration: NodeId) -> Result<Vec<NodeId>>;
}
