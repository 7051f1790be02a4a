//! The left-hand-side-of-assignment query: given an arbitrary value node, is it
//! (part of) the target being written to, or is it being read?
//!
//! This matters for anything that needs to distinguish a read from a write
//! without re-deriving assignment semantics itself (e.g. dead-store analysis, or
//! the scope mover deciding whether a renamed reference needs special care).

use crate::ir::{Hif, Kind, NodeId, PortDirection};
use crate::Result;

/// Tunes [`is_in_left_hand_side`]'s treatment of port connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftHandSideOptions {
    /// When `true`, an `in`-less `PortAssign` (out/inout) counts as a write
    /// target; `in` ports never do, regardless of this flag.
    pub consider_portassigns: bool,
}

/// Walks from `obj` toward its enclosing assignment-like construct, passing
/// through the contexts that preserve "am I being written" without changing it:
/// `Cast`, a `Concat`-operator `Expression`, `PrefixedReference` chains
/// (`FieldReference`/`Member`/`Slice`), and the alternative value of
/// `When`/`With`/`RecordValue`/`Aggregate`. Returns the outermost node reached
/// by that walk, or `obj` itself if none apply.
pub fn get_left_hand_side(hif: &Hif, obj: NodeId) -> NodeId {
    let mut current = obj;
    loop {
        let Some(parent) = hif.parent(current) else {
            return current;
        };
        let continues = match hif.kind(parent) {
            Kind::Cast => true,
            Kind::Expression => matches!(
                &hif.node(parent).data,
                crate::ir::NodeData::Expression(e) if e.operator == crate::ir::Operator::Concat
            ),
            Kind::FieldReference | Kind::Member | Kind::Slice => true,
            Kind::WhenAlt | Kind::WithAlt => true,
            Kind::RecordValueAlt | Kind::AggregateAlt => true,
            Kind::When | Kind::With | Kind::RecordValue | Kind::Aggregate => true,
            _ => false,
        };
        if !continues {
            return current;
        }
        current = parent;
    }
}

/// `true` iff the walk from `obj` (see [`get_left_hand_side`]) lands on the
/// `lhs` field of an `Assign`, or on a `PortAssign` whose direction is not `in`
/// when `opts.consider_portassigns` is set.
pub fn is_in_left_hand_side(hif: &Hif, obj: NodeId, opts: &LeftHandSideOptions) -> Result<bool> {
    let top = get_left_hand_side(hif, obj);
    let Some(parent) = hif.parent(top) else {
        return Ok(false);
    };
    match hif.kind(parent) {
        Kind::Assign => {
            let is_lhs = matches!(
                &hif.node(parent).data,
                crate::ir::NodeData::Assign(a) if a.lhs == top
            );
            Ok(is_lhs)
        }
        Kind::PortAssign if opts.consider_portassigns => {
            let writes = matches!(
                &hif.node(parent).data,
                crate::ir::NodeData::PortAssign(p) if p.direction != PortDirection::In
            );
            Ok(writes)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AssignNode, IdentifierNode, NodeData};

    #[test]
    fn identifier_on_lhs_of_assign_is_detected() {
        let mut hif = Hif::new();
        let lhs = hif.alloc(NodeData::Identifier(IdentifierNode { name: "q".into() }));
        let rhs = hif.alloc(NodeData::Identifier(IdentifierNode { name: "d".into() }));
        let assign = hif.alloc(NodeData::Assign(AssignNode { lhs, rhs }));
        hif.set_owner(lhs, assign, None);
        hif.set_owner(rhs, assign, None);

        let opts = LeftHandSideOptions::default();
        assert!(is_in_left_hand_side(&hif, lhs, &opts).unwrap());
        assert!(!is_in_left_hand_side(&hif, rhs, &opts).unwrap());
    }

    #[test]
    fn slice_of_lhs_is_still_lhs() {
        let mut hif = Hif::new();
        let prefix = hif.alloc(NodeData::Identifier(IdentifierNode { name: "bus".into() }));
        let lo = hif.alloc(NodeData::IntValue(crate::ir::IntValueNode { value: 0, ty: None }));
        let hi = hif.alloc(NodeData::IntValue(crate::ir::IntValueNode { value: 3, ty: None }));
        let range = hif.alloc(NodeData::Range(crate::ir::RangeNode {
            direction: crate::ir::Direction::Downto,
            left_bound: hi,
            right_bound: lo,
            ty: None,
        }));
        let slice = hif.alloc(NodeData::Slice(crate::ir::SliceNode { prefix, span: range }));
        let rhs = hif.alloc(NodeData::Identifier(IdentifierNode { name: "d".into() }));
        let assign = hif.alloc(NodeData::Assign(AssignNode { lhs: slice, rhs }));
        hif.set_owner(prefix, slice, None);
        hif.set_owner(slice, assign, None);

        let opts = LeftHandSideOptions::default();
        assert!(is_in_left_hand_side(&hif, prefix, &opts).unwrap());
    }
}
