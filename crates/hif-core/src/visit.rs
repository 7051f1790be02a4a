//! Double-dispatch visitor substrate.
//!
//! [`MonoVisitor`] walks a single tree; [`BiVisitor`] walks two trees in lock
//! step, which is what the comparator is built on. Both dispatch on the closed
//! [`Kind`] universe via [`children`], a canonical per-kind child enumeration that
//! stands in for the virtual `accept()` methods of a class-hierarchy IR.
//!
//! The two traits deliberately differ on what happens when a kind (or a kind
//! pair) has no override: [`MonoVisitor::visit`] falls through to generic
//! structural recursion (every kind is always handled, just maybe only
//! structurally), while [`BiVisitor::visit_pair`] silently skips a differing or
//! arity-mismatched pair rather than recursing blindly into children that may not
//! correspond to each other. Callers that need the stricter behavior (e.g. the
//! comparator's "two top-level declarations of different kinds" case) raise their
//! own [`hif_error::Error::unexpected_case`] explicitly.

use crate::ir::{Hif, Kind, NodeData, NodeId};
use crate::Result;

/// Enumerates the direct children of `id` in a canonical, kind-specific order:
/// named structural fields first, then owned lists, then the node's type
/// sub-node last (if any). This order is what [`MonoVisitor::visit_children`] and
/// [`BiVisitor::visit_children_pair`] traverse.
pub fn children(hif: &Hif, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let data = &hif.node(id).data;
    match data {
        NodeData::Aggregate(n) => {
            out.extend(n.others);
            out.extend(&n.alts);
            out.extend(n.ty);
        }
        NodeData::AggregateAlt(n) => {
            out.extend(&n.indices);
            out.push(n.value);
        }
        NodeData::Alias(n) => out.push(n.value),
        NodeData::Array(n) => {
            out.push(n.span);
            out.push(n.element_type);
        }
        NodeData::Assign(n) => {
            out.push(n.lhs);
            out.push(n.rhs);
        }
        NodeData::Bit(_) => {}
        NodeData::BitValue(n) => out.extend(n.ty),
        NodeData::Bitvector(n) => out.push(n.span),
        NodeData::BitvectorValue(n) => out.extend(n.ty),
        NodeData::Bool(_) => {}
        NodeData::BoolValue(n) => out.extend(n.ty),
        NodeData::Break => {}
        NodeData::Cast(n) => {
            out.push(n.ty);
            out.push(n.value);
        }
        NodeData::Char(_) => {}
        NodeData::CharValue(n) => out.extend(n.ty),
        NodeData::Const(n) => {
            out.extend(n.ty);
            out.extend(n.value);
        }
        NodeData::Contents(n) => out.extend(scope_children(&n.scope)),
        NodeData::Continue => {}
        NodeData::DesignUnit(n) => out.extend(&n.views),
        NodeData::Entity(n) => {
            out.extend(&n.ports);
            out.extend(&n.parameters);
        }
        NodeData::Enum(n) => out.extend(&n.values),
        NodeData::EnumValue(_) => {}
        NodeData::Event(_) => {}
        NodeData::Expression(n) => {
            out.push(n.value1);
            out.extend(n.value2);
            out.extend(n.ty);
        }
        NodeData::Field(n) => out.extend(n.ty),
        NodeData::FieldReference(n) => out.push(n.prefix),
        NodeData::File(n) => out.push(n.element_type),
        NodeData::For(n) => {
            out.extend(&n.init_declarations);
            out.extend(n.condition);
            out.extend(n.step);
            out.extend(&n.actions);
        }
        NodeData::ForGenerate(n) => {
            out.extend(&n.init_declarations);
            out.extend(n.condition);
            out.extend(n.step);
            out.extend(scope_children(&n.scope));
        }
        NodeData::Function(n) => {
            out.extend(&n.parameters);
            out.extend(n.return_type);
            out.extend(scope_children(&n.scope));
        }
        NodeData::FunctionCall(n) => {
            out.extend(n.instance);
            out.extend(&n.parameter_assigns);
            out.extend(&n.template_parameter_assigns);
            out.extend(n.ty);
        }
        NodeData::GlobalAction(n) => out.extend(&n.actions),
        NodeData::Identifier(_) => {}
        NodeData::If(n) => {
            out.extend(&n.alts);
            out.extend(&n.default_actions);
        }
        NodeData::IfAlt(n) => {
            out.push(n.condition);
            out.extend(&n.actions);
        }
        NodeData::IfGenerate(n) => {
            out.push(n.condition);
            out.extend(scope_children(&n.scope));
        }
        NodeData::Instance(n) => {
            out.extend(&n.port_assigns);
            out.extend(&n.parameter_assigns);
        }
        NodeData::Int(n) => out.push(n.span),
        NodeData::IntValue(n) => out.extend(n.ty),
        NodeData::Library(_) => {}
        NodeData::LibraryDef(n) => out.extend(scope_children(&n.scope)),
        NodeData::Member(n) => {
            out.push(n.prefix);
            out.push(n.index);
        }
        NodeData::Null => {}
        NodeData::Parameter(n) => {
            out.extend(n.ty);
            out.extend(n.value);
        }
        NodeData::ParameterAssign(n) => out.push(n.value),
        NodeData::Pointer(n) => out.push(n.element_type),
        NodeData::Port(n) => out.extend(n.ty),
        NodeData::PortAssign(n) => out.extend(n.value),
        NodeData::Procedure(n) => {
            out.extend(&n.parameters);
            out.extend(scope_children(&n.scope));
        }
        NodeData::ProcedureCall(n) => out.extend(&n.parameter_assigns),
        NodeData::Range(n) => {
            out.push(n.left_bound);
            out.push(n.right_bound);
            out.extend(n.ty);
        }
        NodeData::Real(n) => out.extend(n.span),
        NodeData::RealValue(n) => out.extend(n.ty),
        NodeData::Record(n) => out.extend(&n.fields),
        NodeData::RecordValue(n) => {
            out.extend(&n.alts);
            out.extend(n.ty);
        }
        NodeData::RecordValueAlt(n) => out.push(n.value),
        NodeData::Reference(_) => {}
        NodeData::Return(n) => out.extend(n.value),
        NodeData::Signal(n) => {
            out.extend(n.ty);
            out.extend(n.value);
        }
        NodeData::Signed(n) => out.push(n.span),
        NodeData::Slice(n) => {
            out.push(n.prefix);
            out.push(n.span);
        }
        NodeData::State(n) => out.extend(&n.actions),
        NodeData::StateTable(n) => {
            out.extend(&n.sensitivity);
            out.extend(&n.states);
            out.extend(scope_children(&n.scope));
        }
        NodeData::String(_) => {}
        NodeData::StringValue(n) => out.extend(n.ty),
        NodeData::Switch(n) => {
            out.push(n.condition);
            out.extend(&n.alts);
            out.extend(&n.default_actions);
        }
        NodeData::SwitchAlt(n) => {
            out.extend(&n.values);
            out.extend(&n.actions);
        }
        NodeData::System(n) => {
            out.extend(&n.libraries);
            out.extend(&n.design_units);
        }
        NodeData::Time(_) => {}
        NodeData::TimeValue(n) => out.extend(n.ty),
        NodeData::Transition(n) => {
            out.extend(n.condition);
            out.extend(&n.actions);
        }
        NodeData::TypeDef(n) => out.extend(n.ty),
        NodeData::TypeReference(n) => {
            out.extend(&n.template_type_assigns);
            out.extend(&n.template_value_assigns);
        }
        NodeData::TypeTP(n) => out.extend(n.ty),
        NodeData::TypeTPAssign(n) => out.push(n.value),
        NodeData::Unsigned(n) => out.push(n.span),
        NodeData::ValueStatement(n) => out.extend(n.value),
        NodeData::ValueTP(n) => {
            out.extend(n.ty);
            out.extend(n.value);
        }
        NodeData::ValueTPAssign(n) => out.push(n.value),
        NodeData::Variable(n) => {
            out.extend(n.ty);
            out.extend(n.value);
        }
        NodeData::View(n) => {
            out.extend(n.entity);
            out.extend(n.contents);
            out.extend(scope_children(&n.scope));
        }
        NodeData::ViewReference(_) => {}
        NodeData::Wait(n) => {
            out.extend(&n.sensitivity);
            out.extend(n.condition);
        }
        NodeData::When(n) => {
            out.extend(&n.alts);
            out.extend(n.default_value);
        }
        NodeData::WhenAlt(n) => {
            out.push(n.condition);
            out.push(n.value);
        }
        NodeData::While(n) => {
            out.push(n.condition);
            out.extend(&n.actions);
        }
        NodeData::With(n) => {
            out.push(n.condition);
            out.extend(&n.alts);
            out.extend(n.default_value);
        }
        NodeData::WithAlt(n) => {
            out.extend(&n.values);
            out.push(n.value);
        }
    }
    out
}

fn scope_children(scope: &crate::ir::ScopeLists) -> Vec<NodeId> {
    let mut out = Vec::new();
    out.extend(&scope.libraries);
    out.extend(&scope.template_parameters);
    out.extend(&scope.inheritances);
    out.extend(&scope.declarations);
    out.extend(&scope.state_tables);
    out.extend(&scope.instances);
    out.extend(&scope.generates);
    out.extend(scope.global_action);
    out
}

/// Walks a single IR tree. The default `visit` method recurses structurally into
/// every child, so a visitor that only overrides a handful of kinds still sees
/// the rest of the tree; override `visit` (matching on `hif.kind(id)`) to add
/// per-kind behavior, calling `self.visit_children(hif, id)` to keep recursing.
pub trait MonoVisitor {
    fn visit(&mut self, hif: &Hif, id: NodeId) -> Result<()> {
        self.visit_children(hif, id)
    }

    fn visit_children(&mut self, hif: &Hif, id: NodeId) -> Result<()> {
        for child in children(hif, id) {
            self.visit(hif, child)?;
        }
        Ok(())
    }
}

/// Walks two IR trees in lock step. Unlike [`MonoVisitor`], a kind mismatch (or,
/// within a matching kind, an arity mismatch between child lists) is not an
/// error: `visit_pair` returns `Ok(())` without recursing, leaving the caller
/// (typically the comparator) to decide what a structural difference means.
pub trait BiVisitor {
    fn visit_pair(&mut self, hif: &Hif, a: NodeId, b: NodeId) -> Result<()> {
        if hif.kind(a) != hif.kind(b) {
            return Ok(());
        }
        self.visit_children_pair(hif, a, b)
    }

    fn visit_children_pair(&mut self, hif: &Hif, a: NodeId, b: NodeId) -> Result<()> {
        let (ca, cb) = (children(hif, a), children(hif, b));
        if ca.len() != cb.len() {
            return Ok(());
        }
        for (x, y) in ca.into_iter().zip(cb) {
            self.visit_pair(hif, x, y)?;
        }
        Ok(())
    }
}

/// Used by tests and by `compare`'s fallback path to assert a kind was expected
/// to be handled explicitly rather than falling through to generic recursion.
pub fn unhandled(kind: Kind) -> hif_error::Error {
    hif_error::Error::unhandled_kind(kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AssignNode, IdentifierNode, NodeData};

    struct CountingVisitor {
        count: usize,
    }

    impl MonoVisitor for CountingVisitor {
        fn visit(&mut self, hif: &Hif, id: NodeId) -> Result<()> {
            self.count += 1;
            self.visit_children(hif, id)
        }
    }

    #[test]
    fn mono_visitor_visits_every_descendant() {
        let mut hif = Hif::new();
        let lhs = hif.alloc(NodeData::Identifier(IdentifierNode {
            name: "a".into(),
        }));
        let rhs = hif.alloc(NodeData::Identifier(IdentifierNode {
            name: "b".into(),
        }));
        let assign = hif.alloc(NodeData::Assign(AssignNode { lhs, rhs }));

        let mut visitor = CountingVisitor { count: 0 };
        visitor.visit(&hif, assign).unwrap();
        assert_eq!(visitor.count, 3);
    }

    #[test]
    fn bi_visitor_skips_mismatched_kinds() {
        struct Recorder {
            pairs: usize,
        }
        impl BiVisitor for Recorder {
            fn visit_pair(&mut self, hif: &Hif, a: NodeId, b: NodeId) -> Result<()> {
                self.pairs += 1;
                if hif.kind(a) != hif.kind(b) {
                    return Ok(());
                }
                self.visit_children_pair(hif, a, b)
            }
        }

        let mut hif = Hif::new();
        let id_a = hif.alloc(NodeData::Identifier(IdentifierNode { name: "a".into() }));
        let bool_b = hif.alloc(NodeData::BoolValue(crate::ir::BoolValueNode {
            value: true,
            ty: None,
        }));

        let mut recorder = Recorder { pairs: 0 };
        recorder.visit_pair(&hif, id_a, bool_b).unwrap();
        assert_eq!(recorder.pairs, 1);
    }
}
