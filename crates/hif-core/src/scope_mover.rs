//! Relocating declarations, generates, state tables, instances, libraries, and
//! template parameters between IR scopes, renaming on conflict and rewriting
//! every reference to the moved declaration atomically.

use crate::ir::{ContentsDecl, GlobalActionNode, Hif, Kind, ListKind, NodeData, NodeId, ScopeLists};
use crate::nametable::NameTable;
use crate::semantics::LanguageSemantics;
use crate::Result;
use hif_error::Error;

fn admissible_lists(from: Kind, to: Kind) -> Option<Vec<ListKind>> {
    use Kind::*;
    use ListKind::*;
    match (from, to) {
        (Contents, Contents) => Some(vec![
            Declarations,
            Generates,
            StateTables,
            Instances,
            Libraries,
            TemplateParameters,
            Inheritances,
            GlobalActionActions,
        ]),
        // declarations and libraries only: generates/stateTables/instances/globalAction are rejected.
        (Contents, View) => Some(vec![Declarations, Libraries]),
        (StateTable, LibraryDef)
        | (StateTable, Contents)
        | (StateTable, Function)
        | (StateTable, Procedure)
        | (StateTable, StateTable) => Some(vec![Declarations]),
        // View's own flat lists; generates/stateTables/instances/globalAction live on the
        // View's nested `contents`/`entity` and are moved by the recursive step in
        // `move_to_scope` instead of here.
        (View, View) => Some(vec![Declarations, Inheritances, Libraries, TemplateParameters]),
        (LibraryDef, LibraryDef) => Some(vec![Declarations, Libraries, TemplateParameters]),
        (Function, Function) | (Procedure, Procedure) => Some(vec![Declarations]),
        (Entity, Entity) => Some(vec![]),
        (Entity, View) => Some(vec![]),
        _ => None,
    }
}

fn scope_list_mut(scope: &mut ScopeLists, list: ListKind) -> Option<&mut Vec<NodeId>> {
    match list {
        ListKind::Declarations => Some(&mut scope.declarations),
        ListKind::Generates => Some(&mut scope.generates),
        ListKind::StateTables => Some(&mut scope.state_tables),
        ListKind::Instances => Some(&mut scope.instances),
        ListKind::Libraries => Some(&mut scope.libraries),
        ListKind::TemplateParameters => Some(&mut scope.template_parameters),
        ListKind::Inheritances => Some(&mut scope.inheritances),
        _ => None,
    }
}

fn collect_scope_members(hif: &Hif, scope: NodeId) -> Vec<(ListKind, NodeId)> {
    let mut out = Vec::new();
    if let Some(sl) = hif.node(scope).data.scope_lists() {
        for id in &sl.declarations {
            out.push((ListKind::Declarations, *id));
        }
        for id in &sl.generates {
            out.push((ListKind::Generates, *id));
        }
        for id in &sl.state_tables {
            out.push((ListKind::StateTables, *id));
        }
        for id in &sl.instances {
            out.push((ListKind::Instances, *id));
        }
        for id in &sl.libraries {
            out.push((ListKind::Libraries, *id));
        }
        for id in &sl.template_parameters {
            out.push((ListKind::TemplateParameters, *id));
        }
        for id in &sl.inheritances {
            out.push((ListKind::Inheritances, *id));
        }
        if let Some(ga) = sl.global_action
            && let NodeData::GlobalAction(g) = &hif.node(ga).data {
                for id in &g.actions {
                    out.push((ListKind::GlobalActionActions, *id));
                }
            }
    }
    out
}

/// Returns the scope's existing `GlobalAction`, allocating an empty one and
/// attaching it to the scope if it doesn't have one yet.
fn get_or_create_global_action(hif: &mut Hif, scope: NodeId) -> NodeId {
    let existing = hif.node(scope).data.scope_lists().and_then(|sl| sl.global_action);
    if let Some(ga) = existing {
        return ga;
    }
    let ga = hif.alloc(NodeData::GlobalAction(GlobalActionNode { actions: Vec::new() }));
    if let Some(sl) = hif.node_mut(scope).data.scope_lists_mut() {
        sl.global_action = Some(ga);
    }
    ga
}

fn global_action_actions_mut(hif: &mut Hif, ga: NodeId) -> &mut Vec<NodeId> {
    match &mut hif.node_mut(ga).data {
        NodeData::GlobalAction(g) => &mut g.actions,
        _ => unreachable!("get_or_create_global_action always returns a GlobalAction node"),
    }
}

fn rewrite_reference(hif: &mut Hif, reference: NodeId, new_name: &str) {
    match &mut hif.node_mut(reference).data {
        NodeData::Reference(n) => n.name = new_name.to_string(),
        NodeData::Identifier(n) => n.name = new_name.to_string(),
        NodeData::FunctionCall(n) => n.name = new_name.to_string(),
        NodeData::ProcedureCall(n) => n.name = new_name.to_string(),
        NodeData::Instance(n) => n.reference_name = new_name.to_string(),
        _ => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn move_one(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    names: &mut dyn NameTable,
    old_scope: NodeId,
    new_scope: NodeId,
    list: ListKind,
    id: NodeId,
    suffix: &str,
) -> Result<()> {
    if list == ListKind::GlobalActionActions {
        if let Some(ga) = hif.node(old_scope).data.scope_lists().and_then(|sl| sl.global_action) {
            global_action_actions_mut(hif, ga).retain(|x| *x != id);
        }
    } else if let Some(sl) = hif.node_mut(old_scope).data.scope_lists_mut()
        && let Some(v) = scope_list_mut(sl, list) {
            v.retain(|x| *x != id);
        }

    if let Some(name) = hif.node(id).data.decl_name().map(str::to_string)
        && !name.is_empty() {
            let scope_key = format!("{}", new_scope.index());
            let base = if suffix.is_empty() {
                name.clone()
            } else {
                format!("{name}{suffix}")
            };
            let fresh = names.get_fresh_name(&base, &scope_key);
            if fresh != name {
                tracing::debug!(old = %name, new = %fresh, "renaming declaration on scope-move conflict");
                // Instances are renamed like any other declaration, but their
                // names are local: no reference in the tree points at an
                // instance by name, so there is nothing to rewrite.
                if list != ListKind::Instances {
                    for reference in sem.get_references(hif, id)? {
                        rewrite_reference(hif, reference, &fresh);
                    }
                }
                hif.node_mut(id).data.set_decl_name(fresh);
            }
        }

    hif.set_owner(id, new_scope, Some(list));
    if list == ListKind::GlobalActionActions {
        let ga = get_or_create_global_action(hif, new_scope);
        global_action_actions_mut(hif, ga).push(id);
    } else if let Some(sl) = hif.node_mut(new_scope).data.scope_lists_mut()
        && let Some(v) = scope_list_mut(sl, list) {
            v.push(id);
        }
    Ok(())
}

fn move_for_to_scope(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    names: &mut dyn NameTable,
    old_for: NodeId,
    new_scope: NodeId,
    suffix: &str,
    obj: Option<NodeId>,
) -> Result<()> {
    let inits = match &hif.node(old_for).data {
        NodeData::For(f) => f.init_declarations.clone(),
        _ => unreachable!("move_for_to_scope called on a non-For node"),
    };
    let contents = hif.alloc(NodeData::Contents(ContentsDecl {
        name: String::new(),
        scope: ScopeLists {
            declarations: inits.clone(),
            ..Default::default()
        },
    }));
    for id in &inits {
        hif.set_owner(*id, contents, Some(ListKind::Declarations));
    }
    if let NodeData::For(f) = &mut hif.node_mut(old_for).data {
        f.init_declarations.clear();
    }
    move_to_scope(hif, sem, names, contents, new_scope, suffix, obj)
}

/// Moves declarations (and sibling owned lists) from `old_scope` into
/// `new_scope`, per the per-kind-pair admissibility table. If `obj` is `Some`,
/// only that single member is moved (and it must belong to an admissible list
/// of `old_scope`); if `None`, every admissible member is moved.
///
/// Renaming is conflict-driven: a moved declaration whose name is already
/// visible in `new_scope` is renamed via `names`, with `suffix` appended to the
/// base name before a fresh name is minted, and every existing reference to it
/// (from `sem.get_references`) is rewritten in the same step so the tree never
/// observes a dangling name.
pub fn move_to_scope(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    names: &mut dyn NameTable,
    old_scope: NodeId,
    new_scope: NodeId,
    suffix: &str,
    obj: Option<NodeId>,
) -> Result<()> {
    let from_kind = hif.kind(old_scope);
    let to_kind = hif.kind(new_scope);

    if from_kind == Kind::For {
        return move_for_to_scope(hif, sem, names, old_scope, new_scope, suffix, obj);
    }

    if from_kind == Kind::Entity && to_kind == Kind::View && hif.parent(old_scope) == Some(new_scope) {
        // An entity's ports/parameters are immovable, and nothing else lives on
        // it; moving into the view that already owns it is a no-op, not an
        // error. An entity being moved into a *different* view still falls
        // through to the immovable-list error below.
        return Ok(());
    }
    if from_kind == Kind::Entity {
        return Err(Error::immovable_list("ports/parameters"));
    }

    let admissible = admissible_lists(from_kind, to_kind)
        .ok_or_else(|| Error::unsupported_scope_pair(from_kind.to_string(), to_kind.to_string()))?;

    let candidates: Vec<(ListKind, NodeId)> = match obj {
        Some(id) => {
            let slot = hif
                .get_blist(id)
                .ok_or_else(|| Error::invalid_argument("object has no owning list"))?;
            if slot.owner != old_scope {
                return Err(Error::invalid_argument("object is not owned by old_scope"));
            }
            vec![(slot.list, id)]
        }
        None => collect_scope_members(hif, old_scope),
    };

    for (list, id) in candidates {
        if !admissible.contains(&list) {
            return Err(Error::immovable_list(format!("{list:?}")));
        }
        move_one(hif, sem, names, old_scope, new_scope, list, id, suffix)?;
    }

    // View -> View also recurses into the two sub-scopes a View owns by
    // reference rather than by flat list: its `contents` (generates,
    // stateTables, instances, globalAction all live there) and its `entity`.
    // Only applies to a whole-scope move: a single `obj` was already resolved
    // to one of the flat lists above.
    if from_kind == Kind::View && to_kind == Kind::View && obj.is_none() {
        let (old_contents, old_entity) = match &hif.node(old_scope).data {
            NodeData::View(v) => (v.contents, v.entity),
            _ => unreachable!(),
        };
        let (new_contents, new_entity) = match &hif.node(new_scope).data {
            NodeData::View(v) => (v.contents, v.entity),
            _ => unreachable!(),
        };
        if let (Some(oc), Some(nc)) = (old_contents, new_contents) {
            move_to_scope(hif, sem, names, oc, nc, suffix, None)?;
        }
        if let (Some(oe), Some(ne)) = (old_entity, new_entity) {
            move_to_scope(hif, sem, names, oe, ne, suffix, None)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstDecl, LibraryDefDecl, ReferenceNode};
    use crate::nametable::SimpleNameTable;

    struct RefSemantics;
    impl LanguageSemantics for RefSemantics {
        fn get_type_for_constant(&self, _hif: &Hif, _value: NodeId) -> Result<NodeId> {
            unreachable!()
        }
        fn transform_real_to_int(&self, value: f64) -> i64 {
            value as i64
        }
        fn span_get_bitwidth(&self, _hif: &Hif, _span: NodeId) -> Result<u64> {
            Ok(0)
        }
        fn type_get_total_span_size(&self, _hif: &Hif, _ty: NodeId) -> Result<u64> {
            Ok(0)
        }
        fn type_get_span_bitwidth(&self, _hif: &Hif, _ty: NodeId) -> Result<u64> {
            Ok(0)
        }
        fn type_is_signed(&self, _hif: &Hif, _ty: NodeId) -> bool {
            false
        }
        fn type_is_logic(&self, _hif: &Hif, _ty: NodeId) -> bool {
            false
        }
        fn type_is_resolved(&self, _hif: &Hif, _ty: NodeId) -> bool {
            false
        }
        fn type_is_constexpr(&self, _hif: &Hif, _ty: NodeId) -> bool {
            false
        }
        fn get_semantic_type(&self, _hif: &Hif, _obj: NodeId) -> Result<NodeId> {
            unreachable!()
        }
        fn get_declaration(&self, _hif: &Hif, _obj: NodeId) -> Result<NodeId> {
            unreachable!()
        }
        fn get_references(&self, hif: &Hif, declaration: NodeId) -> Result<Vec<NodeId>> {
            let target = hif.node(declaration).data.decl_name().unwrap_or("").to_string();
            let mut out = Vec::new();
            for idx in hif.iter_indices() {
                if let NodeData::Reference(r) = &hif.node(idx).data
                    && r.name == target {
                        out.push(idx);
                    }
            }
            Ok(out)
        }
    }

    #[test]
    fn rename_on_conflict_rewrites_references() {
        let mut hif = Hif::new();

        let c1 = hif.alloc(NodeData::Const(ConstDecl {
            name: "c".into(),
            ty: None,
            value: None,
        }));
        let l1 = hif.alloc(NodeData::LibraryDef(LibraryDefDecl {
            name: "L1".into(),
            scope: ScopeLists {
                declarations: vec![c1],
                ..Default::default()
            },
        }));
        hif.set_owner(c1, l1, Some(ListKind::Declarations));

        let c2 = hif.alloc(NodeData::Const(ConstDecl {
            name: "c".into(),
            ty: None,
            value: None,
        }));
        let reference = hif.alloc(NodeData::Reference(ReferenceNode { name: "c".into() }));
        let l2 = hif.alloc(NodeData::LibraryDef(LibraryDefDecl {
            name: "L2".into(),
            scope: ScopeLists {
                declarations: vec![c2],
                ..Default::default()
            },
        }));
        hif.set_owner(c2, l2, Some(ListKind::Declarations));
        hif.set_owner(reference, c1, None);

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        names.occupy(&format!("{}", l2.index()), "c");

        move_to_scope(&mut hif, &sem, &mut names, l1, l2, "", Some(c1)).unwrap();

        assert_eq!(hif.node(c1).data.decl_name(), Some("c_0"));
        match &hif.node(reference).data {
            NodeData::Reference(r) => assert_eq!(r.name, "c_0"),
            _ => panic!("expected Reference"),
        }
        let l2_decls = match &hif.node(l2).data {
            NodeData::LibraryDef(d) => d.scope.declarations.clone(),
            _ => panic!(),
        };
        assert!(l2_decls.contains(&c1));
        let l1_decls = match &hif.node(l1).data {
            NodeData::LibraryDef(d) => d.scope.declarations.clone(),
            _ => panic!(),
        };
        assert!(l1_decls.is_empty());
    }

    #[test]
    fn instance_rename_on_conflict_does_not_rewrite_references() {
        use crate::ir::InstanceNode;

        let mut hif = Hif::new();
        let i1 = hif.alloc(NodeData::Instance(InstanceNode {
            name: "u".into(),
            reference_name: "adder".into(),
            port_assigns: vec![],
            parameter_assigns: vec![],
        }));
        let c1 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: "C1".into(),
            scope: ScopeLists {
                instances: vec![i1],
                ..Default::default()
            },
        }));
        hif.set_owner(i1, c1, Some(ListKind::Instances));

        let i2 = hif.alloc(NodeData::Instance(InstanceNode {
            name: "u".into(),
            reference_name: "adder".into(),
            port_assigns: vec![],
            parameter_assigns: vec![],
        }));
        let reference = hif.alloc(NodeData::Reference(ReferenceNode { name: "u".into() }));
        let c2 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: "C2".into(),
            scope: ScopeLists {
                instances: vec![i2],
                ..Default::default()
            },
        }));
        hif.set_owner(i2, c2, Some(ListKind::Instances));
        hif.set_owner(reference, i1, None);

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        names.occupy(&format!("{}", c2.index()), "u");

        move_to_scope(&mut hif, &sem, &mut names, c1, c2, "", Some(i1)).unwrap();

        assert_eq!(hif.node(i1).data.decl_name(), Some("u_0"));
        match &hif.node(reference).data {
            NodeData::Reference(r) => assert_eq!(r.name, "u"),
            _ => panic!("expected Reference"),
        }
    }

    #[test]
    fn global_action_actions_move_and_auto_create_on_target() {
        use crate::ir::GlobalActionNode;

        let mut hif = Hif::new();
        let action = hif.alloc(NodeData::Null);
        let ga = hif.alloc(NodeData::GlobalAction(GlobalActionNode { actions: vec![action] }));
        let c1 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: "C1".into(),
            scope: ScopeLists {
                global_action: Some(ga),
                ..Default::default()
            },
        }));
        hif.set_owner(action, ga, None);

        let c2 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: "C2".into(),
            scope: ScopeLists::default(),
        }));

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        move_to_scope(&mut hif, &sem, &mut names, c1, c2, "", None).unwrap();

        let c1_scope = match &hif.node(c1).data {
            NodeData::Contents(d) => d.scope.global_action,
            _ => panic!(),
        };
        assert!(hif.node(c1_scope.unwrap()).data.clone().kind() == Kind::GlobalAction);
        match &hif.node(c1_scope.unwrap()).data {
            NodeData::GlobalAction(g) => assert!(g.actions.is_empty()),
            _ => panic!(),
        }

        let c2_ga = match &hif.node(c2).data {
            NodeData::Contents(d) => d.scope.global_action,
            _ => panic!(),
        };
        let c2_ga = c2_ga.expect("target scope auto-creates a GlobalAction");
        match &hif.node(c2_ga).data {
            NodeData::GlobalAction(g) => assert_eq!(g.actions, vec![action]),
            _ => panic!(),
        }
    }

    #[test]
    fn view_to_view_recurses_into_contents() {
        use crate::ir::ViewDecl;

        let mut hif = Hif::new();

        let c1 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: String::new(),
            scope: ScopeLists::default(),
        }));
        let gen1 = hif.alloc(NodeData::Null);
        if let NodeData::Contents(d) = &mut hif.node_mut(c1).data {
            d.scope.generates.push(gen1);
        }
        hif.set_owner(gen1, c1, Some(ListKind::Generates));

        let v1 = hif.alloc(NodeData::View(ViewDecl {
            name: "V1".into(),
            contents: Some(c1),
            entity: None,
            scope: ScopeLists::default(),
        }));
        hif.set_owner(c1, v1, None);

        let c2 = hif.alloc(NodeData::Contents(ContentsDecl {
            name: String::new(),
            scope: ScopeLists::default(),
        }));
        let v2 = hif.alloc(NodeData::View(ViewDecl {
            name: "V2".into(),
            contents: Some(c2),
            entity: None,
            scope: ScopeLists::default(),
        }));
        hif.set_owner(c2, v2, None);

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        move_to_scope(&mut hif, &sem, &mut names, v1, v2, "", None).unwrap();

        let c2_generates = match &hif.node(c2).data {
            NodeData::Contents(d) => d.scope.generates.clone(),
            _ => panic!(),
        };
        assert_eq!(c2_generates, vec![gen1]);
    }

    #[test]
    fn view_to_view_entity_recursion_is_fatal_across_distinct_entities() {
        use crate::ir::{EntityDecl, ViewDecl};

        let mut hif = Hif::new();

        let e1 = hif.alloc(NodeData::Entity(EntityDecl {
            name: String::new(),
            ports: vec![],
            parameters: vec![],
        }));
        let v1 = hif.alloc(NodeData::View(ViewDecl {
            name: "V1".into(),
            contents: None,
            entity: Some(e1),
            scope: ScopeLists::default(),
        }));
        hif.set_owner(e1, v1, None);

        let e2 = hif.alloc(NodeData::Entity(EntityDecl {
            name: String::new(),
            ports: vec![],
            parameters: vec![],
        }));
        let v2 = hif.alloc(NodeData::View(ViewDecl {
            name: "V2".into(),
            contents: None,
            entity: Some(e2),
            scope: ScopeLists::default(),
        }));
        hif.set_owner(e2, v2, None);

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        let err = move_to_scope(&mut hif, &sem, &mut names, v1, v2, "", None).unwrap_err();
        assert_eq!(err.kind(), hif_error::ErrorKind::ImmovableList);
    }

    #[test]
    fn entity_to_view_is_no_op_only_for_its_own_parent_view() {
        let mut hif = Hif::new();
        let e1 = hif.alloc(NodeData::Entity(crate::ir::EntityDecl {
            name: "e1".into(),
            ports: vec![],
            parameters: vec![],
        }));
        let owning_view = hif.alloc(NodeData::View(crate::ir::ViewDecl {
            name: "owner".into(),
            contents: None,
            entity: None,
            scope: ScopeLists::default(),
        }));
        hif.set_owner(e1, owning_view, None);

        let other_view = hif.alloc(NodeData::View(crate::ir::ViewDecl {
            name: "other".into(),
            contents: None,
            entity: None,
            scope: ScopeLists::default(),
        }));

        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        move_to_scope(&mut hif, &sem, &mut names, e1, owning_view, "", None).unwrap();

        let err = move_to_scope(&mut hif, &sem, &mut names, e1, other_view, "", None).unwrap_err();
        assert_eq!(err.kind(), hif_error::ErrorKind::ImmovableList);
    }

    #[test]
    fn entity_ports_are_immovable() {
        let mut hif = Hif::new();
        let e1 = hif.alloc(NodeData::Entity(crate::ir::EntityDecl {
            name: "e1".into(),
            ports: vec![],
            parameters: vec![],
        }));
        let e2 = hif.alloc(NodeData::Entity(crate::ir::EntityDecl {
            name: "e2".into(),
            ports: vec![],
            parameters: vec![],
        }));
        let sem = RefSemantics;
        let mut names = SimpleNameTable::new();
        let err = move_to_scope(&mut hif, &sem, &mut names, e1, e2, "", None).unwrap_err();
        assert_eq!(err.kind(), hif_error::ErrorKind::ImmovableList);
    }
}
