use clap::{Parser, Subcommand};
use hif_core::ir::{
    BitConstant, BitType, BitvectorType, BitvectorValueNode, ConstDecl, Direction,
    Hif, IntValueNode, LibraryDefDecl, ListKind, NodeData, RangeNode, ReferenceNode,
    ScopeLists,
};
use hif_core::nametable::SimpleNameTable;
use hif_core::semantics::LanguageSemantics;
use hif_core::transform::TransformPolicy;
use hif_core::{compare, move_to_scope, transform_constant, NodeId};

#[derive(Parser, Debug)]
#[command(name = "hif", about = "Demo driver for the hif-core IR engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two built-in sample constants and print the ordering.
    Compare,
    /// Truncate a sample bit vector into a narrower target type.
    Transform,
    /// Move a sample declaration between two library scopes, renaming on conflict.
    MoveToScope,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compare => run_compare(),
        Command::Transform => run_transform(),
        Command::MoveToScope => run_move_to_scope(),
    };

    if let Err(err) = result {
        tracing::error!(%err, "command failed");
        std::process::exit(1);
    }
}

fn run_compare() -> hif_error::Result<()> {
    let mut hif = Hif::new();
    let a = hif.alloc(NodeData::IntValue(IntValueNode { value: 3, ty: None }));
    let b = hif.alloc(NodeData::IntValue(IntValueNode { value: 7, ty: None }));
    let ordering = compare(&hif, a, b)?;
    println!("compare(IntValue(3), IntValue(7)) = {ordering}");
    Ok(())
}

fn run_transform() -> hif_error::Result<()> {
    let mut hif = Hif::new();
    let src_left = hif.alloc(NodeData::IntValue(IntValueNode { value: 7, ty: None }));
    let src_right = hif.alloc(NodeData::IntValue(IntValueNode { value: 0, ty: None }));
    let src_span = hif.alloc(NodeData::Range(RangeNode {
        direction: Direction::Downto,
        left_bound: src_left,
        right_bound: src_right,
        ty: None,
    }));
    let src_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
        span: src_span,
        logic: false,
        resolved: false,
        signed: false,
        constexpr: true,
    }));
    let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
        value: "11110000".into(),
        ty: Some(src_ty),
    }));

    let dst_left = hif.alloc(NodeData::IntValue(IntValueNode { value: 3, ty: None }));
    let dst_right = hif.alloc(NodeData::IntValue(IntValueNode { value: 0, ty: None }));
    let dst_span = hif.alloc(NodeData::Range(RangeNode {
        direction: Direction::Downto,
        left_bound: dst_left,
        right_bound: dst_right,
        ty: None,
    }));
    let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
        span: dst_span,
        logic: false,
        resolved: false,
        signed: false,
        constexpr: true,
    }));

    let sem = DemoSemantics;
    let policy = TransformPolicy {
        allow_truncation: true,
        required_const_value: true,
    };
    let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy)?;
    match &hif.node(result).data {
        NodeData::BitvectorValue(v) => println!("\"11110000\" truncated to width 4 -> \"{}\"", v.value),
        _ => unreachable!(),
    }
    Ok(())
}

fn run_move_to_scope() -> hif_error::Result<()> {
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

    let sem = DemoSemantics;
    let mut names = SimpleNameTable::new();
    names.occupy(&format!("{}", l2.index()), "c");

    move_to_scope(&mut hif, &sem, &mut names, l1, l2, "", Some(c1))?;

    let renamed = hif.node(c1).data.decl_name().unwrap_or("<unnamed>").to_string();
    println!("L1's \"c\" moved into L2 (which already had a \"c\") -> renamed to \"{renamed}\"");
    Ok(())
}

/// Minimal [`LanguageSemantics`] sufficient to drive the demo commands above;
/// a real front end supplies its own implementation backed by its type checker.
struct DemoSemantics;

impl LanguageSemantics for DemoSemantics {
    fn get_type_for_constant(&self, hif: &Hif, value: NodeId) -> hif_error::Result<NodeId> {
        match &hif.node(value).data {
            NodeData::BitValue(v) => v.ty.ok_or_else(|| hif_error::Error::invalid_argument("untyped value")),
            NodeData::BitvectorValue(v) => v.ty.ok_or_else(|| hif_error::Error::invalid_argument("untyped value")),
            NodeData::IntValue(v) => v.ty.ok_or_else(|| hif_error::Error::invalid_argument("untyped value")),
            _ => Err(hif_error::Error::not_implemented("get_type_for_constant for this kind")),
        }
    }

    fn transform_real_to_int(&self, value: f64) -> i64 {
        value.round() as i64
    }

    fn span_get_bitwidth(&self, hif: &Hif, span: NodeId) -> hif_error::Result<u64> {
        match &hif.node(span).data {
            NodeData::Range(RangeNode {
                left_bound,
                right_bound,
                ..
            }) => {
                let l = match &hif.node(*left_bound).data {
                    NodeData::IntValue(v) => v.value,
                    _ => 0,
                };
                let r = match &hif.node(*right_bound).data {
                    NodeData::IntValue(v) => v.value,
                    _ => 0,
                };
                Ok((l - r).unsigned_abs() + 1)
            }
            _ => Err(hif_error::Error::invalid_argument("not a Range")),
        }
    }

    fn type_get_total_span_size(&self, hif: &Hif, ty: NodeId) -> hif_error::Result<u64> {
        self.type_get_span_bitwidth(hif, ty)
    }

    fn type_get_span_bitwidth(&self, hif: &Hif, ty: NodeId) -> hif_error::Result<u64> {
        match &hif.node(ty).data {
            NodeData::Bitvector(BitvectorType { span, .. }) => self.span_get_bitwidth(hif, *span),
            _ => Ok(1),
        }
    }

    fn type_is_signed(&self, hif: &Hif, ty: NodeId) -> bool {
        matches!(&hif.node(ty).data, NodeData::Bitvector(BitvectorType { signed, .. }) if *signed)
    }

    fn type_is_logic(&self, hif: &Hif, ty: NodeId) -> bool {
        matches!(&hif.node(ty).data, NodeData::Bit(BitType { logic, .. }) if *logic)
    }

    fn type_is_resolved(&self, _hif: &Hif, _ty: NodeId) -> bool {
        false
    }

    fn type_is_constexpr(&self, _hif: &Hif, _ty: NodeId) -> bool {
        true
    }

    fn get_semantic_type(&self, hif: &Hif, obj: NodeId) -> hif_error::Result<NodeId> {
        self.get_type_for_constant(hif, obj)
    }

    fn get_declaration(&self, _hif: &Hif, _obj: NodeId) -> hif_error::Result<NodeId> {
        Err(hif_error::Error::not_implemented("get_declaration"))
    }

    fn get_references(&self, hif: &Hif, declaration: NodeId) -> hif_error::Result<Vec<NodeId>> {
        let target = hif.node(declaration).data.decl_name().unwrap_or("").to_string();
        let mut out = Vec::new();
        for id in hif.iter_indices() {
            if let NodeData::Reference(r) = &hif.node(id).data
                && r.name == target {
                    out.push(id);
                }
        }
        Ok(out)
    }
}

#[allow(dead_code)]
fn bit_literal(b: BitConstant) -> char {
    b.to_char()
}
