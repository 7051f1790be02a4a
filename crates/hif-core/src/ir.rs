//! The HIF node universe: a closed, ~90-variant intermediate representation for
//! hardware descriptions (VHDL, Verilog, SystemC) plus the canonical HIF form.
//!
//! # Architecture
//!
//! Every node lives in a single [`Hif`] arena and is addressed by [`NodeId`], a
//! non-owning index. Ownership is tree-shaped: each node has at most one parent,
//! recorded both structurally (the node sits in one of the parent's owning lists
//! or named fields) and as an explicit back-reference (`Node::parent`) that must
//! always agree with it. A bump/typed arena (as used elsewhere in this codebase
//! for read-only trees) cannot express this: scope-moving and renaming mutate the
//! tree in place, so nodes live in a plain growable `Vec` instead, indexed by
//! generation-free `NodeId`.
//!
//! # Node Access Patterns
//! - [`Node::kind`] returns the runtime discriminator used by the visitor substrate.
//! - [`NodeData`] is the tagged union of all per-kind payloads.
//! - Scope-owning kinds embed a [`ScopeLists`] for their named ordered sublists.

use std::num::NonZeroU32;

use strum_macros::{Display, EnumIter};

/// Non-owning reference to a node in a [`Hif`] arena. Index 0 is never allocated,
/// so `Option<NodeId>` is the same size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    fn new(index: u32) -> Self {
        Self(NonZeroU32::new(index).expect("NodeId index must be nonzero"))
    }

    /// The raw arena index, for diagnostics and tests.
    pub fn index(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed enumeration of IR node kinds. This is the dispatch universe for the
/// visitor substrate, the comparator's object-order ranking, and the scope mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Kind {
    Aggregate,
    AggregateAlt,
    Alias,
    Array,
    Assign,
    Bit,
    BitValue,
    Bitvector,
    BitvectorValue,
    Bool,
    BoolValue,
    Break,
    Cast,
    Char,
    CharValue,
    Const,
    Contents,
    Continue,
    DesignUnit,
    Entity,
    Enum,
    EnumValue,
    Event,
    Expression,
    Field,
    FieldReference,
    File,
    For,
    ForGenerate,
    Function,
    FunctionCall,
    GlobalAction,
    Identifier,
    If,
    IfAlt,
    IfGenerate,
    Instance,
    Int,
    IntValue,
    Library,
    LibraryDef,
    Member,
    Null,
    Parameter,
    ParameterAssign,
    Pointer,
    Port,
    PortAssign,
    Procedure,
    ProcedureCall,
    Range,
    Real,
    RealValue,
    Record,
    RecordValue,
    RecordValueAlt,
    Reference,
    Return,
    Signal,
    Signed,
    Slice,
    State,
    StateTable,
    String,
    StringValue,
    Switch,
    SwitchAlt,
    System,
    Time,
    TimeValue,
    Transition,
    TypeDef,
    TypeReference,
    TypeTP,
    TypeTPAssign,
    Unsigned,
    ValueStatement,
    ValueTP,
    ValueTPAssign,
    Variable,
    View,
    ViewReference,
    Wait,
    When,
    WhenAlt,
    While,
    With,
    WithAlt,
}

/// Span direction, part of the public contract of every array/bitvector operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upto,
    Downto,
}

/// The nine-valued bit symbol set plus don't-care, per IEEE 1164.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitConstant {
    Zero,
    One,
    X,
    Z,
    U,
    W,
    L,
    H,
    DontCare,
}

impl BitConstant {
    pub fn to_char(self) -> char {
        match self {
            BitConstant::Zero => '0',
            BitConstant::One => '1',
            BitConstant::X => 'X',
            BitConstant::Z => 'Z',
            BitConstant::U => 'U',
            BitConstant::W => 'W',
            BitConstant::L => 'L',
            BitConstant::H => 'H',
            BitConstant::DontCare => '-',
        }
    }

    /// Parses a single character using the table in the glossary; `?` is accepted
    /// as a don't-care synonym alongside `-`.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0' => BitConstant::Zero,
            '1' => BitConstant::One,
            'X' | 'x' => BitConstant::X,
            'Z' | 'z' => BitConstant::Z,
            'U' | 'u' => BitConstant::U,
            'W' | 'w' => BitConstant::W,
            'L' | 'l' => BitConstant::L,
            'H' | 'h' => BitConstant::H,
            '-' | '?' => BitConstant::DontCare,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    Sec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    In,
    Out,
    Inout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    And,
    Or,
    Not,
    Xor,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    Concat,
}

/// Identifies which of a scope's owning lists a node currently belongs to; mirrors
/// `getBList()` from the original design. `None` means the node is not list-owned
/// (e.g. it sits in a single named field such as `Cast::value`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Declarations,
    Generates,
    StateTables,
    Instances,
    Libraries,
    TemplateParameters,
    Inheritances,
    Ports,
    Parameters,
    GlobalActionActions,
    Alts,
    Indices,
    Sensitivity,
    Other,
}

/// Records which owning list (of which parent) a node sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListSlot {
    pub owner: NodeId,
    pub list: ListKind,
}

/// The four named ordered sublists (plus a nullable global action) shared by every
/// scope-owning node kind: `BaseContents`/`Contents`, `View`, `Entity`, `LibraryDef`,
/// `StateTable`, `Function`/`Procedure`, and `For`.
#[derive(Debug, Clone, Default)]
pub struct ScopeLists {
    pub declarations: Vec<NodeId>,
    pub generates: Vec<NodeId>,
    pub state_tables: Vec<NodeId>,
    pub instances: Vec<NodeId>,
    pub libraries: Vec<NodeId>,
    pub template_parameters: Vec<NodeId>,
    pub inheritances: Vec<NodeId>,
    /// Nullable `GlobalAction`; auto-created by the scope mover when needed.
    pub global_action: Option<NodeId>,
}

// ////////////////////////////////////////////////////////////////////////////
// Values
// ////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct BitValueNode {
    pub value: BitConstant,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BitvectorValueNode {
    /// Bit string, left-to-right in the declared span direction.
    pub value: String,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BoolValueNode {
    pub value: bool,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct IntValueNode {
    pub value: i64,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct RealValueNode {
    pub value: f64,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CharValueNode {
    pub value: char,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct StringValueNode {
    pub value: String,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TimeValueNode {
    pub value: f64,
    pub unit: TimeUnit,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordValueNode {
    pub alts: Vec<NodeId>,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct RecordValueAltNode {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateNode {
    /// Default value applied to indices not covered by `alts` (the `others` clause).
    pub others: Option<NodeId>,
    pub alts: Vec<NodeId>,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct AggregateAltNode {
    pub indices: Vec<NodeId>,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct ExpressionNode {
    pub operator: Operator,
    pub value1: NodeId,
    pub value2: Option<NodeId>,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionCallNode {
    pub name: String,
    pub instance: Option<NodeId>,
    pub parameter_assigns: Vec<NodeId>,
    pub template_parameter_assigns: Vec<NodeId>,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CastNode {
    pub ty: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct IdentifierNode {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ReferenceNode {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FieldReferenceNode {
    pub prefix: NodeId,
    pub field: String,
}

#[derive(Debug, Clone)]
pub struct MemberNode {
    pub prefix: NodeId,
    pub index: NodeId,
}

#[derive(Debug, Clone)]
pub struct SliceNode {
    pub prefix: NodeId,
    pub span: NodeId,
}

#[derive(Debug, Clone)]
pub struct RangeNode {
    pub direction: Direction,
    pub left_bound: NodeId,
    pub right_bound: NodeId,
    pub ty: Option<NodeId>,
}

// ////////////////////////////////////////////////////////////////////////////
// Types
// ////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default)]
pub struct BitType {
    pub logic: bool,
    pub resolved: bool,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct BitvectorType {
    pub span: NodeId,
    pub logic: bool,
    pub resolved: bool,
    pub signed: bool,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct SignedType {
    pub span: NodeId,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct UnsignedType {
    pub span: NodeId,
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BoolType {
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct IntType {
    pub span: NodeId,
    pub signed: bool,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct RealType {
    pub span: Option<NodeId>,
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CharType {
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StringType {
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TimeType {
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub span: NodeId,
    pub element_type: NodeId,
    pub signed: bool,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct PointerType {
    pub element_type: NodeId,
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordType {
    pub fields: Vec<NodeId>,
    pub packed: bool,
    pub is_union: bool,
    pub constexpr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EnumType {
    pub values: Vec<NodeId>,
    pub constexpr: bool,
}

#[derive(Debug, Clone)]
pub struct FileType {
    pub element_type: NodeId,
}

#[derive(Debug, Clone)]
pub struct TypeReferenceNode {
    pub name: String,
    pub template_type_assigns: Vec<NodeId>,
    pub template_value_assigns: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ViewReferenceNode {
    pub name: String,
    pub design_unit: String,
}

// ////////////////////////////////////////////////////////////////////////////
// Declarations & scopes
// ////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SignalDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct AliasDecl {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PortDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub direction: PortDirection,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDecl {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TypeDefDecl {
    pub name: String,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TypeTPDecl {
    pub name: String,
    pub ty: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ValueTPDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct ProcedureDecl {
    pub name: String,
    pub parameters: Vec<NodeId>,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct ViewDecl {
    pub name: String,
    pub contents: Option<NodeId>,
    pub entity: Option<NodeId>,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct EntityDecl {
    pub name: String,
    pub ports: Vec<NodeId>,
    pub parameters: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ContentsDecl {
    pub name: String,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct LibraryDefDecl {
    pub name: String,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct DesignUnitDecl {
    pub name: String,
    pub views: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SystemDecl {
    pub design_units: Vec<NodeId>,
    pub libraries: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct StateTableDecl {
    pub name: String,
    pub states: Vec<NodeId>,
    pub sensitivity: Vec<NodeId>,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct StateNode {
    pub name: String,
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct LibraryNode {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct InstanceNode {
    pub name: String,
    pub reference_name: String,
    pub port_assigns: Vec<NodeId>,
    pub parameter_assigns: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ForNode {
    pub name: String,
    /// Loop initializers; moved into a synthetic `Contents` when relocated to a
    /// plain `Scope` (see `scope_mover`).
    pub init_declarations: Vec<NodeId>,
    pub condition: Option<NodeId>,
    pub step: Option<NodeId>,
    pub actions: Vec<NodeId>,
}

// ////////////////////////////////////////////////////////////////////////////
// Actions & statements
// ////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct AssignNode {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct IfNode {
    pub alts: Vec<NodeId>,
    pub default_actions: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct IfAltNode {
    pub condition: NodeId,
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SwitchNode {
    pub condition: NodeId,
    pub alts: Vec<NodeId>,
    pub default_actions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchAltNode {
    pub values: Vec<NodeId>,
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct WhenNode {
    pub alts: Vec<NodeId>,
    pub default_value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct WhenAltNode {
    pub condition: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct WithNode {
    pub condition: NodeId,
    pub alts: Vec<NodeId>,
    pub default_value: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct WithAltNode {
    pub values: Vec<NodeId>,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct WhileNode {
    pub condition: NodeId,
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct WaitNode {
    pub sensitivity: Vec<NodeId>,
    pub condition: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ReturnNode {
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ValueStatementNode {
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct GlobalActionNode {
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ForGenerateNode {
    pub name: String,
    pub init_declarations: Vec<NodeId>,
    pub condition: Option<NodeId>,
    pub step: Option<NodeId>,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone)]
pub struct IfGenerateNode {
    pub name: String,
    pub condition: NodeId,
    pub scope: ScopeLists,
}

#[derive(Debug, Clone, Default)]
pub struct ProcedureCallNode {
    pub name: String,
    pub parameter_assigns: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ParameterAssignNode {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct PortAssignNode {
    pub name: String,
    pub value: Option<NodeId>,
    pub direction: PortDirection,
}

#[derive(Debug, Clone)]
pub struct TypeTPAssignNode {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub struct ValueTPAssignNode {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct TransitionNode {
    pub from_state: String,
    pub to_state: String,
    pub condition: Option<NodeId>,
    pub actions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct EventNode {
    pub name: String,
}

// ////////////////////////////////////////////////////////////////////////////
// The tagged union and the arena
// ////////////////////////////////////////////////////////////////////////////

/// Per-kind payload for a node; the discriminant doubles as [`Kind`] for dispatch.
#[derive(Debug, Clone)]
pub enum NodeData {
    Aggregate(AggregateNode),
    AggregateAlt(AggregateAltNode),
    Alias(AliasDecl),
    Array(ArrayType),
    Assign(AssignNode),
    Bit(BitType),
    BitValue(BitValueNode),
    Bitvector(BitvectorType),
    BitvectorValue(BitvectorValueNode),
    Bool(BoolType),
    BoolValue(BoolValueNode),
    Break,
    Cast(CastNode),
    Char(CharType),
    CharValue(CharValueNode),
    Const(ConstDecl),
    Contents(ContentsDecl),
    Continue,
    DesignUnit(DesignUnitDecl),
    Entity(EntityDecl),
    Enum(EnumType),
    EnumValue(EnumValueDecl),
    Event(EventNode),
    Expression(ExpressionNode),
    Field(FieldDecl),
    FieldReference(FieldReferenceNode),
    File(FileType),
    For(ForNode),
    ForGenerate(ForGenerateNode),
    Function(FunctionDecl),
    FunctionCall(FunctionCallNode),
    GlobalAction(GlobalActionNode),
    Identifier(IdentifierNode),
    If(IfNode),
    IfAlt(IfAltNode),
    IfGenerate(IfGenerateNode),
    Instance(InstanceNode),
    Int(IntType),
    IntValue(IntValueNode),
    Library(LibraryNode),
    LibraryDef(LibraryDefDecl),
    Member(MemberNode),
    Null,
    Parameter(ParameterDecl),
    ParameterAssign(ParameterAssignNode),
    Pointer(PointerType),
    Port(PortDecl),
    PortAssign(PortAssignNode),
    Procedure(ProcedureDecl),
    ProcedureCall(ProcedureCallNode),
    Range(RangeNode),
    Real(RealType),
    RealValue(RealValueNode),
    Record(RecordType),
    RecordValue(RecordValueNode),
    RecordValueAlt(RecordValueAltNode),
    Reference(ReferenceNode),
    Return(ReturnNode),
    Signal(SignalDecl),
    Signed(SignedType),
    Slice(SliceNode),
    State(StateNode),
    StateTable(StateTableDecl),
    String(StringType),
    StringValue(StringValueNode),
    Switch(SwitchNode),
    SwitchAlt(SwitchAltNode),
    System(SystemDecl),
    Time(TimeType),
    TimeValue(TimeValueNode),
    Transition(TransitionNode),
    TypeDef(TypeDefDecl),
    TypeReference(TypeReferenceNode),
    TypeTP(TypeTPDecl),
    TypeTPAssign(TypeTPAssignNode),
    Unsigned(UnsignedType),
    ValueStatement(ValueStatementNode),
    ValueTP(ValueTPDecl),
    ValueTPAssign(ValueTPAssignNode),
    Variable(VariableDecl),
    View(ViewDecl),
    ViewReference(ViewReferenceNode),
    Wait(WaitNode),
    When(WhenNode),
    WhenAlt(WhenAltNode),
    While(WhileNode),
    With(WithNode),
    WithAlt(WithAltNode),
}

impl NodeData {
    pub fn kind(&self) -> Kind {
        match self {
            NodeData::Aggregate(_) => Kind::Aggregate,
            NodeData::AggregateAlt(_) => Kind::AggregateAlt,
            NodeData::Alias(_) => Kind::Alias,
            NodeData::Array(_) => Kind::Array,
            NodeData::Assign(_) => Kind::Assign,
            NodeData::Bit(_) => Kind::Bit,
            NodeData::BitValue(_) => Kind::BitValue,
            NodeData::Bitvector(_) => Kind::Bitvector,
            NodeData::BitvectorValue(_) => Kind::BitvectorValue,
            NodeData::Bool(_) => Kind::Bool,
            NodeData::BoolValue(_) => Kind::BoolValue,
            NodeData::Break => Kind::Break,
            NodeData::Cast(_) => Kind::Cast,
            NodeData::Char(_) => Kind::Char,
            NodeData::CharValue(_) => Kind::CharValue,
            NodeData::Const(_) => Kind::Const,
            NodeData::Contents(_) => Kind::Contents,
            NodeData::Continue => Kind::Continue,
            NodeData::DesignUnit(_) => Kind::DesignUnit,
            NodeData::Entity(_) => Kind::Entity,
            NodeData::Enum(_) => Kind::Enum,
            NodeData::EnumValue(_) => Kind::EnumValue,
            NodeData::Event(_) => Kind::Event,
            NodeData::Expression(_) => Kind::Expression,
            NodeData::Field(_) => Kind::Field,
            NodeData::FieldReference(_) => Kind::FieldReference,
            NodeData::File(_) => Kind::File,
            NodeData::For(_) => Kind::For,
            NodeData::ForGenerate(_) => Kind::ForGenerate,
            NodeData::Function(_) => Kind::Function,
            NodeData::FunctionCall(_) => Kind::FunctionCall,
            NodeData::GlobalAction(_) => Kind::GlobalAction,
            NodeData::Identifier(_) => Kind::Identifier,
            NodeData::If(_) => Kind::If,
            NodeData::IfAlt(_) => Kind::IfAlt,
            NodeData::IfGenerate(_) => Kind::IfGenerate,
            NodeData::Instance(_) => Kind::Instance,
            NodeData::Int(_) => Kind::Int,
            NodeData::IntValue(_) => Kind::IntValue,
            NodeData::Library(_) => Kind::Library,
            NodeData::LibraryDef(_) => Kind::LibraryDef,
            NodeData::Member(_) => Kind::Member,
            NodeData::Null => Kind::Null,
            NodeData::Parameter(_) => Kind::Parameter,
            NodeData::ParameterAssign(_) => Kind::ParameterAssign,
            NodeData::Pointer(_) => Kind::Pointer,
            NodeData::Port(_) => Kind::Port,
            NodeData::PortAssign(_) => Kind::PortAssign,
            NodeData::Procedure(_) => Kind::Procedure,
            NodeData::ProcedureCall(_) => Kind::ProcedureCall,
            NodeData::Range(_) => Kind::Range,
            NodeData::Real(_) => Kind::Real,
            NodeData::RealValue(_) => Kind::RealValue,
            NodeData::Record(_) => Kind::Record,
            NodeData::RecordValue(_) => Kind::RecordValue,
            NodeData::RecordValueAlt(_) => Kind::RecordValueAlt,
            NodeData::Reference(_) => Kind::Reference,
            NodeData::Return(_) => Kind::Return,
            NodeData::Signal(_) => Kind::Signal,
            NodeData::Signed(_) => Kind::Signed,
            NodeData::Slice(_) => Kind::Slice,
            NodeData::State(_) => Kind::State,
            NodeData::StateTable(_) => Kind::StateTable,
            NodeData::String(_) => Kind::String,
            NodeData::StringValue(_) => Kind::StringValue,
            NodeData::Switch(_) => Kind::Switch,
            NodeData::SwitchAlt(_) => Kind::SwitchAlt,
            NodeData::System(_) => Kind::System,
            NodeData::Time(_) => Kind::Time,
            NodeData::TimeValue(_) => Kind::TimeValue,
            NodeData::Transition(_) => Kind::Transition,
            NodeData::TypeDef(_) => Kind::TypeDef,
            NodeData::TypeReference(_) => Kind::TypeReference,
            NodeData::TypeTP(_) => Kind::TypeTP,
            NodeData::TypeTPAssign(_) => Kind::TypeTPAssign,
            NodeData::Unsigned(_) => Kind::Unsigned,
            NodeData::ValueStatement(_) => Kind::ValueStatement,
            NodeData::ValueTP(_) => Kind::ValueTP,
            NodeData::ValueTPAssign(_) => Kind::ValueTPAssign,
            NodeData::Variable(_) => Kind::Variable,
            NodeData::View(_) => Kind::View,
            NodeData::ViewReference(_) => Kind::ViewReference,
            NodeData::Wait(_) => Kind::Wait,
            NodeData::When(_) => Kind::When,
            NodeData::WhenAlt(_) => Kind::WhenAlt,
            NodeData::While(_) => Kind::While,
            NodeData::With(_) => Kind::With,
            NodeData::WithAlt(_) => Kind::WithAlt,
        }
    }

    /// Capability view: scope-owning kinds expose their [`ScopeLists`].
    pub fn scope_lists(&self) -> Option<&ScopeLists> {
        match self {
            NodeData::Contents(d) => Some(&d.scope),
            NodeData::View(d) => Some(&d.scope),
            NodeData::LibraryDef(d) => Some(&d.scope),
            NodeData::StateTable(d) => Some(&d.scope),
            NodeData::Function(d) => Some(&d.scope),
            NodeData::Procedure(d) => Some(&d.scope),
            NodeData::ForGenerate(d) => Some(&d.scope),
            NodeData::IfGenerate(d) => Some(&d.scope),
            _ => None,
        }
    }

    pub fn scope_lists_mut(&mut self) -> Option<&mut ScopeLists> {
        match self {
            NodeData::Contents(d) => Some(&mut d.scope),
            NodeData::View(d) => Some(&mut d.scope),
            NodeData::LibraryDef(d) => Some(&mut d.scope),
            NodeData::StateTable(d) => Some(&mut d.scope),
            NodeData::Function(d) => Some(&mut d.scope),
            NodeData::Procedure(d) => Some(&mut d.scope),
            NodeData::ForGenerate(d) => Some(&mut d.scope),
            NodeData::IfGenerate(d) => Some(&mut d.scope),
            _ => None,
        }
    }

    /// Declaration-like kinds expose a name; used for conflict detection and renaming.
    pub fn decl_name(&self) -> Option<&str> {
        match self {
            NodeData::Alias(d) => Some(&d.name),
            NodeData::Const(d) => Some(&d.name),
            NodeData::Signal(d) => Some(&d.name),
            NodeData::Variable(d) => Some(&d.name),
            NodeData::Parameter(d) => Some(&d.name),
            NodeData::Port(d) => Some(&d.name),
            NodeData::Field(d) => Some(&d.name),
            NodeData::EnumValue(d) => Some(&d.name),
            NodeData::TypeDef(d) => Some(&d.name),
            NodeData::TypeTP(d) => Some(&d.name),
            NodeData::ValueTP(d) => Some(&d.name),
            NodeData::Function(d) => Some(&d.name),
            NodeData::Procedure(d) => Some(&d.name),
            NodeData::View(d) => Some(&d.name),
            NodeData::Entity(d) => Some(&d.name),
            NodeData::Contents(d) => Some(&d.name),
            NodeData::LibraryDef(d) => Some(&d.name),
            NodeData::DesignUnit(d) => Some(&d.name),
            NodeData::StateTable(d) => Some(&d.name),
            NodeData::Instance(d) => Some(&d.name),
            NodeData::Library(d) => Some(&d.name),
            NodeData::For(d) => Some(&d.name),
            _ => None,
        }
    }

    pub fn set_decl_name(&mut self, name: String) {
        match self {
            NodeData::Alias(d) => d.name = name,
            NodeData::Const(d) => d.name = name,
            NodeData::Signal(d) => d.name = name,
            NodeData::Variable(d) => d.name = name,
            NodeData::Parameter(d) => d.name = name,
            NodeData::Port(d) => d.name = name,
            NodeData::Field(d) => d.name = name,
            NodeData::EnumValue(d) => d.name = name,
            NodeData::TypeDef(d) => d.name = name,
            NodeData::TypeTP(d) => d.name = name,
            NodeData::ValueTP(d) => d.name = name,
            NodeData::Function(d) => d.name = name,
            NodeData::Procedure(d) => d.name = name,
            NodeData::View(d) => d.name = name,
            NodeData::Entity(d) => d.name = name,
            NodeData::Contents(d) => d.name = name,
            NodeData::LibraryDef(d) => d.name = name,
            NodeData::DesignUnit(d) => d.name = name,
            NodeData::StateTable(d) => d.name = name,
            NodeData::Instance(d) => d.name = name,
            NodeData::Library(d) => d.name = name,
            NodeData::For(d) => d.name = name,
            _ => {}
        }
    }
}

/// A single node: its arena identity, structural placement, and payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Non-owning back-reference; must always agree with structural ownership.
    pub parent: Option<NodeId>,
    /// Which of the parent's owning lists this node sits in, if any.
    pub list: Option<ListSlot>,
    pub data: NodeData,
}

impl Node {
    pub fn kind(&self) -> Kind {
        self.data.kind()
    }
}

/// Owns every node in one IR tree (or forest, if multiple `System` roots are built
/// in the same arena). Index 0 is reserved, mirroring the convention that id 0
/// never denotes a real node.
#[derive(Debug, Default)]
pub struct Hif {
    nodes: Vec<Option<Node>>,
}

impl Hif {
    pub fn new() -> Self {
        Self {
            nodes: vec![None],
        }
    }

    /// Allocates a new node with no parent and no list placement.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let index = self.nodes.len() as u32;
        let id = NodeId::new(index);
        self.nodes.push(Some(Node {
            id,
            parent: None,
            list: None,
            data,
        }));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.index() as usize]
            .as_ref()
            .expect("dangling NodeId")
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.index() as usize]
            .as_mut()
            .expect("dangling NodeId")
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn get_blist(&self, id: NodeId) -> Option<ListSlot> {
        self.node(id).list
    }

    /// Sets the parent back-reference and list placement together, preserving the
    /// invariant that they always agree.
    pub fn set_owner(&mut self, id: NodeId, owner: NodeId, list: Option<ListKind>) {
        let node = self.node_mut(id);
        node.parent = Some(owner);
        node.list = list.map(|list| ListSlot { owner, list });
    }

    pub fn clear_owner(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.parent = None;
        node.list = None;
    }

    /// Every live `NodeId` currently allocated in this arena, in allocation order.
    pub fn iter_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId::new(i as u32)))
    }
}
