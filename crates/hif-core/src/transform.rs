//! Bit-exact coercion of constant values across hardware-typed targets.
//!
//! Every hardware description language silently narrows, widens, and
//! reinterprets constants when a value crosses a type boundary (assigning a
//! 4-bit literal to an 8-bit signal, truncating an `Integer` into a `std_logic`,
//! rounding a `Real` into an `Int`). [`transform_constant`] is the single place
//! that makes those coercions explicit and bit-exact instead of leaving them to
//! ad hoc call sites.

use crate::ir::{
    AggregateAltNode, AggregateNode, ArrayType, BitConstant, BitType, BitValueNode, BitvectorType,
    BitvectorValueNode, CharValueNode, Direction, Hif, IntType, IntValueNode, Kind, NodeData,
    NodeId, PointerType, RangeNode, RealType, RealValueNode, SignedType, StringValueNode,
    TimeUnit, TimeValueNode, UnsignedType,
};
use crate::semantics::LanguageSemantics;
use crate::Result;
use hif_error::Error;

/// No span (array, bitvector, signed/unsigned, or a `Real` stored with finite
/// precision) may exceed this many bits. Mirrors the ceiling the original
/// transformer enforces to keep bit-string materialization bounded.
pub const HIF_MAX_ALLOWED_SPAN_SIZE: u64 = 1024;

/// Governs how aggressively [`transform_constant`] may reinterpret a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformPolicy {
    /// When `false`, a coercion that would drop bits (narrowing a span, or
    /// collapsing a multi-bit value into a scalar `Bit`) is rejected instead of
    /// performed.
    pub allow_truncation: bool,
    /// When `true`, the source value must already be a literal constant (not a
    /// reference or expression); callers doing constant folding set this.
    pub required_const_value: bool,
}

/// Demotes a nine-valued logic symbol to its two-valued equivalent: `1`, `H`,
/// and `h` collapse to one; everything else (including `X`/`Z`/`U`/`W`/`L`/`-`)
/// collapses to zero.
fn demote_to_binary(b: BitConstant) -> BitConstant {
    match b {
        BitConstant::One | BitConstant::H => BitConstant::One,
        _ => BitConstant::Zero,
    }
}

fn direction_of(hif: &Hif, span: NodeId) -> Direction {
    match &hif.node(span).data {
        NodeData::Range(RangeNode { direction, .. }) => *direction,
        _ => Direction::Downto,
    }
}

/// Resizes a bit string to `new_width`, truncating or extending according to
/// `direction` and `signed`. For `downto` spans the first character is the most
/// significant bit (truncation/extension happen on the right); for `upto` spans
/// the convention is reversed.
fn resize_bits(
    bits: &str,
    new_width: usize,
    direction: Direction,
    signed: bool,
    allow_truncation: bool,
) -> Result<String> {
    let cur = bits.chars().count();
    if new_width == cur {
        return Ok(bits.to_string());
    }
    if new_width == 0 {
        return Err(Error::invalid_argument("cannot resize a span to zero width"));
    }
    if new_width < cur {
        if !allow_truncation {
            return Err(Error::new(
                hif_error::ErrorKind::TransformRejected,
                format!("narrowing {cur} bits to {new_width} requires allow_truncation"),
            ));
        }
        return Ok(match direction {
            Direction::Downto => bits[cur - new_width..].to_string(),
            Direction::Upto => bits[..new_width].to_string(),
        });
    }
    let pad = new_width - cur;
    Ok(match direction {
        Direction::Downto => {
            let sign = bits.chars().next().unwrap_or('0');
            let fill = if signed { sign } else { '0' };
            format!("{}{}", fill.to_string().repeat(pad), bits)
        }
        Direction::Upto => {
            let sign = bits.chars().last().unwrap_or('0');
            let fill = if signed { sign } else { '0' };
            format!("{}{}", bits, fill.to_string().repeat(pad))
        }
    })
}

fn bits_to_i64(bits: &str, signed: bool) -> i64 {
    let width = bits.len();
    let magnitude = u64::from_str_radix(bits, 2).unwrap_or(0);
    if signed && width > 0 && bits.starts_with('1') {
        (magnitude as i64) - (1i64 << width)
    } else {
        magnitude as i64
    }
}

fn i64_to_bits(value: i64, width: usize) -> String {
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    format!("{:0>width$b}", (value as u64) & mask, width = width)
}

fn check_span(width: u64) -> Result<()> {
    if width > HIF_MAX_ALLOWED_SPAN_SIZE {
        tracing::warn!(width, max = HIF_MAX_ALLOWED_SPAN_SIZE, "span exceeds HIF_MAX_ALLOWED_SPAN_SIZE");
        return Err(Error::span_too_wide(width, HIF_MAX_ALLOWED_SPAN_SIZE));
    }
    Ok(())
}

/// Parses a numeric string the way the VHDL/Verilog front ends do: a `b'...`
/// prefix selects a binary literal (each subsequent character contributes a bit,
/// non-`1` characters count as zero); otherwise the string is parsed as a plain
/// decimal/real literal, falling back to `0.0` on a malformed string (matching
/// the original's `stringstream` extraction, which leaves the accumulator at its
/// initial value on failure).
fn parse_numeric_string(s: &str) -> f64 {
    let bytes = s.as_bytes();
    if bytes.len() > 2 && (bytes[0] == b'b' || bytes[0] == b'B') && bytes[1] == b'\'' {
        let mut acc = 0.0f64;
        for c in s[2..].chars() {
            let d = if c == '1' { 1.0 } else { 0.0 };
            acc = 2.0 * acc + d;
        }
        return acc;
    }
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// `true` if every character is a recognized bit symbol other than `U`/`u`
/// (the original's `String -> Bitvector` gate omits the uninitialized symbol).
fn is_valid_bitvector_string(s: &str) -> bool {
    s.chars()
        .all(|c| matches!(c, '0' | '1' | 'h' | 'H' | 'l' | 'L' | 'x' | 'X' | 'z' | 'Z' | 'w' | 'W' | '-' | '?'))
}

fn int_literal(hif: &Hif, id: NodeId) -> Option<i64> {
    match &hif.node(id).data {
        NodeData::IntValue(v) => Some(v.value),
        _ => None,
    }
}

/// Coerces the constant value node `value` so that it conforms to `target_type`,
/// allocating and returning the new value node. The source value is left
/// untouched in the arena.
pub fn transform_constant(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    value: NodeId,
    target_type: NodeId,
    policy: &TransformPolicy,
) -> Result<NodeId> {
    let target_kind = hif.kind(target_type);
    let value_kind = hif.kind(value);

    // Signed/Unsigned targets are, per spec, "Bitvector with logic=true,
    // resolved=true and appropriate sign" for the purposes of resizing — but the
    // target type's own identity (and constexpr flag) must survive in the
    // result's metadata. Delegate to the Bitvector-shaped transform against a
    // throwaway type node, then rebind the result onto `target_type`.
    if matches!(target_kind, Kind::Signed | Kind::Unsigned) {
        let (span, signed, constexpr) = match &hif.node(target_type).data {
            NodeData::Signed(SignedType { span, constexpr }) => (*span, true, *constexpr),
            NodeData::Unsigned(UnsignedType { span, constexpr }) => (*span, false, *constexpr),
            _ => unreachable!(),
        };
        let temp_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span,
            logic: true,
            resolved: true,
            signed,
            constexpr,
        }));
        let result = transform_constant(hif, sem, value, temp_ty, policy)?;
        bind_type(&mut hif.node_mut(result).data, target_type);
        return Ok(result);
    }

    match (value_kind, target_kind) {
        (Kind::BitValue, Kind::Bit) => {
            let (src, target_logic) = match (&hif.node(value).data, &hif.node(target_type).data) {
                (NodeData::BitValue(v), NodeData::Bit(t)) => (v.value, t.logic),
                _ => unreachable!(),
            };
            let value = if target_logic { src } else { demote_to_binary(src) };
            Ok(hif.alloc(NodeData::BitValue(BitValueNode {
                value,
                ty: Some(target_type),
            })))
        }

        (Kind::BitvectorValue, Kind::Bit) => {
            let (bits, dir) = match &hif.node(value).data {
                NodeData::BitvectorValue(v) => {
                    let dir = match span_of_bitvector_value(hif, sem, value)? {
                        Some(span) => direction_of(hif, span),
                        None => Direction::Downto,
                    };
                    (v.value.clone(), dir)
                }
                _ => unreachable!(),
            };
            if bits.len() > 1 && !policy.allow_truncation {
                return Err(Error::new(
                    hif_error::ErrorKind::TransformRejected,
                    format!("collapsing a {}-bit vector into a scalar Bit requires allow_truncation", bits.len()),
                ));
            }
            let picked = match dir {
                Direction::Downto => bits.chars().last(),
                Direction::Upto => bits.chars().next(),
            }
            .and_then(BitConstant::from_char)
            .unwrap_or(BitConstant::X);
            let target_logic = matches!(&hif.node(target_type).data, NodeData::Bit(BitType { logic, .. }) if *logic);
            let value = if target_logic { picked } else { demote_to_binary(picked) };
            Ok(hif.alloc(NodeData::BitValue(BitValueNode {
                value,
                ty: Some(target_type),
            })))
        }

        (Kind::IntValue, Kind::Bit) => {
            let v = match &hif.node(value).data {
                NodeData::IntValue(v) => v.value,
                _ => unreachable!(),
            };
            if !policy.allow_truncation {
                return Err(Error::new(
                    hif_error::ErrorKind::TransformRejected,
                    "collapsing an Int into a scalar Bit requires allow_truncation",
                ));
            }
            let bit = if v & 1 == 1 { BitConstant::One } else { BitConstant::Zero };
            let target_logic = matches!(&hif.node(target_type).data, NodeData::Bit(BitType { logic, .. }) if *logic);
            let bit = if target_logic { bit } else { demote_to_binary(bit) };
            Ok(hif.alloc(NodeData::BitValue(BitValueNode {
                value: bit,
                ty: Some(target_type),
            })))
        }

        (Kind::BoolValue, Kind::Bit) => {
            let v = match &hif.node(value).data {
                NodeData::BoolValue(v) => v.value,
                _ => unreachable!(),
            };
            let bit = if v { BitConstant::One } else { BitConstant::Zero };
            Ok(hif.alloc(NodeData::BitValue(BitValueNode {
                value: bit,
                ty: Some(target_type),
            })))
        }

        (Kind::CharValue, Kind::Bit) => {
            let c = match &hif.node(value).data {
                NodeData::CharValue(v) => v.value,
                _ => unreachable!(),
            };
            let bit = BitConstant::from_char(c)
                .ok_or_else(|| Error::invalid_argument(format!("'{c}' is not a recognized bit symbol")))?;
            Ok(hif.alloc(NodeData::BitValue(BitValueNode {
                value: bit,
                ty: Some(target_type),
            })))
        }

        (Kind::BitValue, Kind::Char) => {
            let v = match &hif.node(value).data {
                NodeData::BitValue(v) => v.value,
                _ => unreachable!(),
            };
            Ok(hif.alloc(NodeData::CharValue(CharValueNode {
                value: v.to_char(),
                ty: Some(target_type),
            })))
        }

        (Kind::BitValue, Kind::Bool) => {
            let v = match &hif.node(value).data {
                NodeData::BitValue(v) => v.value,
                _ => unreachable!(),
            };
            let demoted = demote_to_binary(v);
            if demoted != v && !policy.allow_truncation {
                return Err(Error::new(
                    hif_error::ErrorKind::TransformRejected,
                    "logic demotion to Bool requires allow_truncation",
                ));
            }
            Ok(hif.alloc(NodeData::BoolValue(crate::ir::BoolValueNode {
                value: demoted == BitConstant::One,
                ty: Some(target_type),
            })))
        }

        (Kind::BitValue, Kind::Bitvector) => {
            let src = match &hif.node(value).data {
                NodeData::BitValue(v) => v.value,
                _ => unreachable!(),
            };
            let (span, _signed) = match &hif.node(target_type).data {
                NodeData::Bitvector(BitvectorType { span, signed, .. }) => (*span, *signed),
                _ => unreachable!(),
            };
            let width = sem.span_get_bitwidth(hif, span)?;
            check_span(width)?;
            let bits = src.to_char().to_string().repeat(width as usize);
            Ok(hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
                value: bits,
                ty: Some(target_type),
            })))
        }

        (Kind::BitvectorValue, Kind::Bitvector) => {
            let bits = match &hif.node(value).data {
                NodeData::BitvectorValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let (span, signed) = match &hif.node(target_type).data {
                NodeData::Bitvector(BitvectorType { span, signed, .. }) => (*span, *signed),
                _ => unreachable!(),
            };
            let width = sem.span_get_bitwidth(hif, span)?;
            check_span(width)?;
            let dir = direction_of(hif, span);
            let resized = resize_bits(&bits, width as usize, dir, signed, policy.allow_truncation)?;
            Ok(hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
                value: resized,
                ty: Some(target_type),
            })))
        }

        (Kind::IntValue, Kind::Bitvector) => {
            let v = match &hif.node(value).data {
                NodeData::IntValue(v) => v.value,
                _ => unreachable!(),
            };
            let (span, signed) = match &hif.node(target_type).data {
                NodeData::Bitvector(BitvectorType { span, signed, .. }) => (*span, *signed),
                _ => unreachable!(),
            };
            let width = sem.span_get_bitwidth(hif, span)?;
            check_span(width)?;
            let natural_width = 64 - (v.unsigned_abs().leading_zeros() as u64).min(63);
            if natural_width > width && !policy.allow_truncation {
                return Err(Error::new(
                    hif_error::ErrorKind::TransformRejected,
                    format!("Int value {v} does not fit in {width} bits without allow_truncation"),
                ));
            }
            let bits = i64_to_bits(v, width as usize);
            let _ = signed;
            Ok(hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
                value: bits,
                ty: Some(target_type),
            })))
        }

        (Kind::StringValue, Kind::Bitvector) => {
            let s = match &hif.node(value).data {
                NodeData::StringValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            if !is_valid_bitvector_string(&s) {
                return Err(Error::invalid_argument(format!(
                    "\"{s}\" contains characters not valid in a Bitvector literal"
                )));
            }
            let tmp = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode { value: s, ty: None }));
            transform_constant(hif, sem, tmp, target_type, policy)
        }

        (Kind::BitvectorValue, Kind::Int) => {
            let bits = match &hif.node(value).data {
                NodeData::BitvectorValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let signed = matches!(&hif.node(target_type).data, NodeData::Int(IntType { signed, .. }) if *signed);
            Ok(hif.alloc(NodeData::IntValue(IntValueNode {
                value: bits_to_i64(&bits, signed),
                ty: Some(target_type),
            })))
        }

        (Kind::BitValue, Kind::Int) => {
            let v = match &hif.node(value).data {
                NodeData::BitValue(v) => v.value,
                _ => unreachable!(),
            };
            let demoted = demote_to_binary(v);
            Ok(hif.alloc(NodeData::IntValue(IntValueNode {
                value: if demoted == BitConstant::One { 1 } else { 0 },
                ty: Some(target_type),
            })))
        }

        (Kind::IntValue, Kind::Int) => {
            let v = match &hif.node(value).data {
                NodeData::IntValue(v) => v.value,
                _ => unreachable!(),
            };
            let (span, signed) = match &hif.node(target_type).data {
                NodeData::Int(IntType { span, signed, .. }) => (*span, *signed),
                _ => unreachable!(),
            };
            let width = sem.span_get_bitwidth(hif, span)?;
            if width == 0 || width >= 64 {
                return Ok(hif.alloc(NodeData::IntValue(IntValueNode { value: v, ty: Some(target_type) })));
            }
            let mask = (1u64 << width) - 1;
            let mut masked = (v as u64) & mask;
            let msb = (masked >> (width - 1)) & 1 == 1;
            let result = if signed && msb {
                let sign_mask = !0u64 << width;
                (masked | sign_mask) as i64
            } else {
                masked as i64
            };
            let _ = &mut masked;
            if result != v && !policy.allow_truncation {
                return Err(Error::new(
                    hif_error::ErrorKind::TransformRejected,
                    format!("Int value {v} does not fit in {width} bits without allow_truncation"),
                ));
            }
            Ok(hif.alloc(NodeData::IntValue(IntValueNode {
                value: result,
                ty: Some(target_type),
            })))
        }

        (Kind::StringValue, Kind::Int) => {
            let s = match &hif.node(value).data {
                NodeData::StringValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let d = parse_numeric_string(&s);
            let tmp = hif.alloc(NodeData::RealValue(RealValueNode { value: d, ty: None }));
            transform_constant(hif, sem, tmp, target_type, policy)
        }

        (Kind::RealValue, Kind::Int) => {
            let v = match &hif.node(value).data {
                NodeData::RealValue(v) => v.value,
                _ => unreachable!(),
            };
            let as_int = sem.transform_real_to_int(v);
            Ok(hif.alloc(NodeData::IntValue(IntValueNode {
                value: as_int,
                ty: Some(target_type),
            })))
        }

        (Kind::IntValue, Kind::Real) => {
            let v = match &hif.node(value).data {
                NodeData::IntValue(v) => v.value,
                _ => unreachable!(),
            };
            Ok(hif.alloc(NodeData::RealValue(RealValueNode {
                value: v as f64,
                ty: Some(target_type),
            })))
        }

        (Kind::StringValue, Kind::Real) => {
            let s = match &hif.node(value).data {
                NodeData::StringValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let d = parse_numeric_string(&s);
            Ok(hif.alloc(NodeData::RealValue(RealValueNode {
                value: d,
                ty: Some(target_type),
            })))
        }

        (Kind::RealValue, Kind::Real) => {
            let v = match &hif.node(value).data {
                NodeData::RealValue(v) => v.value,
                _ => unreachable!(),
            };
            let span = match &hif.node(target_type).data {
                NodeData::Real(RealType { span, .. }) => *span,
                _ => unreachable!(),
            };
            let rounded = match span {
                Some(span) => {
                    let width = sem.span_get_bitwidth(hif, span)?;
                    check_span(width)?;
                    if width <= 32 {
                        v as f32 as f64
                    } else {
                        v
                    }
                }
                None => v,
            };
            Ok(hif.alloc(NodeData::RealValue(RealValueNode {
                value: rounded,
                ty: Some(target_type),
            })))
        }

        (Kind::IntValue, Kind::Time) => {
            let v = match &hif.node(value).data {
                NodeData::IntValue(v) => v.value,
                _ => unreachable!(),
            };
            Ok(hif.alloc(NodeData::TimeValue(TimeValueNode {
                value: v as f64,
                unit: TimeUnit::Sec,
                ty: Some(target_type),
            })))
        }

        (Kind::RealValue, Kind::Time) => {
            let v = match &hif.node(value).data {
                NodeData::RealValue(v) => v.value,
                _ => unreachable!(),
            };
            Ok(hif.alloc(NodeData::TimeValue(TimeValueNode {
                value: v,
                unit: TimeUnit::Sec,
                ty: Some(target_type),
            })))
        }

        (Kind::BitvectorValue, Kind::Pointer) => {
            let bits = match &hif.node(value).data {
                NodeData::BitvectorValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let element = match &hif.node(target_type).data {
                NodeData::Pointer(PointerType { element_type, .. }) => *element_type,
                _ => unreachable!(),
            };
            if hif.kind(element) != Kind::Char {
                return Err(Error::unsupported("Bitvector -> Pointer is only legal for char*"));
            }
            Ok(hif.alloc(NodeData::StringValue(StringValueNode {
                value: bits,
                ty: Some(target_type),
            })))
        }

        (Kind::BitvectorValue, Kind::Array) => {
            let bits = match &hif.node(value).data {
                NodeData::BitvectorValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            chunk_bitvector_into_array(hif, sem, &bits, target_type, policy)
        }

        (Kind::IntValue, Kind::Array) => {
            let (array_span, element_type) = match &hif.node(target_type).data {
                NodeData::Array(ArrayType { span, element_type, .. }) => (*span, *element_type),
                _ => unreachable!(),
            };
            let total = sem.type_get_total_span_size(hif, target_type)?;
            check_span(total)?;
            let signed = matches!(&hif.node(target_type).data, NodeData::Array(ArrayType { signed, .. }) if *signed);
            let full_int_ty = hif.alloc(NodeData::Int(IntType {
                span: array_span,
                signed,
                constexpr: true,
            }));
            let widened = transform_constant(hif, sem, value, full_int_ty, policy)?;
            let full_bv_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
                span: array_span,
                logic: false,
                resolved: false,
                signed,
                constexpr: true,
            }));
            let as_bits = transform_constant(hif, sem, widened, full_bv_ty, policy)?;
            let bits = match &hif.node(as_bits).data {
                NodeData::BitvectorValue(v) => v.value.clone(),
                _ => unreachable!(),
            };
            let _ = element_type;
            chunk_bitvector_into_array(hif, sem, &bits, target_type, policy)
        }

        (vk, tk) if vk == value_kind_of_scalar_type(tk) => {
            // Same logical family and no target-specific coercion above applies:
            // the value already conforms, so hand back an identical clone bound
            // to the (possibly different, but compatible) target type node.
            let mut cloned = hif.node(value).data.clone();
            bind_type(&mut cloned, target_type);
            Ok(hif.alloc(cloned))
        }

        _ => Err(Error::unsupported(format!(
            "no constant transformation from {value_kind} to {target_kind}"
        ))),
    }
}

/// Slices a bit string into `Array` elements, one `AggregateAlt` per chunk,
/// indexed by the array's leftmost bound plus the chunk number (direction
/// aware), or a single `others`-only aggregate when the array is over `Bit`
/// and every bit agrees.
fn chunk_bitvector_into_array(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    bits: &str,
    array_type: NodeId,
    policy: &TransformPolicy,
) -> Result<NodeId> {
    let (array_span, element_type) = match &hif.node(array_type).data {
        NodeData::Array(ArrayType { span, element_type, .. }) => (*span, *element_type),
        _ => unreachable!(),
    };
    let element_kind = hif.kind(element_type);
    let element_bits = sem.type_get_span_bitwidth(hif, element_type).unwrap_or(1).max(1);

    if element_kind == Kind::Bit {
        let mut chars = bits.chars();
        let first = chars.next().unwrap_or('0');
        if chars.all(|c| c == first) {
            let bit_ty = match &hif.node(element_type).data {
                NodeData::Bit(t) => NodeData::Bit(BitType { constexpr: true, ..*t }),
                _ => unreachable!(),
            };
            let synth_ty = hif.alloc(bit_ty);
            let bit = BitConstant::from_char(first).unwrap_or(BitConstant::X);
            let other = hif.alloc(NodeData::BitValue(BitValueNode { value: bit, ty: Some(synth_ty) }));
            return Ok(hif.alloc(NodeData::Aggregate(AggregateNode {
                others: Some(other),
                alts: Vec::new(),
                ty: Some(array_type),
            })));
        }
    }

    if element_bits == 0 {
        return Err(Error::invalid_argument("array element type has zero bitwidth"));
    }
    let elements = (bits.len() as u64) / element_bits;
    let array_downto = direction_of(hif, array_span) == Direction::Downto;
    let left = match &hif.node(array_span).data {
        NodeData::Range(RangeNode { left_bound, .. }) => int_literal(hif, *left_bound).unwrap_or(0),
        _ => 0,
    };

    let mut alts = Vec::with_capacity(elements as usize);
    for i in 0..elements {
        let start = (i * element_bits) as usize;
        let end = start + element_bits as usize;
        let chunk = &bits[start..end];
        let index_value = if array_downto { left - i as i64 } else { left + i as i64 };

        let element_value = if element_kind == Kind::Bit {
            let bit = BitConstant::from_char(chunk.chars().next().unwrap_or('0')).unwrap_or(BitConstant::X);
            let bit_ty = match &hif.node(element_type).data {
                NodeData::Bit(t) => NodeData::Bit(BitType { constexpr: true, ..*t }),
                _ => unreachable!(),
            };
            let synth_ty = hif.alloc(bit_ty);
            hif.alloc(NodeData::BitValue(BitValueNode { value: bit, ty: Some(synth_ty) }))
        } else {
            let chunk_span = match &hif.node(element_type).data {
                NodeData::Bitvector(BitvectorType { span, .. })
                | NodeData::Signed(SignedType { span, .. })
                | NodeData::Unsigned(UnsignedType { span, .. }) => *span,
                _ => unreachable!(),
            };
            let signed = matches!(
                &hif.node(element_type).data,
                NodeData::Bitvector(BitvectorType { signed: true, .. }) | NodeData::Signed(_)
            );
            let _ = signed;
            let element_bv_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
                span: chunk_span,
                logic: false,
                resolved: false,
                signed,
                constexpr: true,
            }));
            let raw = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
                value: chunk.to_string(),
                ty: Some(element_bv_ty),
            }));
            transform_constant(hif, sem, raw, element_type, policy)?
        };

        let index = hif.alloc(NodeData::IntValue(IntValueNode { value: index_value, ty: None }));
        alts.push(hif.alloc(NodeData::AggregateAlt(AggregateAltNode {
            indices: vec![index],
            value: element_value,
        })));
    }

    Ok(hif.alloc(NodeData::Aggregate(AggregateNode {
        others: None,
        alts,
        ty: Some(array_type),
    })))
}

fn span_of_bitvector_value(
    hif: &Hif,
    sem: &dyn LanguageSemantics,
    value: NodeId,
) -> Result<Option<NodeId>> {
    let ty = sem.get_semantic_type(hif, value)?;
    Ok(match &hif.node(ty).data {
        NodeData::Bitvector(BitvectorType { span, .. }) => Some(*span),
        _ => None,
    })
}

fn value_kind_of_scalar_type(type_kind: Kind) -> Kind {
    match type_kind {
        Kind::Bit => Kind::BitValue,
        Kind::Bitvector | Kind::Signed | Kind::Unsigned => Kind::BitvectorValue,
        Kind::Bool => Kind::BoolValue,
        Kind::Int => Kind::IntValue,
        Kind::Real => Kind::RealValue,
        Kind::Char => Kind::CharValue,
        Kind::String => Kind::StringValue,
        Kind::Time => Kind::TimeValue,
        other => other,
    }
}

fn bind_type(data: &mut NodeData, ty: NodeId) {
    match data {
        NodeData::BitValue(v) => v.ty = Some(ty),
        NodeData::BitvectorValue(v) => v.ty = Some(ty),
        NodeData::BoolValue(v) => v.ty = Some(ty),
        NodeData::IntValue(v) => v.ty = Some(ty),
        NodeData::RealValue(v) => v.ty = Some(ty),
        NodeData::CharValue(v) => v.ty = Some(ty),
        NodeData::StringValue(v) => v.ty = Some(ty),
        NodeData::TimeValue(v) => v.ty = Some(ty),
        _ => {}
    }
}

/// Convenience wrapper that transforms `value` to the type returned by
/// `sem.get_type_for_constant`, i.e. the type the language would infer for it
/// with no explicit target in scope.
pub fn transform_value(
    hif: &mut Hif,
    sem: &dyn LanguageSemantics,
    value: NodeId,
    policy: &TransformPolicy,
) -> Result<NodeId> {
    let inferred = sem.get_type_for_constant(hif, value)?;
    transform_constant(hif, sem, value, inferred, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BitvectorType, NodeData, RangeNode};
    use crate::semantics::LanguageSemantics;

    struct MockSemantics;

    impl LanguageSemantics for MockSemantics {
        fn get_type_for_constant(&self, hif: &Hif, value: NodeId) -> Result<NodeId> {
            Ok(match &hif.node(value).data {
                NodeData::BitValue(v) => v.ty.unwrap(),
                NodeData::BitvectorValue(v) => v.ty.unwrap(),
                NodeData::IntValue(v) => v.ty.unwrap(),
                _ => unreachable!(),
            })
        }
        fn transform_real_to_int(&self, value: f64) -> i64 {
            value.round() as i64
        }
        fn span_get_bitwidth(&self, hif: &Hif, span: NodeId) -> Result<u64> {
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
        fn type_get_total_span_size(&self, hif: &Hif, ty: NodeId) -> Result<u64> {
            self.type_get_span_bitwidth(hif, ty)
        }
        fn type_get_span_bitwidth(&self, hif: &Hif, ty: NodeId) -> Result<u64> {
            match &hif.node(ty).data {
                NodeData::Bitvector(BitvectorType { span, .. }) => self.span_get_bitwidth(hif, *span),
                NodeData::Signed(SignedType { span, .. }) => self.span_get_bitwidth(hif, *span),
                NodeData::Unsigned(UnsignedType { span, .. }) => self.span_get_bitwidth(hif, *span),
                NodeData::Bit(_) => Ok(1),
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
        fn get_semantic_type(&self, hif: &Hif, obj: NodeId) -> Result<NodeId> {
            self.get_type_for_constant(hif, obj)
        }
        fn get_declaration(&self, _hif: &Hif, _obj: NodeId) -> Result<NodeId> {
            Err(hif_error::Error::not_implemented("get_declaration"))
        }
        fn get_references(&self, _hif: &Hif, _declaration: NodeId) -> Result<Vec<NodeId>> {
            Ok(Vec::new())
        }
    }

    fn downto_range(hif: &mut Hif, left: i64, right: i64) -> NodeId {
        let l = hif.alloc(NodeData::IntValue(IntValueNode { value: left, ty: None }));
        let r = hif.alloc(NodeData::IntValue(IntValueNode { value: right, ty: None }));
        hif.alloc(NodeData::Range(RangeNode {
            direction: Direction::Downto,
            left_bound: l,
            right_bound: r,
            ty: None,
        }))
    }

    #[test]
    fn bitvector_downto_to_bit_takes_last_char() {
        let mut hif = Hif::new();
        let span = downto_range(&mut hif, 3, 0);
        let bv_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
            value: "1010".into(),
            ty: Some(bv_ty),
        }));
        let bit_ty = hif.alloc(NodeData::Bit(BitType {
            logic: false,
            resolved: false,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, bit_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::BitValue(v) => assert_eq!(v.value, BitConstant::Zero),
            _ => panic!("expected BitValue"),
        }
    }

    #[test]
    fn int_to_bit_requires_allow_truncation() {
        let mut hif = Hif::new();
        let span = downto_range(&mut hif, 31, 0);
        let int_ty = hif.alloc(NodeData::Int(IntType {
            span,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::IntValue(IntValueNode {
            value: 5,
            ty: Some(int_ty),
        }));
        let bit_ty = hif.alloc(NodeData::Bit(BitType {
            logic: false,
            resolved: false,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let strict = TransformPolicy {
            allow_truncation: false,
            required_const_value: true,
        };
        assert!(transform_constant(&mut hif, &sem, value, bit_ty, &strict).is_err());

        let lenient = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, bit_ty, &lenient).unwrap();
        match &hif.node(result).data {
            NodeData::BitValue(v) => assert_eq!(v.value, BitConstant::One),
            _ => panic!("expected BitValue"),
        }
    }

    #[test]
    fn bitvector_unsigned_downto_truncates_lsbs() {
        let mut hif = Hif::new();
        let src_span = downto_range(&mut hif, 7, 0);
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
        let dst_span = downto_range(&mut hif, 3, 0);
        let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: dst_span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::BitvectorValue(v) => assert_eq!(v.value, "0000"),
            _ => panic!("expected BitvectorValue"),
        }
    }

    #[test]
    fn bitvector_signed_downto_sign_extends() {
        let mut hif = Hif::new();
        let src_span = downto_range(&mut hif, 3, 0);
        let src_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: src_span,
            logic: false,
            resolved: false,
            signed: true,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
            value: "1111".into(),
            ty: Some(src_ty),
        }));
        let dst_span = downto_range(&mut hif, 7, 0);
        let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: dst_span,
            logic: false,
            resolved: false,
            signed: true,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::BitvectorValue(v) => assert_eq!(v.value, "11111111"),
            _ => panic!("expected BitvectorValue"),
        }
    }

    #[test]
    fn span_wider_than_max_is_rejected() {
        let mut hif = Hif::new();
        let src_span = downto_range(&mut hif, 1, 0);
        let src_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: src_span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
            value: "10".into(),
            ty: Some(src_ty),
        }));
        let dst_span = downto_range(&mut hif, HIF_MAX_ALLOWED_SPAN_SIZE as i64 + 10, 0);
        let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: dst_span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let err = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap_err();
        assert_eq!(err.kind(), hif_error::ErrorKind::SpanTooWide);
    }

    #[test]
    fn bitvector_unsigned_to_unsigned_resizes_not_just_rebinds() {
        let mut hif = Hif::new();
        let src_span = downto_range(&mut hif, 3, 0);
        let src_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: src_span,
            logic: true,
            resolved: true,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode {
            value: "1111".into(),
            ty: Some(src_ty),
        }));
        let dst_span = downto_range(&mut hif, 7, 0);
        let dst_ty = hif.alloc(NodeData::Unsigned(UnsignedType {
            span: dst_span,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::BitvectorValue(v) => assert_eq!(v.value, "00001111"),
            _ => panic!("expected BitvectorValue"),
        }
    }

    #[test]
    fn int_to_int_sign_extends_and_masks() {
        let mut hif = Hif::new();
        let src_span = downto_range(&mut hif, 31, 0);
        let src_ty = hif.alloc(NodeData::Int(IntType {
            span: src_span,
            signed: true,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::IntValue(IntValueNode { value: -1, ty: Some(src_ty) }));
        let dst_span = downto_range(&mut hif, 3, 0);
        let dst_ty = hif.alloc(NodeData::Int(IntType {
            span: dst_span,
            signed: true,
            constexpr: true,
        }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::IntValue(v) => assert_eq!(v.value, -1),
            _ => panic!("expected IntValue"),
        }
    }

    #[test]
    fn string_to_bitvector_rejects_invalid_characters() {
        let mut hif = Hif::new();
        let dst_span = downto_range(&mut hif, 3, 0);
        let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: dst_span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::StringValue(StringValueNode { value: "10u1".into(), ty: None }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        assert!(transform_constant(&mut hif, &sem, value, dst_ty, &policy).is_err());
    }

    #[test]
    fn string_to_bitvector_accepts_binary_prefix_free_literal() {
        let mut hif = Hif::new();
        let dst_span = downto_range(&mut hif, 3, 0);
        let dst_ty = hif.alloc(NodeData::Bitvector(BitvectorType {
            span: dst_span,
            logic: false,
            resolved: false,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::StringValue(StringValueNode { value: "1010".into(), ty: None }));
        let sem = MockSemantics;
        let policy = TransformPolicy {
            allow_truncation: true,
            required_const_value: true,
        };
        let result = transform_constant(&mut hif, &sem, value, dst_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::BitvectorValue(v) => assert_eq!(v.value, "1010"),
            _ => panic!("expected BitvectorValue"),
        }
    }

    #[test]
    fn string_with_binary_prefix_parses_to_int() {
        let span = 0;
        let _ = span;
        assert_eq!(parse_numeric_string("b'1010"), 10.0);
        assert_eq!(parse_numeric_string("42"), 42.0);
        assert_eq!(parse_numeric_string("not a number"), 0.0);
    }

    #[test]
    fn bitvector_chunks_into_array_of_bits() {
        let mut hif = Hif::new();
        let array_span = downto_range(&mut hif, 3, 0);
        let bit_ty = hif.alloc(NodeData::Bit(BitType { logic: false, resolved: false, constexpr: true }));
        let array_ty = hif.alloc(NodeData::Array(ArrayType {
            span: array_span,
            element_type: bit_ty,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode { value: "1010".into(), ty: None }));
        let sem = MockSemantics;
        let policy = TransformPolicy { allow_truncation: true, required_const_value: false };
        let result = transform_constant(&mut hif, &sem, value, array_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::Aggregate(a) => assert_eq!(a.alts.len(), 4),
            _ => panic!("expected Aggregate"),
        }
    }

    #[test]
    fn bitvector_chunks_into_others_aggregate_when_uniform() {
        let mut hif = Hif::new();
        let array_span = downto_range(&mut hif, 3, 0);
        let bit_ty = hif.alloc(NodeData::Bit(BitType { logic: false, resolved: false, constexpr: true }));
        let array_ty = hif.alloc(NodeData::Array(ArrayType {
            span: array_span,
            element_type: bit_ty,
            signed: false,
            constexpr: true,
        }));
        let value = hif.alloc(NodeData::BitvectorValue(BitvectorValueNode { value: "0000".into(), ty: None }));
        let sem = MockSemantics;
        let policy = TransformPolicy { allow_truncation: true, required_const_value: false };
        let result = transform_constant(&mut hif, &sem, value, array_ty, &policy).unwrap();
        match &hif.node(result).data {
            NodeData::Aggregate(a) => {
                assert!(a.others.is_some());
                assert!(a.alts.is_empty());
            }
            _ => panic!("expected Aggregate"),
        }
    }
}
