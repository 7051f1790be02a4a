//! Hierarchical symbol construction: rendering a declaration's position in the
//! design hierarchy as a single dotted name, the way a synthesis tool or a
//! waveform viewer names a signal (`work.counter(rtl).count`).

use crate::ir::{Hif, Kind, NodeId};
use crate::semantics::LanguageSemantics;
use crate::Result;
use hif_error::Error;

/// Target-language rendering conventions for [`build_hierarchical_symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionStyle {
    Hif,
    Vhdl,
    Verilog,
    SystemC,
}

/// Walks `obj` up toward the enclosing `System`, concatenating each named
/// ancestor's name with `.`, innermost first becomes rightmost. A `View`
/// ancestor's name is parenthesized for `Hif` and `Vhdl` styles (VHDL's
/// `entity(architecture)` convention); `Vhdl` additionally prefixes a
/// `LibraryDef` root with `work.` and appends `.all` when the walk bottoms out
/// at a library rather than a design object.
pub fn build_hierarchical_symbol(
    hif: &Hif,
    sem: &dyn LanguageSemantics,
    obj: NodeId,
    style: DefinitionStyle,
) -> Result<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(obj);
    let mut hit_library_def = false;

    while let Some(id) = current {
        let kind = hif.kind(id);
        if kind == Kind::System {
            break;
        }
        if let Some(name) = hif.node(id).data.decl_name()
            && !name.is_empty() {
                let rendered = if kind == Kind::View && matches!(style, DefinitionStyle::Hif | DefinitionStyle::Vhdl) {
                    format!("({name})")
                } else {
                    name.to_string()
                };
                segments.push(rendered);
            }
        if kind == Kind::LibraryDef {
            hit_library_def = true;
        }
        current = hif.parent(id);
    }

    if segments.is_empty() {
        return Err(Error::invalid_argument(
            "object has no named ancestor to build a hierarchical symbol from",
        ));
    }

    segments.reverse();
    let mut joined = segments.join(".");

    if style == DefinitionStyle::Vhdl && hit_library_def {
        joined = format!("work.{joined}.all");
    }

    let _ = sem; // reserved for language-specific escaping rules callers may add
    Ok(joined)
}
