//! Fresh-name minting and conflict detection.
//!
//! The name table owns the string interning/uniquing policy; this crate only
//! consumes it through [`NameTable`] when the scope mover needs to rename a
//! declaration to avoid a collision in its destination scope.

/// External name-table collaborator.
pub trait NameTable {
    /// Returns a name, derived from `base`, that does not conflict with anything
    /// already visible in the scope identified by `scope_key`. Implementations
    /// typically try `base`, then `base_0`, `base_1`, ... until `none()` is
    /// reached or a fresh name is accepted.
    fn get_fresh_name(&mut self, base: &str, scope_key: &str) -> String;

    /// The sentinel name meaning "no name" (anonymous declarations).
    fn none(&self) -> &str;

    /// `true` if `name` is already visible in the scope identified by `scope_key`.
    fn check_conflicting_name(&self, name: &str, scope_key: &str) -> bool;
}

/// A minimal in-memory [`NameTable`] suitable for tests and the CLI demo: tracks
/// per-scope name sets and mints `base_N` suffixes on conflict.
#[derive(Debug, Default)]
pub struct SimpleNameTable {
    scopes: std::collections::HashMap<String, std::collections::HashSet<String>>,
}

impl SimpleNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as occupied in `scope_key`, e.g. after building a tree by
    /// hand in a test rather than going through `get_fresh_name`.
    pub fn occupy(&mut self, scope_key: &str, name: &str) {
        self.scopes
            .entry(scope_key.to_string())
            .or_default()
            .insert(name.to_string());
    }
}

impl NameTable for SimpleNameTable {
    fn get_fresh_name(&mut self, base: &str, scope_key: &str) -> String {
        if !self.check_conflicting_name(base, scope_key) {
            self.occupy(scope_key, base);
            return base.to_string();
        }
        let mut suffix = 0u64;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.check_conflicting_name(&candidate, scope_key) {
                self.occupy(scope_key, &candidate);
                return candidate;
            }
            suffix += 1;
        }
    }

    fn none(&self) -> &str {
        ""
    }

    fn check_conflicting_name(&self, name: &str, scope_key: &str) -> bool {
        self.scopes
            .get(scope_key)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_name_is_unchanged_when_no_conflict() {
        let mut table = SimpleNameTable::new();
        assert_eq!(table.get_fresh_name("c", "L2"), "c");
    }

    #[test]
    fn fresh_name_appends_suffix_on_conflict() {
        let mut table = SimpleNameTable::new();
        table.occupy("L2", "c");
        assert_eq!(table.get_fresh_name("c", "L2"), "c_0");
    }

    #[test]
    fn conflicts_are_scoped() {
        let mut table = SimpleNameTable::new();
        table.occupy("L1", "c");
        assert_eq!(table.get_fresh_name("c", "L2"), "c");
    }
}
