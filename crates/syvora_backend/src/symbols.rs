use std::collections::HashMap;

/// A stack of lexical scopes, innermost last.
///
/// Lookups search from the innermost scope outwards and return the first
/// hit. Inserting a name that already exists in the innermost scope
/// replaces it without complaint.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SymbolTable<T> {
    /// Create a table holding only the outermost scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Discard the innermost scope and everything bound in it.
    ///
    /// # Panics
    /// Panics if only the outermost scope is left.
    pub fn exit_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot exit the outermost scope");
        self.scopes.pop();
    }

    /// Bind `name` in the innermost scope, returning any binding it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        self.innermost_mut().insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Like `lookup`, but bindings rejected by `accept` are passed over
    /// instead of shadowing outer ones.
    pub fn lookup_where(&self, name: &str, accept: impl Fn(&T) -> bool) -> Option<&T> {
        self.scopes
            .iter()
            .rev()
            .filter_map(|scope| scope.get(name))
            .find(|value| accept(value))
    }

    /// Number of scopes, including the outermost one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost_mut(&mut self) -> &mut HashMap<String, T> {
        // there is always at least the outermost scope
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolTable;

    #[test]
    fn lookup_searches_outwards() {
        let mut table = SymbolTable::new();
        table.insert("x", 1);

        table.enter_scope();
        table.insert("y", 2);

        assert_eq!(table.lookup("x"), Some(&1));
        assert_eq!(table.lookup("y"), Some(&2));
        assert_eq!(table.lookup("z"), None);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut table = SymbolTable::new();
        table.insert("x", 1);

        table.enter_scope();
        table.insert("x", 2);
        assert_eq!(table.lookup("x"), Some(&2));

        table.exit_scope();
        assert_eq!(table.lookup("x"), Some(&1));
    }

    #[test]
    fn exit_scope_removes_bindings() {
        let mut table = SymbolTable::new();

        table.enter_scope();
        table.insert("local", 7);
        assert_eq!(table.depth(), 2);

        table.exit_scope();
        assert_eq!(table.depth(), 1);
        assert_eq!(table.lookup("local"), None);
    }

    #[test]
    fn redeclaration_replaces_silently() {
        let mut table = SymbolTable::new();
        assert_eq!(table.insert("x", 1), None);
        assert_eq!(table.insert("x", 2), Some(1));
        assert_eq!(table.lookup("x"), Some(&2));
    }

    #[test]
    fn filtered_lookup_sees_past_rejected_bindings() {
        let mut table = SymbolTable::new();
        table.insert("x", 1);
        table.enter_scope();
        table.insert("x", -1);

        assert_eq!(table.lookup("x"), Some(&-1));
        assert_eq!(table.lookup_where("x", |v| *v > 0), Some(&1));
        assert_eq!(table.lookup_where("x", |v| *v > 5), None);
    }

    #[test]
    #[should_panic(expected = "outermost scope")]
    fn cannot_exit_outermost_scope() {
        let mut table = SymbolTable::<i32>::new();
        table.exit_scope();
    }
}
