// Cross-unit binding context.
//
// Units contribute declarations under their own namespace to one crate-wide
// table. Project declarations are registered before external ones, and the
// first declaration of a path in unit order wins, so results never depend on
// scheduling.

use std::collections::{HashMap, HashSet};

use super::library::Library;
use super::tree::{concat, key, CallTarget, RoutineDecl, ScopeId, SynTree, TypeHint};
use crate::domain::project::SourceUnit;

/// Identity of a routine: qualified path plus rendered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynSymbol {
    pub path: Vec<String>,
    pub params: Vec<String>,
}

impl SynSymbol {
    pub fn new(path: Vec<String>, params: Vec<String>) -> Self {
        Self { path, params }
    }
}

impl From<&RoutineDecl> for SynSymbol {
    fn from(decl: &RoutineDecl) -> Self {
        Self::new(decl.path.clone(), decl.params.clone())
    }
}

impl std::fmt::Display for SynSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.path.join("::"), self.params.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct Routine {
    pub symbol: SynSymbol,
    /// Resolved return type, when it is a known type.
    pub returns: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct Bindings {
    routines: HashMap<String, Routine>,
    types: HashSet<String>,
    /// Type -> traits it implements, in declaration order.
    impls: HashMap<String, Vec<Vec<String>>>,
}

impl Bindings {
    pub fn build(units: &[SourceUnit<SynTree>], libraries: &[Library]) -> Self {
        let mut bindings = Self::default();

        for unit in units {
            let tree = unit.tree();
            for ty in tree.types() {
                bindings.types.insert(key(ty));
            }
            for imp in tree.impls() {
                bindings.types.insert(key(&imp.self_type));
            }
        }
        for library in libraries {
            for routine in library.routines() {
                if let Some((_, owner)) = routine.path.split_last() {
                    if !owner.is_empty() {
                        bindings.types.insert(key(owner));
                    }
                }
            }
        }

        for unit in units {
            let tree = unit.tree();
            for imp in tree.impls() {
                let Some(trait_path) = &imp.trait_path else {
                    continue;
                };
                if let Some(resolved) = bindings.resolve_type_path(tree, trait_path, imp.scope) {
                    let traits = bindings.impls.entry(key(&imp.self_type)).or_default();
                    if !traits.contains(&resolved) {
                        traits.push(resolved);
                    }
                }
            }
        }

        for unit in units {
            let tree = unit.tree();
            for decl in tree.routines() {
                let returns = bindings.resolve_type(tree, &decl.returns);
                bindings.routines.entry(key(&decl.path)).or_insert_with(|| Routine {
                    symbol: SynSymbol::from(decl),
                    returns,
                });
            }
        }
        for library in libraries {
            for routine in library.routines() {
                let returns = routine
                    .returns
                    .clone()
                    .filter(|ty| bindings.types.contains(&key(ty)));
                bindings.routines.entry(key(&routine.path)).or_insert_with(|| Routine {
                    symbol: SynSymbol::new(routine.path.clone(), routine.params.clone()),
                    returns,
                });
            }
        }

        bindings
    }

    pub fn routine_count(&self) -> usize {
        self.routines.len()
    }

    /// False for a `Construct` target that names no routine.
    pub fn is_call(&self, tree: &SynTree, target: &CallTarget) -> bool {
        match target {
            CallTarget::Construct { .. } => self.resolve_call(tree, target).is_some(),
            _ => true,
        }
    }

    /// Routine invoked by `target` as seen from `tree`.
    pub fn resolve_call(&self, tree: &SynTree, target: &CallTarget) -> Option<&Routine> {
        match target {
            CallTarget::Path { path, scope } | CallTarget::Construct { path, scope } => {
                let candidates = tree.scope(*scope)?.candidates(path);
                if let Some(routine) = candidates.iter().find_map(|c| self.routines.get(&key(c))) {
                    return Some(routine);
                }
                // `Type::method` where the method comes from a trait impl
                let (name, owner) = path.split_last()?;
                if owner.is_empty() {
                    return None;
                }
                let ty = self.resolve_type_path(tree, owner, *scope)?;
                self.lookup_method(&ty, name)
            }
            CallTarget::Method { receiver, name } => {
                let ty = self.resolve_type(tree, receiver)?;
                self.lookup_method(&ty, name)
            }
            CallTarget::Dynamic => None,
        }
    }

    fn resolve_type(&self, tree: &SynTree, hint: &TypeHint) -> Option<Vec<String>> {
        match hint {
            TypeHint::Named { path, scope } => self.resolve_type_path(tree, path, *scope),
            TypeHint::ReturnOf(target) => match (self.resolve_call(tree, target), target.as_ref()) {
                (Some(routine), _) => routine.returns.clone(),
                // `Wrapper(x)` has type `Wrapper`
                (None, CallTarget::Construct { path, scope }) => self.resolve_type_path(tree, path, *scope),
                (None, _) => None,
            },
            TypeHint::Unknown => None,
        }
    }

    fn resolve_type_path(&self, tree: &SynTree, path: &[String], scope: ScopeId) -> Option<Vec<String>> {
        tree.scope(scope)?
            .candidates(path)
            .into_iter()
            .find(|candidate| self.types.contains(&key(candidate)))
    }

    /// Inherent methods first, then methods of implemented traits.
    fn lookup_method(&self, ty: &[String], name: &str) -> Option<&Routine> {
        let name = [name.to_string()];
        if let Some(routine) = self.routines.get(&key(&concat(ty, &name))) {
            return Some(routine);
        }
        self.impls
            .get(&key(ty))?
            .iter()
            .find_map(|tr| self.routines.get(&key(&concat(tr, &name))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ExternalReference;
    use crate::infrastructure::syn_frontend::lower::lower;

    fn unit(id: &str, src: &str) -> SourceUnit<SynTree> {
        unit_in(id, &[], src)
    }

    fn unit_in(id: &str, namespace: &[&str], src: &str) -> SourceUnit<SynTree> {
        let namespace: Vec<String> = namespace.iter().map(|s| s.to_string()).collect();
        SourceUnit::new(id, lower(&syn::parse_file(src).unwrap(), &namespace))
    }

    fn resolve_all(units: &[SourceUnit<SynTree>], libraries: &[Library], unit_index: usize) -> Vec<Option<String>> {
        let bindings = Bindings::build(units, libraries);
        let tree = units[unit_index].tree();
        tree.calls()
            .map(|target| bindings.resolve_call(tree, target).map(|r| r.symbol.to_string()))
            .collect()
    }

    fn resolved(units: &[SourceUnit<SynTree>], libraries: &[Library], unit_index: usize) -> Option<String> {
        resolve_all(units, libraries, unit_index).into_iter().next().flatten()
    }

    #[test]
    fn test_display_includes_params() {
        let symbol = SynSymbol::new(vec!["A".into(), "h".into()], vec!["&str".into(), "u8".into()]);
        assert_eq!(symbol.to_string(), "A::h(&str, u8)");
    }

    #[test]
    fn test_resolves_across_units() {
        let units = vec![
            unit("a.rs", "struct A; impl A { fn f() {} }"),
            unit("b.rs", "fn g() { A::f(); }"),
        ];
        assert_eq!(resolved(&units, &[], 1).as_deref(), Some("A::f()"));
    }

    #[test]
    fn test_resolves_method_through_receiver_type() {
        let units = vec![unit(
            "a.rs",
            "struct A; impl A { fn new() -> Self { A } fn run(&self, n: u32) {} }
             fn main() { let a = A::new(); a.run(1); }",
        )];
        let names = resolve_all(&units, &[], 0);
        assert_eq!(names, vec![Some("A::new()".to_string()), Some("A::run(u32)".to_string())]);
    }

    #[test]
    fn test_resolves_trait_method_on_implementing_type() {
        let units = vec![unit(
            "a.rs",
            "trait Speak { fn speak(&self) -> String; }
             struct Dog;
             impl Speak for Dog { fn speak(&self) -> String { String::new() } }
             fn talk(d: &Dog) { d.speak(); }",
        )];
        let calls: Vec<String> = resolve_all(&units, &[], 0).into_iter().flatten().collect();
        // String::new is unknown without a reference
        assert_eq!(calls, vec!["Dog::speak()".to_string()]);
    }

    #[test]
    fn test_external_reference_resolves() {
        let library = Library::load(&ExternalReference::inline(
            "console",
            "[[routine]]\npath = \"Console::write_line\"\nparams = [\"&str\"]\n",
        ))
        .unwrap();
        let units = vec![unit("a.rs", r#"fn f() { Console::write_line("x"); }"#)];
        assert_eq!(
            resolved(&units, &[library], 0).as_deref(),
            Some("Console::write_line(&str)")
        );
    }

    #[test]
    fn test_project_declaration_shadows_reference() {
        let library = Library::load(&ExternalReference::inline(
            "ext",
            "[[routine]]\npath = \"helper\"\nparams = [\"i64\"]\n",
        ))
        .unwrap();
        let units = vec![unit("a.rs", "fn helper() {} fn f() { helper(); }")];
        assert_eq!(resolved(&units, &[library], 0).as_deref(), Some("helper()"));
    }

    #[test]
    fn test_unknown_call_is_unresolved() {
        let units = vec![unit("a.rs", "fn f() { nowhere(); }")];
        assert_eq!(resolved(&units, &[], 0), None);
    }

    #[test]
    fn test_module_paths_and_super() {
        let units = vec![unit(
            "a.rs",
            "fn top() {}
             mod m { fn inner() { super::top(); } }",
        )];
        assert_eq!(resolved(&units, &[], 0).as_deref(), Some("top()"));
    }

    #[test]
    fn test_module_file_paths_resolve_from_crate_root() {
        let units = vec![
            unit_in("src/net.rs", &["net"], "pub fn connect(addr: &str) {} pub fn retry() { connect(\"again\"); }"),
            unit("src/main.rs", "mod net;\nfn main() { net::connect(\"x\"); crate::net::connect(\"y\"); }"),
        ];
        assert_eq!(resolve_all(&units, &[], 0), vec![Some("net::connect(&str)".to_string())]);
        assert_eq!(resolve_all(&units, &[], 1), vec![Some("net::connect(&str)".to_string()); 2]);
    }

    #[test]
    fn test_construct_is_a_call_only_when_a_routine_binds() {
        let units = vec![unit(
            "a.rs",
            "struct W(u8);
             struct Big; impl Big { fn Make() -> Big { Big } fn grow(&self) {} }
             fn f() { W(1); Big::Make().grow(); }",
        )];
        let bindings = Bindings::build(&units, &[]);
        let tree = units[0].tree();
        let verdicts: Vec<bool> = tree.calls().map(|target| bindings.is_call(tree, target)).collect();
        let names = resolve_all(&units, &[], 0);
        // `W(1)`, then `.grow()` before its receiver `Big::Make()`
        assert_eq!(verdicts, vec![false, true, true]);
        assert_eq!(
            names,
            vec![None, Some("Big::grow()".to_string()), Some("Big::Make()".to_string())]
        );
    }

    #[test]
    fn test_tuple_struct_value_has_its_type() {
        let units = vec![unit(
            "a.rs",
            "struct Meters(f64);
             impl Meters { fn show(&self) {} }
             fn f() { let m = Meters(1.0); m.show(); }",
        )];
        let names: Vec<String> = resolve_all(&units, &[], 0).into_iter().flatten().collect();
        assert_eq!(names, vec!["Meters::show()".to_string()]);
    }
}
