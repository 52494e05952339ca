// Lowers a syn file into a `SynTree`.
//
// Routine declarations with a body become `Declaration` nodes, call and
// method-call expressions become `Call` nodes, and inline modules become
// `Other` nodes; everything else is flattened away. Calls whose final path
// segment is uppercase stay `Call` nodes with a `Construct` target; binding
// decides whether they invoke anything. Children are appended in
// source order, so a pre-order walk of the result follows the document.

use std::collections::{BTreeMap, HashMap};

use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{
    Arm, Block, Expr, ExprCall, ExprClosure, ExprForLoop, ExprIf, ExprLet, ExprMethodCall, ExprWhile,
    FnArg, Generics, ImplItem, Item, ItemEnum, ItemFn, ItemImpl, ItemMacro, ItemMod, ItemStruct,
    ItemTrait, ItemUnion, Local, Macro, Pat, ReturnType, Signature, TraitItem, Type, UseTree,
    WherePredicate,
};

use super::render::{path_idents, render_params, render_type};
use super::tree::{concat, CallTarget, ImplDecl, RoutineDecl, ScopeId, ScopeInfo, SynNode, SynTree, TypeHint};
use crate::domain::ast::{AstNodeKind, NodeId, Position, SyntaxTree};

/// Smart pointers looked through when inferring a receiver's type.
const TRANSPARENT_WRAPPERS: &[&str] = &["Box", "Rc", "Arc"];

/// Lower `file`, whose items live in `namespace` (empty for a crate root).
pub fn lower(file: &syn::File, namespace: &[String]) -> SynTree {
    let (imports, globs) = collect_imports(namespace, &file.items);
    let root_scope = ScopeInfo {
        namespace: namespace.to_vec(),
        self_type: None,
        imports,
        globs,
    };

    let mut lowerer = Lowerer::new(SynTree::new(root_scope));
    for item in &file.items {
        lowerer.visit_item(item);
    }
    lowerer.tree
}

fn position_of(span: Span) -> Position {
    let start = span.start();
    Position::new(start.line, start.column)
}

/// Tuple structs and enum variants are called like functions.
fn looks_like_constructor(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

struct Lowerer {
    tree: SynTree,
    parents: Vec<NodeId>,
    scopes: Vec<ScopeId>,
    locals: Vec<HashMap<String, TypeHint>>,
    /// Generic parameters in scope, mapped to their first trait bound.
    type_params: Vec<HashMap<String, TypeHint>>,
}

impl Lowerer {
    fn new(tree: SynTree) -> Self {
        let root = tree.ast.root();
        Self {
            tree,
            parents: vec![root],
            scopes: vec![0],
            locals: Vec::new(),
            type_params: Vec::new(),
        }
    }

    fn parent(&self) -> NodeId {
        self.parents.last().copied().unwrap_or(NodeId(0))
    }

    fn scope(&self) -> ScopeId {
        self.scopes.last().copied().unwrap_or(0)
    }

    fn scope_info(&self) -> ScopeInfo {
        self.tree.scope(self.scope()).cloned().unwrap_or_default()
    }

    fn enter_scope(&mut self, info: ScopeInfo) -> ScopeId {
        let id = self.tree.scopes.len();
        self.tree.scopes.push(info);
        self.scopes.push(id);
        id
    }

    fn push_node(&mut self, kind: AstNodeKind, span: Span, payload: SynNode) -> NodeId {
        let parent = self.parent();
        self.tree.ast.push(parent, kind, position_of(span), payload)
    }

    fn lookup_local(&self, name: &str) -> Option<&TypeHint> {
        self.locals.iter().rev().find_map(|frame| frame.get(name))
    }

    fn lookup_type_param(&self, name: &str) -> Option<&TypeHint> {
        self.type_params.iter().rev().find_map(|frame| frame.get(name))
    }

    /// `T: Bound` from both the parameter list and the where clause.
    fn generic_bounds(&self, generics: &Generics) -> HashMap<String, TypeHint> {
        let mut bounds: HashMap<String, TypeHint> = generics
            .type_params()
            .map(|param| (param.ident.to_string(), self.bound_hint(param.bounds.iter())))
            .collect();

        let predicates = generics.where_clause.iter().flat_map(|clause| clause.predicates.iter());
        for predicate in predicates {
            let WherePredicate::Type(p) = predicate else {
                continue;
            };
            let Type::Path(ty) = &p.bounded_ty else {
                continue;
            };
            let Some(ident) = ty.path.get_ident().filter(|_| ty.qself.is_none()) else {
                continue;
            };
            let hint = bounds.entry(ident.to_string()).or_insert(TypeHint::Unknown);
            if *hint == TypeHint::Unknown {
                *hint = self.bound_hint(p.bounds.iter());
            }
        }
        bounds
    }

    fn bind_local(&mut self, name: String, hint: TypeHint) {
        if let Some(frame) = self.locals.last_mut() {
            frame.insert(name, hint);
        }
    }

    fn bind_pattern(&mut self, pat: &Pat, hint: TypeHint) {
        match pat {
            Pat::Ident(p) => {
                if let Some((_, sub)) = &p.subpat {
                    self.bind_pattern(sub, TypeHint::Unknown);
                }
                self.bind_local(p.ident.to_string(), hint);
            }
            Pat::Type(p) => {
                let hint = self.type_hint(&p.ty);
                self.bind_pattern(&p.pat, hint);
            }
            Pat::Reference(r) => self.bind_pattern(&r.pat, hint),
            Pat::Paren(p) => self.bind_pattern(&p.pat, hint),
            Pat::Tuple(t) => t.elems.iter().for_each(|p| self.bind_pattern(p, TypeHint::Unknown)),
            Pat::TupleStruct(t) => t.elems.iter().for_each(|p| self.bind_pattern(p, TypeHint::Unknown)),
            Pat::Slice(s) => s.elems.iter().for_each(|p| self.bind_pattern(p, TypeHint::Unknown)),
            Pat::Or(o) => o.cases.iter().for_each(|p| self.bind_pattern(p, TypeHint::Unknown)),
            Pat::Struct(s) => s.fields.iter().for_each(|f| self.bind_pattern(&f.pat, TypeHint::Unknown)),
            _ => {}
        }
    }

    fn type_hint(&self, ty: &Type) -> TypeHint {
        match ty {
            Type::Reference(r) => self.type_hint(&r.elem),
            Type::Paren(p) => self.type_hint(&p.elem),
            Type::Group(g) => self.type_hint(&g.elem),
            Type::Path(p) if p.qself.is_none() => {
                let type_param = p.path.get_ident().and_then(|ident| self.lookup_type_param(&ident.to_string()));
                if let Some(hint) = type_param {
                    return hint.clone();
                }
                if let Some(last) = p.path.segments.last() {
                    if TRANSPARENT_WRAPPERS.contains(&last.ident.to_string().as_str()) {
                        if let syn::PathArguments::AngleBracketed(args) = &last.arguments {
                            if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                                return self.type_hint(inner);
                            }
                        }
                    }
                }
                TypeHint::Named {
                    path: path_idents(&p.path),
                    scope: self.scope(),
                }
            }
            Type::ImplTrait(i) => self.bound_hint(i.bounds.iter()),
            Type::TraitObject(t) => self.bound_hint(t.bounds.iter()),
            _ => TypeHint::Unknown,
        }
    }

    fn bound_hint<'b>(&self, mut bounds: impl Iterator<Item = &'b syn::TypeParamBound>) -> TypeHint {
        bounds
            .find_map(|bound| match bound {
                // `?Sized` says nothing about the type
                syn::TypeParamBound::Trait(t) if matches!(t.modifier, syn::TraitBoundModifier::None) => {
                    Some(TypeHint::Named {
                        path: path_idents(&t.path),
                        scope: self.scope(),
                    })
                }
                _ => None,
            })
            .unwrap_or(TypeHint::Unknown)
    }

    fn expr_hint(&self, expr: &Expr) -> TypeHint {
        match expr {
            Expr::Path(p) if p.qself.is_none() => {
                let path = path_idents(&p.path);
                if let [name] = path.as_slice() {
                    if let Some(hint) = self.lookup_local(name) {
                        return hint.clone();
                    }
                    if name == "self" {
                        return TypeHint::Named {
                            path: vec!["Self".to_string()],
                            scope: self.scope(),
                        };
                    }
                }
                TypeHint::Named {
                    path,
                    scope: self.scope(),
                }
            }
            Expr::Call(c) => match self.call_target(&c.func) {
                target @ (CallTarget::Path { .. } | CallTarget::Construct { .. }) => {
                    TypeHint::ReturnOf(Box::new(target))
                }
                _ => TypeHint::Unknown,
            },
            Expr::MethodCall(m) => TypeHint::ReturnOf(Box::new(CallTarget::Method {
                receiver: self.expr_hint(&m.receiver),
                name: m.method.to_string(),
            })),
            Expr::Struct(s) => TypeHint::Named {
                path: path_idents(&s.path),
                scope: self.scope(),
            },
            Expr::Paren(p) => self.expr_hint(&p.expr),
            Expr::Group(g) => self.expr_hint(&g.expr),
            Expr::Reference(r) => self.expr_hint(&r.expr),
            Expr::Unary(u) if matches!(u.op, syn::UnOp::Deref(_)) => self.expr_hint(&u.expr),
            Expr::Cast(c) => self.type_hint(&c.ty),
            _ => TypeHint::Unknown,
        }
    }

    /// Target of a call's function expression.
    fn call_target(&self, func: &Expr) -> CallTarget {
        match func {
            Expr::Path(p) => {
                let path = match &p.qself {
                    // `<T>::f` names `T::f`; `<T as Trait>::f` names `Trait::f`
                    Some(qself) if qself.position == 0 => match qself.ty.as_ref() {
                        Type::Path(tp) => concat(&path_idents(&tp.path), &path_idents(&p.path)),
                        _ => return CallTarget::Dynamic,
                    },
                    _ => path_idents(&p.path),
                };
                if let [name] = path.as_slice() {
                    if self.lookup_local(name).is_some() {
                        return CallTarget::Dynamic;
                    }
                }
                let scope = self.scope();
                match path.last() {
                    Some(last) if looks_like_constructor(last) => CallTarget::Construct { path, scope },
                    Some(_) => CallTarget::Path { path, scope },
                    None => CallTarget::Dynamic,
                }
            }
            Expr::Paren(p) => self.call_target(&p.expr),
            Expr::Group(g) => self.call_target(&g.expr),
            _ => CallTarget::Dynamic,
        }
    }

    fn return_hint(&self, output: &ReturnType) -> TypeHint {
        match output {
            ReturnType::Default => TypeHint::Unknown,
            ReturnType::Type(_, ty) => self.type_hint(ty),
        }
    }

    /// Record a routine; routines with a body also open a caller scope.
    fn declare_routine(&mut self, path: Vec<String>, sig: &Signature, body: Option<&Block>) {
        let bounds = self.generic_bounds(&sig.generics);
        self.type_params.push(bounds);

        let decl = RoutineDecl {
            path,
            params: render_params(sig),
            returns: self.return_hint(&sig.output),
            scope: self.scope(),
        };
        let index = self.tree.routines.len();
        self.tree.routines.push(decl);

        if let Some(block) = body {
            self.lower_body(index, sig, block);
        }
        self.type_params.pop();
    }

    fn lower_body(&mut self, index: usize, sig: &Signature, block: &Block) {
        let node = self.push_node(AstNodeKind::Declaration, sig.ident.span(), SynNode::Declaration(index));
        self.parents.push(node);
        let outer_locals = std::mem::take(&mut self.locals);
        self.locals.push(HashMap::new());

        for input in &sig.inputs {
            if let FnArg::Typed(arg) = input {
                let hint = self.type_hint(&arg.ty);
                self.bind_pattern(&arg.pat, hint);
            }
        }
        self.visit_block(block);

        self.locals = outer_locals;
        self.parents.pop();
    }

    fn record_type(&mut self, ident: &syn::Ident) {
        let path = concat(&self.scope_info().namespace, &[ident.to_string()]);
        self.tree.types.push(path);
    }
}

impl<'ast> Visit<'ast> for Lowerer {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let path = concat(&self.scope_info().namespace, &[node.sig.ident.to_string()]);
        self.declare_routine(path, &node.sig, Some(&node.block));
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let outer = self.scope_info();
        let self_type = match node.self_ty.as_ref() {
            Type::Path(p) if p.qself.is_none() => outer.qualify(&path_idents(&p.path)),
            other => vec![render_type(other)],
        };
        let trait_path = node.trait_.as_ref().map(|(_, path, _)| path_idents(path));

        let scope = self.enter_scope(ScopeInfo {
            self_type: Some(self_type.clone()),
            ..outer
        });
        let bounds = self.generic_bounds(&node.generics);
        self.type_params.push(bounds);
        self.tree.impls.push(ImplDecl {
            self_type: self_type.clone(),
            trait_path,
            scope,
        });

        for item in &node.items {
            match item {
                ImplItem::Fn(method) => {
                    let path = concat(&self_type, &[method.sig.ident.to_string()]);
                    self.declare_routine(path, &method.sig, Some(&method.block));
                }
                ImplItem::Const(c) => self.visit_expr(&c.expr),
                _ => {}
            }
        }
        self.type_params.pop();
        self.scopes.pop();
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        let outer = self.scope_info();
        let trait_path = concat(&outer.namespace, &[node.ident.to_string()]);
        self.tree.types.push(trait_path.clone());

        self.enter_scope(ScopeInfo {
            self_type: Some(trait_path.clone()),
            ..outer
        });
        let bounds = self.generic_bounds(&node.generics);
        self.type_params.push(bounds);
        for item in &node.items {
            match item {
                TraitItem::Fn(method) => {
                    let path = concat(&trait_path, &[method.sig.ident.to_string()]);
                    self.declare_routine(path, &method.sig, method.default.as_ref());
                }
                TraitItem::Const(c) => {
                    if let Some((_, expr)) = &c.default {
                        self.visit_expr(expr);
                    }
                }
                _ => {}
            }
        }
        self.type_params.pop();
        self.scopes.pop();
    }

    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        // out-of-line `mod foo;` is a separate unit
        let Some((_, items)) = &node.content else {
            return;
        };
        let namespace = concat(&self.scope_info().namespace, &[node.ident.to_string()]);
        let (imports, globs) = collect_imports(&namespace, items);
        self.enter_scope(ScopeInfo {
            namespace,
            self_type: None,
            imports,
            globs,
        });
        let module = self.push_node(AstNodeKind::Other, node.ident.span(), SynNode::Module);
        self.parents.push(module);

        for item in items {
            self.visit_item(item);
        }

        self.parents.pop();
        self.scopes.pop();
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        self.record_type(&node.ident);
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        self.record_type(&node.ident);
        visit::visit_item_enum(self, node);
    }

    fn visit_item_union(&mut self, node: &'ast ItemUnion) {
        self.record_type(&node.ident);
    }

    // macro_rules! bodies are not expressions
    fn visit_item_macro(&mut self, _node: &'ast ItemMacro) {}

    fn visit_block(&mut self, node: &'ast Block) {
        self.locals.push(HashMap::new());
        visit::visit_block(self, node);
        self.locals.pop();
    }

    fn visit_local(&mut self, node: &'ast Local) {
        // the initializer runs before the new bindings are in scope
        if let Some(init) = &node.init {
            self.visit_expr(&init.expr);
            if let Some((_, diverge)) = &init.diverge {
                self.visit_expr(diverge);
            }
        }
        let hint = match (&node.pat, &node.init) {
            (Pat::Type(_), _) => TypeHint::Unknown,
            (_, Some(init)) => self.expr_hint(&init.expr),
            (_, None) => TypeHint::Unknown,
        };
        self.bind_pattern(&node.pat, hint);
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        self.locals.push(HashMap::new());
        for input in &node.inputs {
            self.bind_pattern(input, TypeHint::Unknown);
        }
        self.visit_expr(&node.body);
        self.locals.pop();
    }

    fn visit_expr_for_loop(&mut self, node: &'ast ExprForLoop) {
        self.visit_expr(&node.expr);
        self.locals.push(HashMap::new());
        self.bind_pattern(&node.pat, TypeHint::Unknown);
        self.visit_block(&node.body);
        self.locals.pop();
    }

    fn visit_arm(&mut self, node: &'ast Arm) {
        self.locals.push(HashMap::new());
        self.bind_pattern(&node.pat, TypeHint::Unknown);
        visit::visit_arm(self, node);
        self.locals.pop();
    }

    // `if let` and `while let` bindings live in the condition and the body,
    // never in `else` or after the expression
    fn visit_expr_if(&mut self, node: &'ast ExprIf) {
        self.locals.push(HashMap::new());
        self.visit_expr(&node.cond);
        self.visit_block(&node.then_branch);
        self.locals.pop();
        if let Some((_, else_branch)) = &node.else_branch {
            self.visit_expr(else_branch);
        }
    }

    fn visit_expr_while(&mut self, node: &'ast ExprWhile) {
        self.locals.push(HashMap::new());
        self.visit_expr(&node.cond);
        self.visit_block(&node.body);
        self.locals.pop();
    }

    fn visit_expr_let(&mut self, node: &'ast ExprLet) {
        self.visit_expr(&node.expr);
        self.bind_pattern(&node.pat, TypeHint::Unknown);
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        let target = self.call_target(&node.func);
        let call = self.push_node(AstNodeKind::Call, node.func.span(), SynNode::Call(target));
        self.parents.push(call);
        visit::visit_expr_call(self, node);
        self.parents.pop();
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        let target = CallTarget::Method {
            receiver: self.expr_hint(&node.receiver),
            name: node.method.to_string(),
        };
        let call = self.push_node(AstNodeKind::Call, node.method.span(), SynNode::Call(target));
        self.parents.push(call);
        visit::visit_expr_method_call(self, node);
        self.parents.pop();
    }

    fn visit_macro(&mut self, node: &'ast Macro) {
        // println!, vec!, assert! and friends take comma separated expressions;
        // anything else is opaque
        let parser = Punctuated::<Expr, syn::Token![,]>::parse_terminated;
        if let Ok(args) = node.parse_body_with(parser) {
            for expr in &args {
                Visit::visit_expr(self, expr);
            }
        }
    }
}

/// Flatten the `use` items of a module into aliases and glob prefixes.
fn collect_imports(namespace: &[String], items: &[Item]) -> (BTreeMap<String, Vec<String>>, Vec<Vec<String>>) {
    let mut imports = BTreeMap::new();
    let mut globs = Vec::new();
    for item in items {
        if let Item::Use(u) = item {
            flatten_use(&u.tree, Vec::new(), namespace, &mut imports, &mut globs);
        }
    }
    (imports, globs)
}

fn flatten_use(
    tree: &UseTree,
    prefix: Vec<String>,
    namespace: &[String],
    imports: &mut BTreeMap<String, Vec<String>>,
    globs: &mut Vec<Vec<String>>,
) {
    match tree {
        UseTree::Path(p) => {
            let mut next = prefix;
            next.push(p.ident.to_string());
            flatten_use(&p.tree, next, namespace, imports, globs);
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            if name == "self" {
                if let Some(last) = prefix.last() {
                    imports.insert(last.clone(), absolute(namespace, &prefix));
                }
            } else {
                let full = concat(&prefix, &[name.clone()]);
                imports.insert(name, absolute(namespace, &full));
            }
        }
        UseTree::Rename(r) => {
            let alias = r.rename.to_string();
            if alias != "_" {
                let full = if r.ident == "self" {
                    prefix
                } else {
                    concat(&prefix, &[r.ident.to_string()])
                };
                imports.insert(alias, absolute(namespace, &full));
            }
        }
        UseTree::Glob(_) => globs.push(absolute(namespace, &prefix)),
        UseTree::Group(g) => {
            for item in &g.items {
                flatten_use(item, prefix.clone(), namespace, imports, globs);
            }
        }
    }
}

/// Rewrite a `use` path relative to the crate root.
fn absolute(namespace: &[String], path: &[String]) -> Vec<String> {
    match path.split_first() {
        Some((first, rest)) if first == "crate" => rest.to_vec(),
        Some((first, rest)) if first == "self" => concat(namespace, rest),
        Some((first, _)) if first == "super" => {
            let depth = path.iter().take_while(|s| *s == "super").count();
            let keep = namespace.len().saturating_sub(depth);
            concat(
                namespace.get(..keep).unwrap_or_default(),
                path.get(depth..).unwrap_or_default(),
            )
        }
        _ => path.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower_str(src: &str) -> SynTree {
        lower(&syn::parse_file(src).unwrap(), &[])
    }

    fn path(s: &str) -> Vec<String> {
        s.split("::").map(str::to_string).collect()
    }

    fn calls(tree: &SynTree, node: NodeId, out: &mut Vec<CallTarget>) {
        for &child in tree.children(node) {
            if let Some(target) = tree.call_at(child) {
                out.push(target.clone());
            }
            calls(tree, child, out);
        }
    }

    #[test]
    fn test_declarations_are_qualified() {
        let tree = lower_str(
            r#"
            struct A;
            impl A { fn f(&self, x: &str) {} }
            mod inner { pub fn g() {} }
            trait T { fn required(&self); fn provided(&self) {} }
            "#,
        );
        let paths: Vec<Vec<String>> = tree.routines().iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            vec![path("A::f"), path("inner::g"), path("T::required"), path("T::provided")]
        );
        assert_eq!(tree.routines()[0].params, vec!["&str"]);
        // bodiless trait method has no node
        assert_eq!(tree.declaration_count(), 3);
        assert_eq!(tree.types(), &[path("A"), path("T")]);
    }

    #[test]
    fn test_calls_nest_under_declaration() {
        let tree = lower_str("fn f() { g(h()); }");
        let root = tree.root();
        let decl = tree.children(root)[0];
        assert_eq!(tree.kind(decl), AstNodeKind::Declaration);
        let outer = tree.children(decl)[0];
        assert_eq!(tree.kind(outer), AstNodeKind::Call);
        assert_eq!(tree.kind(tree.children(outer)[0]), AstNodeKind::Call);
        assert_eq!(tree.position(outer), Position::new(1, 9));
    }

    #[test]
    fn test_uppercase_calls_are_construct_targets() {
        let tree = lower_str("struct W(u8); fn f() -> Option<W> { Some(W(1)) }");
        let out: Vec<&CallTarget> = tree.calls().collect();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], CallTarget::Construct { path: p, .. } if *p == path("Some")));
        assert!(matches!(out[1], CallTarget::Construct { path: p, .. } if *p == path("W")));
    }

    #[test]
    fn test_file_namespace_qualifies_declarations_and_imports() {
        let file = syn::parse_file("use self::wire::Frame; pub fn connect() {} struct Socket;").unwrap();
        let tree = lower(&file, &path("net"));
        assert_eq!(tree.routines()[0].path, path("net::connect"));
        assert_eq!(tree.types(), &[path("net::Socket")]);
        let root = tree.scope(0).unwrap();
        assert_eq!(root.namespace, path("net"));
        assert_eq!(root.imports.get("Frame"), Some(&path("net::wire::Frame")));
    }

    #[test]
    fn test_if_let_binding_ends_with_its_branch() {
        let tree = lower_str(
            "fn f(o: Option<u8>) {
                if let Some(run) = o { run(); } else { run(); }
                run();
                while let Some(next) = o { next(); }
                next();
            }",
        );
        let out: Vec<&CallTarget> = tree.calls().collect();
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], &CallTarget::Dynamic);
        assert!(matches!(out[1], CallTarget::Path { .. }));
        assert!(matches!(out[2], CallTarget::Path { .. }));
        assert_eq!(out[3], &CallTarget::Dynamic);
        assert!(matches!(out[4], CallTarget::Path { .. }));
    }

    #[test]
    fn test_generic_parameter_hint_is_first_trait_bound() {
        let tree = lower_str(
            "fn g<T: Speak + Clone>(t: &T) { t.speak(); }
             fn h<U>(u: U) where U: ?Sized + Walk { u.walk(); }
             fn k<V>(v: V) { v.run(); }",
        );
        let receivers: Vec<TypeHint> = tree
            .calls()
            .map(|target| match target {
                CallTarget::Method { receiver, .. } => receiver.clone(),
                other => panic!("unexpected target {:?}", other),
            })
            .collect();
        assert!(matches!(&receivers[0], TypeHint::Named { path: p, .. } if *p == path("Speak")));
        assert!(matches!(&receivers[1], TypeHint::Named { path: p, .. } if *p == path("Walk")));
        assert_eq!(receivers[2], TypeHint::Unknown);
    }

    #[test]
    fn test_closure_variable_call_is_dynamic() {
        let tree = lower_str("fn f() { let g = || 1; g(); }");
        let mut out = Vec::new();
        calls(&tree, tree.root(), &mut out);
        assert_eq!(out, vec![CallTarget::Dynamic]);
    }

    #[test]
    fn test_method_receiver_hint_from_let() {
        let tree = lower_str("fn f() { let a = A::new(); a.run(); }");
        let mut out = Vec::new();
        calls(&tree, tree.root(), &mut out);
        assert_eq!(out.len(), 2);
        match &out[1] {
            CallTarget::Method { receiver: TypeHint::ReturnOf(inner), name } => {
                assert_eq!(name, "run");
                assert!(matches!(inner.as_ref(), CallTarget::Path { path: p, .. } if *p == path("A::new")));
            }
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_macro_arguments_are_walked() {
        let tree = lower_str(r#"fn f() { println!("{}", g()); }"#);
        assert_eq!(tree.call_count(), 1);
    }

    #[test]
    fn test_use_items_become_imports() {
        let tree = lower_str(
            r#"
            use crate::net::{Client, self as network};
            use std::fmt::*;
            mod m { use super::helper as h; fn f() { h(); } }
            "#,
        );
        let root = tree.scope(0).unwrap();
        assert_eq!(root.imports.get("Client"), Some(&path("net::Client")));
        assert_eq!(root.imports.get("network"), Some(&path("net")));
        assert_eq!(root.globs, vec![path("std::fmt")]);
        let module = tree.scopes.iter().find(|s| s.namespace == path("m")).unwrap();
        assert_eq!(module.imports.get("h"), Some(&path("helper")));
    }

    #[test]
    fn test_impl_self_type_follows_imports() {
        let tree = lower_str("use model::User; impl User { fn save(&self) {} }");
        assert_eq!(tree.routines()[0].path, path("model::User::save"));
        assert_eq!(tree.impls()[0].self_type, path("model::User"));
    }
}
