// Rendering of signature types into the text used in routine display names.
// Lifetimes are dropped; everything else is written the way rustfmt would.

use syn::punctuated::Punctuated;
use syn::{
    Expr, FnArg, GenericArgument, Lit, Path, PathArguments, ReturnType, Signature,
    TraitBoundModifier, Type, TypeParamBound,
};

/// Identifier segments of a path, generics stripped.
pub fn path_idents(path: &Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Parameter types of a signature, receiver excluded.
pub fn render_params(sig: &Signature) -> Vec<String> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(render_type(&pat.ty)),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

pub fn render_type(ty: &Type) -> String {
    match ty {
        Type::Path(p) => match &p.qself {
            Some(qself) => {
                let segments: Vec<String> = p.path.segments.iter().map(render_segment).collect();
                let (trait_part, rest) = segments.split_at(qself.position.min(segments.len()));
                if trait_part.is_empty() {
                    format!("<{}>::{}", render_type(&qself.ty), rest.join("::"))
                } else {
                    format!(
                        "<{} as {}>::{}",
                        render_type(&qself.ty),
                        trait_part.join("::"),
                        rest.join("::")
                    )
                }
            }
            None => render_path(&p.path),
        },
        Type::Reference(r) => {
            let mutability = if r.mutability.is_some() { "mut " } else { "" };
            format!("&{}{}", mutability, render_type(&r.elem))
        }
        Type::Ptr(p) => {
            let mutability = if p.mutability.is_some() { "mut" } else { "const" };
            format!("*{} {}", mutability, render_type(&p.elem))
        }
        Type::Slice(s) => format!("[{}]", render_type(&s.elem)),
        Type::Array(a) => format!("[{}; {}]", render_type(&a.elem), render_const(&a.len)),
        Type::Tuple(t) => {
            let elems: Vec<String> = t.elems.iter().map(render_type).collect();
            if elems.len() == 1 {
                format!("({},)", elems[0])
            } else {
                format!("({})", elems.join(", "))
            }
        }
        Type::ImplTrait(i) => format!("impl {}", render_bounds(&i.bounds)),
        Type::TraitObject(t) => format!("dyn {}", render_bounds(&t.bounds)),
        Type::BareFn(f) => {
            let inputs: Vec<String> = f.inputs.iter().map(|a| render_type(&a.ty)).collect();
            format!("fn({}){}", inputs.join(", "), render_return(&f.output))
        }
        Type::Never(_) => "!".to_string(),
        Type::Infer(_) => "_".to_string(),
        Type::Paren(p) => format!("({})", render_type(&p.elem)),
        Type::Group(g) => render_type(&g.elem),
        Type::Macro(m) => format!("{}!(..)", path_idents(&m.mac.path).join("::")),
        _ => "_".to_string(),
    }
}

fn render_path(path: &Path) -> String {
    let segments: Vec<String> = path.segments.iter().map(render_segment).collect();
    let joined = segments.join("::");
    if path.leading_colon.is_some() {
        format!("::{}", joined)
    } else {
        joined
    }
}

fn render_segment(segment: &syn::PathSegment) -> String {
    format!("{}{}", segment.ident, render_arguments(&segment.arguments))
}

fn render_arguments(args: &PathArguments) -> String {
    match args {
        PathArguments::None => String::new(),
        PathArguments::AngleBracketed(a) => {
            let parts: Vec<String> = a.args.iter().filter_map(render_generic_argument).collect();
            if parts.is_empty() {
                String::new()
            } else {
                format!("<{}>", parts.join(", "))
            }
        }
        PathArguments::Parenthesized(p) => {
            let inputs: Vec<String> = p.inputs.iter().map(render_type).collect();
            format!("({}){}", inputs.join(", "), render_return(&p.output))
        }
    }
}

fn render_generic_argument(arg: &GenericArgument) -> Option<String> {
    match arg {
        GenericArgument::Type(t) => Some(render_type(t)),
        GenericArgument::Const(e) => Some(render_const(e)),
        GenericArgument::AssocType(a) => Some(format!("{} = {}", a.ident, render_type(&a.ty))),
        GenericArgument::AssocConst(a) => Some(format!("{} = {}", a.ident, render_const(&a.value))),
        GenericArgument::Constraint(c) => Some(format!("{}: {}", c.ident, render_bounds(&c.bounds))),
        _ => None,
    }
}

fn render_bounds(bounds: &Punctuated<TypeParamBound, syn::Token![+]>) -> String {
    let parts: Vec<String> = bounds
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(t) => {
                let maybe = if matches!(t.modifier, TraitBoundModifier::Maybe(_)) { "?" } else { "" };
                Some(format!("{}{}", maybe, render_path(&t.path)))
            }
            _ => None,
        })
        .collect();
    parts.join(" + ")
}

fn render_return(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => String::new(),
        ReturnType::Type(_, ty) => format!(" -> {}", render_type(ty)),
    }
}

fn render_const(expr: &Expr) -> String {
    match expr {
        Expr::Lit(l) => match &l.lit {
            Lit::Int(i) => i.base10_digits().to_string(),
            _ => "_".to_string(),
        },
        Expr::Path(p) => path_idents(&p.path).join("::"),
        _ => "_".to_string(),
    }
}
