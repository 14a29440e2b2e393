//! 可模拟接口宏实现

use crate::utils::has_supertrait;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, parse_quote, punctuated::Punctuated,
    Error, Expr, FnArg, ItemTrait, Lit, Meta, Pat, PatWild, Result, ReturnType, Signature, Token,
    TraitItem,
};

/// 接口形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockableKind {
    #[default]
    Interface,
    Abstract,
}

/// 宏参数
#[derive(Debug, Clone, Default)]
pub struct MockableArgs {
    pub kind: MockableKind,
}

impl Parse for MockableArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = MockableArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("kind") => {
                    let kind = match &nv.value {
                        Expr::Lit(expr_lit) => match &expr_lit.lit {
                            Lit::Str(lit_str) => lit_str.value(),
                            _ => String::new(),
                        },
                        _ => String::new(),
                    };
                    args.kind = match kind.as_str() {
                        "interface" => MockableKind::Interface,
                        "abstract" => MockableKind::Abstract,
                        _ => {
                            return Err(Error::new_spanned(
                                &nv.value,
                                "kind 只能是 \"interface\" 或 \"abstract\"",
                            ))
                        }
                    };
                }
                other => return Err(Error::new_spanned(other, "不支持的 mockable 参数")),
            }
        }

        Ok(args)
    }
}

/// 实现 #[mockable] 宏
pub fn mockable_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = if args.is_empty() {
        MockableArgs::default()
    } else {
        match syn::parse::<MockableArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let item = parse_macro_input!(input as ItemTrait);
    match expand(args, item) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(args: MockableArgs, mut item: ItemTrait) -> Result<proc_macro2::TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "泛型接口带有未绑定的类型参数，无法自动模拟",
        ));
    }

    ensure_thread_safe(&mut item);

    let trait_name = &item.ident;
    let vis = &item.vis;
    let proxy_name = format_ident!("{}MockProxy", trait_name);

    let mut method_names = Vec::new();
    let mut proxy_methods = Vec::new();
    for trait_item in &item.items {
        if let TraitItem::Fn(method) = trait_item {
            let name = method.sig.ident.to_string();
            proxy_methods.push(proxy_method(&method.sig, &name)?);
            method_names.push(name);
        }
    }

    let shape = match args.kind {
        MockableKind::Interface => quote! { ::mockbot::TypeShape::interface() },
        MockableKind::Abstract => quote! { ::mockbot::TypeShape::abstract_type() },
    };

    Ok(quote! {
        #item

        #[doc(hidden)]
        #vis struct #proxy_name {
            interceptor: ::std::sync::Arc<dyn ::mockbot::Interceptor>,
        }

        impl #trait_name for #proxy_name {
            #(#proxy_methods)*
        }

        impl ::mockbot::Service for dyn #trait_name {
            fn descriptor() -> ::mockbot::TypeDescriptor {
                ::mockbot::TypeDescriptor::of::<dyn #trait_name>(#shape)
                    .with_proxy(::mockbot::proxy_instance::<dyn #trait_name>)
            }
        }

        impl ::mockbot::Mockable for dyn #trait_name {
            const METHODS: &'static [&'static str] = &[#(#method_names),*];

            fn proxy(
                interceptor: ::std::sync::Arc<dyn ::mockbot::Interceptor>,
            ) -> ::std::sync::Arc<Self> {
                ::std::sync::Arc::new(#proxy_name { interceptor })
            }
        }
    })
}

/// 补上缺少的 `Send + Sync` 父 trait
fn ensure_thread_safe(item: &mut ItemTrait) {
    let needs_send = !has_supertrait(&item.supertraits, "Send");
    let needs_sync = !has_supertrait(&item.supertraits, "Sync");

    if needs_send || needs_sync {
        item.colon_token.get_or_insert_with(Default::default);
    }
    if needs_send {
        item.supertraits.push(parse_quote!(::core::marker::Send));
    }
    if needs_sync {
        item.supertraits.push(parse_quote!(::core::marker::Sync));
    }
}

/// 生成转发到拦截器的代理方法
fn proxy_method(sig: &Signature, name: &str) -> Result<proc_macro2::TokenStream> {
    if sig.receiver().is_none() {
        return Err(Error::new_spanned(
            sig,
            "可模拟接口的方法必须带有 self 接收者",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &sig.generics,
            "泛型方法无法通过接口对象调用，不能模拟",
        ));
    }
    if sig.asyncness.is_some() {
        return Err(Error::new_spanned(sig, "暂不支持异步方法"));
    }

    let mut sig = sig.clone();
    for input in sig.inputs.iter_mut() {
        if let FnArg::Typed(pat_type) = input {
            pat_type.attrs.clear();
            *pat_type.pat = Pat::Wild(PatWild {
                attrs: Vec::new(),
                underscore_token: Default::default(),
            });
        }
    }

    let ret = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    Ok(quote! {
        #sig {
            ::mockbot::dispatch::<#ret>(&*self.interceptor, #name)
        }
    })
}
