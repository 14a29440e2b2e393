//! 构造注入派生宏实现

use crate::utils::{arc_inner, extract_generic_type, has_inject_default, is_option_type};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Result};

/// 实现 #[derive(Injectable)] 宏
pub fn derive_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "泛型结构体带有未绑定的类型参数，无法自动激活",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new_spanned(
                struct_name,
                "Injectable 只能用于结构体",
            ))
        }
    };

    let construct = match fields {
        Fields::Named(named) => {
            let values = named
                .named
                .iter()
                .map(|field| {
                    let name = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #name: #value })
                })
                .collect::<Result<Vec<_>>>()?;
            quote! { Self { #(#values),* } }
        }
        Fields::Unnamed(unnamed) => {
            let values = unnamed
                .unnamed
                .iter()
                .map(field_value)
                .collect::<Result<Vec<_>>>()?;
            quote! { Self(#(#values),*) }
        }
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl ::mockbot::Injectable for #struct_name {
            fn inject(
                ctx: &mut ::mockbot::ResolveContext<'_>,
            ) -> ::core::result::Result<Self, ::mockbot::DependencyError> {
                ::core::result::Result::Ok(#construct)
            }
        }

        impl ::mockbot::Service for #struct_name {
            fn descriptor() -> ::mockbot::TypeDescriptor {
                ::mockbot::TypeDescriptor::of::<Self>(::mockbot::TypeShape::concrete())
                    .with_activator(::mockbot::activate::<Self>)
            }
        }
    })
}

/// 生成单个字段的取值表达式
fn field_value(field: &Field) -> Result<proc_macro2::TokenStream> {
    if has_inject_default(field)? {
        return Ok(quote! { ::core::default::Default::default() });
    }

    let ty = &field.ty;
    if let Some(service) = arc_inner(ty) {
        return Ok(quote! { ctx.get::<#service>()? });
    }

    if is_option_type(ty) {
        if let Some(service) = extract_generic_type(ty).and_then(arc_inner) {
            return Ok(quote! { ctx.get_optional::<#service>()? });
        }
    }

    Err(Error::new_spanned(
        ty,
        "字段类型必须是 Arc<T> 或 Option<Arc<T>>，其他字段请标注 #[inject(default)]",
    ))
}
