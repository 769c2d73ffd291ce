use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, parse_macro_input};

fn extract_doc(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("doc")
            && let syn::Meta::NameValue(nv) = &attr.meta
            && let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = &nv.value
        {
            let line = s.value();
            // `/// text`会带上一个前导空格
            lines.push(line.strip_prefix(' ').map(str::to_string).unwrap_or(line));
        }
    }
    lines.join("\n")
}

/// `FindFirst` -> `find-first`
fn kebab_case(ident: &str) -> String {
    let mut name = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// 为只含单元变体的枚举生成命令名称和帮助信息，名称由变体名转为kebab-case，帮助信息取自文档注释。
#[proc_macro_derive(CmdHelp)]
pub fn cmd_help_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_name = &input.ident;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        return syn::Error::new_spanned(enum_name, "CmdHelp can only be derived on enums").to_compile_error().into();
    };
    if let Some(v) = variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
        return syn::Error::new_spanned(&v.ident, "CmdHelp requires unit variants").to_compile_error().into();
    }

    let idents = variants.iter().map(|v| &v.ident).collect::<Vec<_>>();
    let names = idents.iter().map(|ident| kebab_case(&ident.to_string())).collect::<Vec<_>>();
    let docs = variants.iter().map(|v| extract_doc(&v.attrs)).collect::<Vec<_>>();

    let expanded = quote! {
        impl #enum_name {
            /// 命令名称。
            pub fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            /// 获取帮助信息。
            pub fn help(&self) -> &'static str {
                match self {
                    #(Self::#idents => #docs,)*
                }
            }

            /// 按名称查找。
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    #(#names => Some(Self::#idents),)*
                    _ => None,
                }
            }

            /// 按声明顺序返回全部变体。
            pub fn all() -> &'static [Self] {
                &[#(Self::#idents),*]
            }

            /// 获取全部帮助信息：[(name, help), ...]
            pub fn all_help() -> &'static [(&'static str, &'static str)] {
                &[#((#names, #docs)),*]
            }
        }
    };

    TokenStream::from(expanded)
}
