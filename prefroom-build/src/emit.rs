//! Rust emitter for generated units.
//!
//! Renders [`GeneratedUnit`] descriptors into tokens (for the derive macro) or
//! formatted source (for build scripts and the CLI).

use std::collections::BTreeMap;

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use crate::errors::{GenerateError, GenerateResult};
use crate::naming::{instance_static_name, namespace_modules};
use crate::unit::{
    DefaultLiteral, FieldKind, GeneratedMethod, GeneratedUnit, MethodBody, Receiver, StoreMode, ValueType, Visibility,
};

/// Default path of the runtime crate in generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::prefroom";

/// Settings for emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path generated code uses to reach the runtime crate.
    pub runtime_path: String,
    /// Visibility of the generated struct, e.g. `pub` or `pub(crate)`; empty for private.
    pub unit_visibility: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            unit_visibility: "pub".to_string(),
        }
    }
}

impl EmitOptions {
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    pub fn unit_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.unit_visibility = visibility.into();
        self
    }
}

/// Emit the tokens of one unit: struct, instance slot, impl block and optional `Deref`.
pub fn unit_tokens(unit: &GeneratedUnit, options: &EmitOptions) -> GenerateResult<TokenStream> {
    UnitEmitter::new(unit, options)?.emit()
}

/// Render one unit as formatted Rust source, inside the modules its namespace names.
pub fn render_unit(unit: &GeneratedUnit, options: &EmitOptions) -> GenerateResult<String> {
    let mut tree = ModuleTree::default();
    tree.insert(unit, unit_tokens(unit, options)?)?;
    format_tokens(&unit.type_name, tree.into_tokens())
}

/// Render a complete module holding every unit.
///
/// Units whose namespace is `crate` sit at the top, in the order given. Deeper
/// namespaces become nested `pub mod` blocks relative to wherever the file is
/// mounted, so `crate::settings` lands in `pub mod settings`.
pub fn render_file(units: &[GeneratedUnit], options: &EmitOptions) -> GenerateResult<String> {
    let mut tree = ModuleTree::default();
    for unit in units {
        tree.insert(unit, unit_tokens(unit, options)?)?;
    }
    let body = tree.into_tokens();

    let output = quote! {
        //! Auto-generated preference accessors. Do not edit manually.
        //!
        //! Generated by prefroom-build.

        #body
    };
    format_tokens("module", output)
}

/// Unit tokens grouped by module; child modules are emitted sorted by name.
#[derive(Default)]
struct ModuleTree {
    items: Vec<TokenStream>,
    children: BTreeMap<String, ModuleTree>,
}

impl ModuleTree {
    fn insert(&mut self, unit: &GeneratedUnit, tokens: TokenStream) -> GenerateResult<()> {
        let modules = namespace_modules(&unit.namespace).ok_or_else(|| GenerateError::InvalidTypePath {
            entity: unit.store_name.clone(),
            path: unit.namespace.clone(),
        })?;

        let mut node = self;
        for module in modules {
            node = node.children.entry(module).or_default();
        }
        node.items.push(tokens);
        Ok(())
    }

    fn into_tokens(self) -> TokenStream {
        let items = self.items;
        let children = self.children.into_iter().map(|(name, child)| {
            let ident = format_ident!("{}", name);
            let body = child.into_tokens();
            quote! {
                pub mod #ident {
                    #body
                }
            }
        });
        quote! {
            #(#items)*
            #(#children)*
        }
    }
}

fn format_tokens(unit: &str, tokens: TokenStream) -> GenerateResult<String> {
    let syntax_tree: syn::File = syn::parse2(tokens).map_err(|err| GenerateError::Emit {
        unit: unit.to_string(),
        message: err.to_string(),
    })?;
    Ok(prettyplease::unparse(&syntax_tree))
}

struct UnitEmitter<'a> {
    unit: &'a GeneratedUnit,
    runtime: syn::Path,
    visibility: syn::Visibility,
    unit_ident: syn::Ident,
    store_ident: syn::Ident,
    slot_ident: syn::Ident,
    base: Option<syn::Type>,
}

impl<'a> UnitEmitter<'a> {
    fn new(unit: &'a GeneratedUnit, options: &EmitOptions) -> GenerateResult<Self> {
        let runtime = syn::parse_str::<syn::Path>(&options.runtime_path).map_err(|_| GenerateError::InvalidTypePath {
            entity: unit.store_name.clone(),
            path: options.runtime_path.clone(),
        })?;

        let visibility = syn::parse_str::<syn::Visibility>(&options.unit_visibility).map_err(|err| {
            GenerateError::Emit {
                unit: unit.type_name.clone(),
                message: format!("invalid visibility '{}': {err}", options.unit_visibility),
            }
        })?;

        let store_name = unit
            .fields
            .iter()
            .find(|f| f.kind == FieldKind::StoreHandle)
            .map(|f| f.name.as_str())
            .ok_or_else(|| GenerateError::Emit {
                unit: unit.type_name.clone(),
                message: "unit has no store handle field".to_string(),
            })?;

        let base = match &unit.super_type {
            Some(path) => Some(parse_type(unit, path)?),
            None => None,
        };

        Ok(Self {
            unit,
            runtime,
            visibility,
            unit_ident: format_ident!("{}", unit.type_name),
            store_ident: format_ident!("{}", store_name),
            slot_ident: format_ident!("{}", instance_static_name(&unit.type_name)),
            base,
        })
    }

    fn emit(&self) -> GenerateResult<TokenStream> {
        let runtime = &self.runtime;
        let unit_ident = &self.unit_ident;
        let store_ident = &self.store_ident;
        let slot_ident = &self.slot_ident;
        let visibility = &self.visibility;
        let doc = &self.unit.doc;

        let base_member = self.base.as_ref().map(|base| quote! { base: #base, });
        let deref_impl = self.base.as_ref().map(|base| {
            quote! {
                impl ::std::ops::Deref for #unit_ident {
                    type Target = #base;

                    fn deref(&self) -> &Self::Target {
                        &self.base
                    }
                }
            }
        });

        let methods = self
            .unit
            .methods
            .iter()
            .map(|method| self.method(method))
            .collect::<GenerateResult<Vec<_>>>()?;

        Ok(quote! {
            #[doc = #doc]
            #[allow(non_camel_case_types)]
            #visibility struct #unit_ident {
                #store_ident: #runtime::SharedPreferences,
                #base_member
            }

            #[allow(non_upper_case_globals)]
            static #slot_ident: #runtime::SingletonSlot<#unit_ident> = #runtime::SingletonSlot::new();

            #[allow(non_snake_case, dead_code)]
            impl #unit_ident {
                #(#methods)*
            }

            #deref_impl
        })
    }

    fn method(&self, method: &GeneratedMethod) -> GenerateResult<TokenStream> {
        let name = format_ident!("{}", method.name);
        let vis = match method.visibility {
            Visibility::Public => quote! { pub },
            Visibility::Private => TokenStream::new(),
        };
        let receiver = match method.receiver {
            Receiver::Instance => Some(quote! { &self }),
            Receiver::Static => None,
        };

        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let ident = format_ident!("{}", param.name);
            let ty = self.value_type(&param.ty)?;
            params.push(quote! { #ident: #ty });
        }
        let all_params = receiver.into_iter().chain(params);

        let returns = if method.is_constructor {
            quote! { -> Self }
        } else {
            match &method.returns {
                Some(ty) => {
                    let ty = self.value_type(ty)?;
                    quote! { -> #ty }
                }
                None => TokenStream::new(),
            }
        };

        let body = self.body(method)?;

        Ok(quote! {
            #vis fn #name(#(#all_params),*) #returns {
                #body
            }
        })
    }

    fn value_type(&self, ty: &ValueType) -> GenerateResult<TokenStream> {
        let runtime = &self.runtime;
        Ok(match ty {
            ValueType::Rust(path) => {
                let ty = parse_type(self.unit, path)?;
                quote! { #ty }
            }
            ValueType::Context => quote! { &#runtime::Context },
            ValueType::SelfShared => quote! { ::std::sync::Arc<Self> },
        })
    }

    fn body(&self, method: &GeneratedMethod) -> GenerateResult<TokenStream> {
        let runtime = &self.runtime;
        let store = &self.store_ident;
        let slot = &self.slot_ident;

        let tokens = match &method.body {
            MethodBody::OpenStore { store: name, mode } => {
                let context = self.context_param(method)?;
                let mode = match mode {
                    StoreMode::Private => quote! { #runtime::Mode::Private },
                };
                let base_init = self
                    .base
                    .as_ref()
                    .map(|_| quote! { base: ::core::default::Default::default(), });
                quote! {
                    Self {
                        #store: #context.get_shared_preferences(#name, #mode),
                        #base_init
                    }
                }
            }
            MethodBody::SingletonAccess => {
                let context = self.context_param(method)?;
                quote! {
                    #slot.get_or_construct(|| Self::new(#context))
                }
            }
            MethodBody::Read { key, primitive, default } => {
                let read = format_ident!("{}", primitive.method_name());
                match default_tokens(default) {
                    Some(default) => quote! { self.#store.#read(#key, #default) },
                    None => quote! { self.#store.#read(#key) },
                }
            }
            MethodBody::Write { key, primitive } => {
                let write = format_ident!("{}", primitive.method_name());
                let value = self.value_param(method)?;
                quote! { self.#store.edit().#write(#key, #value).apply(); }
            }
            MethodBody::Contains { key } => quote! { self.#store.contains(#key) },
            MethodBody::Remove { key } => quote! { self.#store.edit().remove(#key).apply(); },
            MethodBody::ClearAll => quote! { self.#store.edit().clear().apply(); },
        };
        Ok(tokens)
    }

    fn context_param(&self, method: &GeneratedMethod) -> GenerateResult<syn::Ident> {
        method
            .params
            .iter()
            .find(|p| p.ty == ValueType::Context)
            .map(|p| format_ident!("{}", p.name))
            .ok_or_else(|| self.malformed(method, "takes no context parameter"))
    }

    /// Value argument of a putter. Serialized values are passed by reference.
    fn value_param(&self, method: &GeneratedMethod) -> GenerateResult<TokenStream> {
        let param = method
            .params
            .first()
            .ok_or_else(|| self.malformed(method, "has no value parameter"))?;
        let ident = format_ident!("{}", param.name);
        Ok(match &method.body {
            MethodBody::Write {
                primitive: crate::unit::StorePrimitive::PutObject,
                ..
            } => quote! { &#ident },
            _ => quote! { #ident },
        })
    }

    fn malformed(&self, method: &GeneratedMethod, what: &str) -> GenerateError {
        GenerateError::Emit {
            unit: self.unit.type_name.clone(),
            message: format!("method '{}' {what}", method.name),
        }
    }
}

fn parse_type(unit: &GeneratedUnit, path: &str) -> GenerateResult<syn::Type> {
    syn::parse_str::<syn::Type>(path).map_err(|_| GenerateError::InvalidTypePath {
        entity: unit.store_name.clone(),
        path: path.to_string(),
    })
}

/// Default argument for a read primitive. Serialized reads take none.
fn default_tokens(default: &DefaultLiteral) -> Option<TokenStream> {
    let tokens = match default {
        DefaultLiteral::Boolean(v) => quote! { #v },
        DefaultLiteral::Int(v) => signed_int(i64::from(*v)),
        DefaultLiteral::Long(v) => signed_int(*v),
        DefaultLiteral::Float(v) => float(f64::from(*v), quote! { f32 }),
        DefaultLiteral::Double(v) => float(*v, quote! { f64 }),
        DefaultLiteral::String(v) => quote! { #v },
        DefaultLiteral::StringSet(items) => quote! { &[#(#items),*] },
        DefaultLiteral::TypeDefault => return None,
    };
    Some(tokens)
}

fn signed_int(value: i64) -> TokenStream {
    let magnitude = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote! { -#magnitude }
    } else {
        quote! { #magnitude }
    }
}

fn float(value: f64, ty: TokenStream) -> TokenStream {
    if value.is_nan() {
        return quote! { #ty::NAN };
    }
    if value.is_infinite() {
        return if value > 0.0 {
            quote! { #ty::INFINITY }
        } else {
            quote! { #ty::NEG_INFINITY }
        };
    }
    let magnitude = Literal::f64_unsuffixed(value.abs());
    if value.is_sign_negative() && value != 0.0 {
        quote! { -#magnitude }
    } else {
        quote! { #magnitude }
    }
}
