use prefroom_build::{AccessorSet, DefaultValue, FieldDescriptor};
use quote::ToTokens;
use syn::meta::ParseNestedMeta;

use crate::*;

pub(crate) struct ParsedField {
    key: String,
    type_name: String,
    span: Span,
    object: bool,
    default_value: Option<DefaultValue>,
    has: bool,
    remove: bool,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident: &Ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "PreferenceEntity requires named fields"))?;

        let mut parsed = Self {
            key: ident.to_string(),
            type_name: field.ty.to_token_stream().to_string(),
            span: ident.span(),
            object: false,
            default_value: None,
            has: false,
            remove: false,
        };

        for attr in &field.attrs {
            if attr.path().is_ident("preference") {
                attr.parse_nested_meta(|meta| parsed.parse_field_meta(&meta))?;
            }
        }

        Ok(parsed)
    }

    fn parse_field_meta(&mut self, meta: &ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("key") {
            let key: LitStr = meta.value()?.parse()?;
            self.key = key.value();
        } else if meta.path.is_ident("default") {
            if self.default_value.is_some() {
                return Err(meta.error("default is already set"));
            }
            let expr: Expr = meta.value()?.parse()?;
            self.default_value = Some(default_from_expr(&expr)?);
        } else if meta.path.is_ident("object") {
            self.object = true;
        } else if meta.path.is_ident("has") {
            self.has = true;
        } else if meta.path.is_ident("remove") {
            self.remove = true;
        } else {
            return Err(meta.error(
                "unknown preference field attribute; expected `key`, `default`, `object`, `has` or `remove`",
            ));
        }
        Ok(())
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.key.clone(),
            type_name: self.type_name.clone(),
            serialized: self.object,
            default_value: self.default_value.clone(),
            accessors: AccessorSet {
                has: self.has,
                remove: self.remove,
                ..AccessorSet::NONE
            },
        }
    }
}

fn default_from_expr(expr: &Expr) -> Result<DefaultValue> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => default_from_lit(lit, false),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit { lit, .. }) if matches!(lit, Lit::Int(_) | Lit::Float(_)) => default_from_lit(lit, true),
            other => Err(Error::new(other.span(), "only numeric literals can be negated")),
        },
        Expr::Array(ExprArray { elems, .. }) => {
            let mut items = Vec::with_capacity(elems.len());
            for elem in elems {
                match elem {
                    Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => items.push(s.value()),
                    other => return Err(Error::new(other.span(), "string set defaults hold string literals")),
                }
            }
            Ok(DefaultValue::StrList(items))
        }
        other => Err(Error::new(
            other.span(),
            "default must be a literal or an array of string literals",
        )),
    }
}

fn default_from_lit(lit: &Lit, negate: bool) -> Result<DefaultValue> {
    Ok(match lit {
        Lit::Bool(b) => DefaultValue::Bool(b.value),
        Lit::Str(s) => DefaultValue::Str(s.value()),
        Lit::Int(int) => {
            let magnitude: i128 = int.base10_parse()?;
            let value = if negate { -magnitude } else { magnitude };
            let value = i64::try_from(value).map_err(|_| Error::new(int.span(), "integer default out of range"))?;
            DefaultValue::Int(value)
        }
        Lit::Float(float) => {
            let magnitude: f64 = float.base10_parse()?;
            DefaultValue::Float(if negate { -magnitude } else { magnitude })
        }
        other => return Err(Error::new(other.span(), "unsupported default literal")),
    })
}
