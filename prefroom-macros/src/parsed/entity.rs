use prefroom_build::{EmitOptions, EntityDescriptor, GenerateError};
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::Visibility;

use super::ParsedField;
use crate::*;

pub(crate) struct ParsedEntity {
    ident: Ident,
    vis: Visibility,
    name: String,
    name_span: Span,
    fields: Vec<ParsedField>,
}

impl ParsedEntity {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new(
                input.generics.span(),
                "PreferenceEntity cannot be derived for generic structs",
            ));
        }

        let mut name: Option<LitStr> = None;
        for attr in &input.attrs {
            if attr.path().is_ident("preference") {
                Self::parse_container_attr(attr, &mut name)?;
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field)?);
                    }
                    parsed
                }
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(Error::new(input.ident.span(), "PreferenceEntity requires named fields"));
                }
            },
            _ => return Err(Error::new(input.ident.span(), "PreferenceEntity can only be derived for structs")),
        };

        let (name, name_span) = match name {
            Some(lit) => (lit.value(), lit.span()),
            None => (input.ident.to_string(), input.ident.span()),
        };

        Ok(Self {
            ident: input.ident.clone(),
            vis: input.vis.clone(),
            name,
            name_span,
            fields,
        })
    }

    fn parse_container_attr(attr: &Attribute, name: &mut Option<LitStr>) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                if name.is_some() {
                    return Err(meta.error("preference name is already set"));
                }
                *name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown preference attribute; expected `name = \"...\"`"))
            }
        })
    }

    fn descriptor(&self) -> EntityDescriptor {
        EntityDescriptor {
            name: self.name.clone(),
            namespace: "self".to_string(),
            base_type: Some(self.ident.to_string()),
            fields: self.fields.iter().map(ParsedField::descriptor).collect(),
        }
    }

    pub(crate) fn emit(&self) -> Result<TokenStream2> {
        let unit = prefroom_build::generate(&self.descriptor()).map_err(|err| self.error_at(&err))?;
        let options = EmitOptions::default().unit_visibility(self.vis.to_token_stream().to_string());
        prefroom_build::unit_tokens(&unit, &options).map_err(|err| self.error_at(&err))
    }

    /// Point a generation error at the field or attribute it concerns.
    fn error_at(&self, err: &GenerateError) -> Error {
        let span = match err {
            GenerateError::UnsupportedFieldType { field, .. } | GenerateError::InvalidDefaultValue { field, .. } => {
                self.field_span(field, false)
            }
            GenerateError::DuplicateFieldName { second, .. } => self.field_span(second, true),
            GenerateError::InvalidName { kind: "field", name } => self.field_span(name, false),
            GenerateError::MissingRequiredMetadata { .. } | GenerateError::InvalidName { .. } => self.name_span,
            _ => self.ident.span(),
        };
        Error::new(span, err.to_string())
    }

    fn field_span(&self, key: &str, last: bool) -> Span {
        let mut matching = self.fields.iter().filter(|f| f.key() == key);
        let found = if last { matching.last() } else { matching.next() };
        found.map_or_else(|| self.ident.span(), ParsedField::span)
    }
}
