//! Implementation of the Record derive macro.
//!
//! This module generates the static field declarations and the by-name
//! accessors from `#[dbmap(...)]` attributes.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Path, Result, Type, Visibility};

/// Parsed record definition from a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    pub name: Ident,
    pub fields: Vec<RecordFieldDef>,
    /// Table name; an `Entity` impl is generated when present.
    pub table: Option<String>,
    pub pk: Option<String>,
    /// Dialect name and sequence expression pairs.
    pub sequences: Vec<(String, String)>,
    /// Path the generated code uses to reach `dbmap_core`.
    pub crate_path: Path,
}

/// Parsed attributes of a single field.
#[derive(Debug)]
pub struct RecordFieldDef {
    pub name: Ident,
    pub ty: Type,
    pub column: Option<String>,
    pub exported: bool,
    /// Field is itself a record whose fields are merged into this one.
    pub embed: bool,
}

/// Parse a `DeriveInput` into a `RecordDef`.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => parse_record_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    let mut table = None;
    let mut pk = None;
    let mut sequences = Vec::new();
    let mut crate_path: Path = syn::parse_quote!(::dbmap_core);

    for attr in &input.attrs {
        if !attr.path().is_ident("dbmap") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(value.value());
            } else if path.is_ident("pk") {
                let value: LitStr = meta.value()?.parse()?;
                pk = Some(value.value());
            } else if path.is_ident("sequence") {
                meta.parse_nested_meta(|entry| {
                    let Some(dialect) = entry.path.get_ident() else {
                        return Err(entry.error("expected a dialect name"));
                    };
                    let expr: LitStr = entry.value()?.parse()?;
                    sequences.push((dialect.to_string().to_lowercase(), expr.value()));
                    Ok(())
                })?;
            } else if path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                crate_path = value.parse()?;
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown dbmap attribute `{attr_name}`. \
                         Valid struct attributes are: table, pk, sequence, crate"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if table.is_none() && (pk.is_some() || !sequences.is_empty()) {
        return Err(Error::new_spanned(
            &input.ident,
            "`pk` and `sequence` require `table`",
        ));
    }

    Ok(RecordDef {
        name: input.ident.clone(),
        fields,
        table,
        pk,
        sequences,
        crate_path,
    })
}

fn parse_record_fields(fields: &Fields) -> Result<Vec<RecordFieldDef>> {
    match fields {
        Fields::Named(named) => {
            let mut parsed = Vec::with_capacity(named.named.len());
            for field in &named.named {
                if let Some(def) = parse_record_field(field)? {
                    parsed.push(def);
                }
            }
            Ok(parsed)
        }
        Fields::Unnamed(_) => Err(Error::new_spanned(
            fields,
            "Record requires a struct with named fields",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Parse one field; `None` for `#[dbmap(skip)]`.
fn parse_record_field(field: &Field) -> Result<Option<RecordFieldDef>> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut column = None;
    let mut embed = false;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("dbmap") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                column = Some(value.value());
            } else if path.is_ident("embed") {
                embed = true;
            } else if path.is_ident("skip") {
                skip = true;
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown dbmap attribute `{attr_name}`. \
                         Valid field attributes are: column, embed, skip"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if embed && column.is_some() {
        return Err(Error::new_spanned(
            &name,
            "an embedded record cannot also map a column",
        ));
    }
    if skip {
        return Ok(None);
    }

    Ok(Some(RecordFieldDef {
        name,
        ty: field.ty.clone(),
        column,
        exported: matches!(field.vis, Visibility::Public(_)),
        embed,
    }))
}

/// Generate the `Record` (and, with a table, `Entity`) implementation.
pub fn generate_record_impl(def: &RecordDef) -> TokenStream {
    let name = &def.name;
    let krate = &def.crate_path;

    let decls = def.fields.iter().map(|field| generate_field_decl(field, krate));

    let (embedded, own): (Vec<&RecordFieldDef>, Vec<&RecordFieldDef>) =
        def.fields.iter().partition(|f| f.embed);
    let own_names: Vec<String> = own.iter().map(|f| f.name.to_string()).collect();
    let own_idents: Vec<&Ident> = own.iter().map(|f| &f.name).collect();
    let embedded_idents: Vec<&Ident> = embedded.iter().map(|f| &f.name).collect();

    let record_impl = quote! {
        impl #krate::Record for #name {
            fn record_decl() -> &'static #krate::RecordDecl {
                static DECL: #krate::RecordDecl = #krate::RecordDecl {
                    type_name: concat!(module_path!(), "::", stringify!(#name)),
                    fields: &[#(#decls),*],
                };
                &DECL
            }

            fn get_field(&self, name: &str) -> Option<#krate::Value> {
                match name {
                    #(#own_names => Some(#krate::FieldType::to_value(&self.#own_idents)),)*
                    _ => {
                        let found = None;
                        #(
                            let found = found.or_else(|| {
                                #krate::Record::get_field(&self.#embedded_idents, name)
                            });
                        )*
                        found
                    }
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: #krate::Value,
            ) -> #krate::Result<bool> {
                match name {
                    #(
                        #own_names => {
                            self.#own_idents = #krate::FieldType::from_value(value)?;
                            return Ok(true);
                        }
                    )*
                    _ => {}
                }
                #(
                    if #krate::Record::get_field(&self.#embedded_idents, name).is_some() {
                        return #krate::Record::set_field(&mut self.#embedded_idents, name, value);
                    }
                )*
                Ok(false)
            }
        }
    };

    let Some(table) = &def.table else {
        return record_impl;
    };
    let pk = def.pk.clone().unwrap_or_default();
    let sequence_fn = if def.sequences.is_empty() {
        TokenStream::new()
    } else {
        let dialects = def.sequences.iter().map(|(dialect, _)| dialect);
        let exprs = def.sequences.iter().map(|(_, expr)| expr);
        quote! {
            fn pk_sequence(&self) -> Option<std::collections::HashMap<String, String>> {
                Some(std::collections::HashMap::from([
                    #((#dialects.to_string(), #exprs.to_string())),*
                ]))
            }
        }
    };

    quote! {
        #record_impl

        impl #krate::Entity for #name {
            fn table_name(&self) -> &str {
                #table
            }

            fn pk_column_name(&self) -> &str {
                #pk
            }

            #sequence_fn
        }
    }
}

/// `FieldDecl` constant for one field.
fn generate_field_decl(field: &RecordFieldDef, krate: &Path) -> TokenStream {
    let name = field.name.to_string();
    let ty = &field.ty;

    let mut decl = if field.embed {
        quote! {
            #krate::FieldDecl::new(#name, #krate::FieldKind::Record)
                .embed(<#ty as #krate::Record>::record_decl)
        }
    } else {
        quote! {
            #krate::FieldDecl::new(#name, <#ty as #krate::FieldType>::KIND)
                .nullable(<#ty as #krate::FieldType>::NULLABLE)
        }
    };
    if let Some(column) = &field.column {
        decl = quote! { #decl.column(#column) };
    }
    if !field.exported {
        decl = quote! { #decl.private() };
    }
    decl
}
