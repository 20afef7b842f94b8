// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! `#[derive(Semilattice)]` for structs.
//!
//! The generated join is field-wise and the generated `PartialOrd` is the
//! matching product order, combined through `semilog::partial_ord_helper`.
//! Type parameters are bounded by `Semilattice` on the join impl and by
//! `PartialOrd` on the order impl.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Fields, GenericParam, Generics, Index, Member, TypeParamBound,
    parse_macro_input, parse_quote,
};

#[proc_macro_derive(Semilattice)]
pub fn derive_semilattice(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Semilattice can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Semilattice can only be derived for structs",
            ));
        }
    };

    let name = &input.ident;
    let join = join_body(fields);
    let partial_cmp = partial_cmp_body(fields);

    let lattice_generics = with_bounds(
        input.generics.clone(),
        parse_quote!(semilog::Semilattice),
    );
    let (impl_generics, ty_generics, where_clause) = lattice_generics.split_for_impl();
    let semilattice_impl = quote! {
        impl #impl_generics semilog::Semilattice for #name #ty_generics #where_clause {
            fn join_assign(&mut self, other: Self) {
                #join
            }
        }
    };

    let ord_generics = with_bounds(
        input.generics.clone(),
        parse_quote!(::core::cmp::PartialOrd),
    );
    let (impl_generics, ty_generics, where_clause) = ord_generics.split_for_impl();

    Ok(quote! {
        #semilattice_impl

        impl #impl_generics ::core::cmp::PartialOrd for #name #ty_generics #where_clause {
            fn partial_cmp(
                &self,
                other: &Self,
            ) -> ::core::option::Option<::core::cmp::Ordering> {
                #partial_cmp
            }
        }
    })
}

fn with_bounds(mut generics: Generics, bound: TypeParamBound) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(bound.clone());
        }
    }
    generics
}

fn members(fields: &Fields) -> Vec<(Member, proc_macro2::Span)> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let member = match &f.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index::from(i)),
            };
            (member, f.span())
        })
        .collect()
}

fn join_body(fields: &Fields) -> TokenStream {
    let members = members(fields);
    if members.is_empty() {
        return quote!(let _ = other;);
    }

    let joins = members.iter().map(|(member, span)| {
        quote_spanned! { *span =>
            semilog::Semilattice::join_assign(&mut self.#member, other.#member);
        }
    });
    quote!(#(#joins)*)
}

fn partial_cmp_body(fields: &Fields) -> TokenStream {
    let members = members(fields);
    if members.is_empty() {
        return quote! {
            let _ = other;
            ::core::option::Option::Some(::core::cmp::Ordering::Equal)
        };
    }

    let orders = members.iter().map(|(member, span)| {
        quote_spanned! { *span =>
            ::core::cmp::PartialOrd::partial_cmp(&self.#member, &other.#member),
        }
    });
    quote!(semilog::partial_ord_helper([#(#orders)*]))
}
