use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Signature,
    Type, TypePath,
};

use crate::attrs::AttributeData;

const RETURN_TYPE_MESSAGE: &str = "a constructor's return type should be `Self` or `Result<Self, E>`";

#[derive(Debug)]
struct ConstructorData {
    self_type: TypePath,
    identifier: Ident,
    arguments: Vec<Span>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct InjectRemovalVisitor;

impl InjectRemovalVisitor {
    fn is_inject(attr: &Attribute) -> bool {
        attr.path().is_ident("inject")
    }
}

impl VisitMut for InjectRemovalVisitor {
    fn visit_impl_item_fn_mut(&mut self, item_fn: &mut ImplItemFn) {
        item_fn.attrs.retain(|attr| !Self::is_inject(attr));
        visit_mut::visit_impl_item_fn_mut(self, item_fn);
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[constructor]` should be annotated on an `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[constructor]` should be annotated on an inherent `impl` block",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let signature = get_constructor_signature(&impls.items, impls.span())?;
    let ctor_data = parse_constructor(self_type, signature)?;

    let expanded = expand_construct_implementation(ctor_data, attr_data);

    InjectRemovalVisitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn get_constructor_signature(items: &[ImplItem], impl_span: Span) -> SynResult<Signature> {
    let ctors: Vec<&ImplItemFn> = items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(item_fn) => Some(item_fn),
            _ => None,
        })
        .filter(|item_fn| item_fn.attrs.iter().any(InjectRemovalVisitor::is_inject))
        .collect();

    let signature = match ctors.as_slice() {
        [ctor] => ctor.sig.clone(),
        [] => {
            return Err(SynError::new(
                impl_span,
                "no associated function is annotated with `#[inject]`",
            ))
        }
        [_, extra, ..] => {
            return Err(SynError::new(
                extra.sig.span(),
                "only one associated function can be annotated with `#[inject]`",
            ))
        }
    };

    if let Some(FnArg::Receiver(rec)) = signature.inputs.first() {
        return Err(SynError::new(
            rec.span(),
            "method is not allowed to be annotated with `#[inject]`",
        ));
    }
    if let Some(asyncness) = &signature.asyncness {
        return Err(SynError::new(
            asyncness.span(),
            "an `#[inject]` function should not be `async`",
        ));
    }

    Ok(signature)
}

fn parse_constructor(self_type: TypePath, signature: Signature) -> SynResult<ConstructorData> {
    let arguments = signature
        .inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(arg) if is_arc(&arg.ty) => Ok(arg.span()),
            FnArg::Typed(arg) => Err(SynError::new(
                arg.ty.span(),
                "an injected argument should be an `Arc<T>`",
            )),
            FnArg::Receiver(rec) => Err(SynError::new(rec.span(), "unexpected receiver")),
        })
        .collect::<SynResult<Vec<_>>>()?;
    let return_type = parse_constructor_return_type(&signature.output, &self_type)?;

    Ok(ConstructorData {
        self_type,
        identifier: signature.ident,
        arguments,
        return_type,
    })
}

fn is_arc(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|s| s.ident == "Arc" && matches!(s.arguments, PathArguments::AngleBracketed(_)))
}

fn is_self(ty: &TypePath, self_type: &TypePath) -> bool {
    ty == self_type || ty.path.is_ident("Self")
}

fn parse_constructor_return_type(
    output: &ReturnType,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(output.span(), RETURN_TYPE_MESSAGE));
    };
    let Type::Path(return_type) = return_type.as_ref() else {
        return Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE));
    };

    if is_self(return_type, self_type) {
        return Ok(ReturnTypeData::Infallible);
    }

    let segments = &return_type.path.segments;
    let names: Vec<String> = segments.iter().map(|s| s.ident.to_string()).collect();
    let is_result = matches!(
        names.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Result"] | ["std", "result", "Result"] | ["core", "result", "Result"]
    );

    match segments.last() {
        Some(last) if is_result && return_type.qself.is_none() => {
            parse_result_return_type(&last.arguments, self_type)
        }
        _ => Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn parse_result_return_type(
    type_args: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) = type_args
    else {
        return Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE));
    };

    let mut args = args.iter();
    match (args.next(), args.next(), args.next()) {
        (
            Some(GenericArgument::Type(Type::Path(ok_type))),
            Some(GenericArgument::Type(error_type)),
            None,
        ) if is_self(ok_type, self_type) => Ok(ReturnTypeData::Result {
            error_type: error_type.clone(),
        }),
        _ => Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn expand_construct_implementation(
    ctor_data: ConstructorData,
    attr_data: AttributeData,
) -> TokenStream2 {
    let self_type = &ctor_data.self_type;
    let constructor = &ctor_data.identifier;

    let associated_type_constructed = match &attr_data {
        AttributeData::Full { output_type, .. } => quote! { type Constructed = #output_type; },
        AttributeData::Default => quote! { type Constructed = Self; },
    };

    let associated_type_error = match &ctor_data.return_type {
        ReturnTypeData::Result { error_type } => quote! { type Error = #error_type; },
        ReturnTypeData::Infallible => quote! { type Error = ::std::convert::Infallible; },
    };

    let deps: Vec<Ident> = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, span)| Ident::new(&format!("dep{i}"), *span))
        .collect();

    let take_statements = deps
        .iter()
        .map(|dep| quote_spanned! { dep.span()=> let #dep = args.take()?; })
        .collect::<TokenStream2>();

    let wire_deps = match &ctor_data.return_type {
        ReturnTypeData::Infallible => quote! { Ok(Ok(<#self_type>::#constructor(#(#deps),*))) },
        ReturnTypeData::Result { .. } => quote! { Ok(<#self_type>::#constructor(#(#deps),*)) },
    };

    let post_process_body = match &attr_data {
        AttributeData::Full { post_processor, .. } => quote! { #post_processor(self) },
        AttributeData::Default => quote! { self },
    };

    quote! {
        impl wiring::injector::Construct for #self_type {
            #associated_type_constructed
            #associated_type_error

            #[allow(unused_variables)]
            fn construct(
                args: &mut wiring::injector::Arguments,
            ) -> ::std::result::Result<
                ::std::result::Result<Self, Self::Error>,
                wiring::injector::ArgumentError,
            > {
                #take_statements
                #wire_deps
            }

            fn post_process(self) -> Self::Constructed {
                #post_process_body
            }
        }
    }
}
