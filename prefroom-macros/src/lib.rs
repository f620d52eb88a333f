use proc_macro::TokenStream;
use proc_macro2::Span;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprArray, ExprLit, ExprUnary, Field, Fields, Ident, Lit, LitStr,
    Result, UnOp, parse_macro_input, spanned::Spanned,
};

mod parsed;

use parsed::ParsedEntity;

/// Generate a `Preference_<Name>` accessor unit for the annotated struct.
///
/// The struct's fields declare the store keys; the struct itself becomes the
/// unit's `Deref` target and must implement `Default`.
///
/// # Example
///
/// ```text
/// #[derive(Default, PreferenceEntity)]
/// #[preference(name = "UserProfile")]
/// pub struct Profile {
///     #[preference(default = 18)]
///     age: i32,
///     #[preference(key = "nick", has)]
///     nickname: String,
///     #[preference(object)]
///     pet: Pet,
/// }
///
/// // Generated:
/// // - Preference_UserProfile::getInstance(&context)
/// // - getAge/putAge, getNick/putNick/hasNick, getPet/putPet/removePet
/// // - clear()
/// ```
#[proc_macro_derive(PreferenceEntity, attributes(preference))]
pub fn derive_preference_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedEntity::from_input(&input).and_then(|parsed| parsed.emit()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
