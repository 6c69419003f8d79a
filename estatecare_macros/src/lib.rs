mod document;

use proc_macro::TokenStream;

/// Derive macro implementing `estatecare::Document`.
///
/// The collection defaults to the snake_case struct name plus `s`; the id
/// field defaults to a field named `id`.
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Clone, Document)]
/// #[document(collection = "service_orders")]
/// struct ServiceOrder {
///     #[document(id)]
///     pub code: String,
///     // ...
/// }
/// ```
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
