/// Builds a [`HandlerSignature`](crate::HandlerSignature) from a Rust-like
/// parameter list.
///
/// Each parameter is `name`, `name: Type`, `name = default` or
/// `name: Type = default`. Types map through [`SchemaType`](crate::SchemaType);
/// a parameter without a type is treated as unannotated. Default expressions
/// only mark the parameter optional and are not evaluated.
///
/// ```rust
/// use ftooling::{ParamType, signature};
///
/// let signature = signature!(search(user_id: String, query: String, limit: Option<u32> = None, db));
///
/// assert_eq!(signature.handler, "search");
/// assert_eq!(signature.parameters.len(), 4);
/// assert_eq!(
///     signature.parameter("limit").unwrap().ty,
///     Some(ParamType::optional(ParamType::Integer))
/// );
/// assert!(signature.parameter("limit").unwrap().has_default);
/// assert!(signature.parameter("db").unwrap().ty.is_none());
/// ```
#[macro_export]
macro_rules! signature {
    ($handler:ident ( $( $name:ident $(: $ty:ty)? $(= $default:expr)? ),* $(,)? )) => {
        $crate::HandlerSignature::new(stringify!($handler))
            $(.with_parameter($crate::__signature_parameter!($name $(: $ty)? $(= $default)?)))*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __signature_parameter {
    ($name:ident : $ty:ty = $default:expr) => {
        $crate::Parameter::of::<$ty>(stringify!($name)).with_default()
    };
    ($name:ident : $ty:ty) => {
        $crate::Parameter::of::<$ty>(stringify!($name))
    };
    ($name:ident = $default:expr) => {
        $crate::Parameter::untyped(stringify!($name)).with_default()
    };
    ($name:ident) => {
        $crate::Parameter::untyped(stringify!($name))
    };
}
