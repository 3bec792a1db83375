/// Build a [`Compound`][`crate::Compound`] from `"key" => value` pairs. Values
/// go through `Tag::from`, so plain Rust numbers and strings work.
///
/// ```rust
/// use nbtcodec::{compound, Tag};
/// let c = compound! {
///     "byte" => 5_i8,
///     "string" => "hello",
///     "nested" => compound! { "int" => 0xdead },
/// };
/// assert_eq!(c["nested"].as_compound().unwrap()["int"], Tag::Int(0xdead));
/// ```
///
/// Later keys replace earlier ones with the same name, as on decode.
#[macro_export]
macro_rules! compound {
    () => {
        $crate::Compound::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut compound = $crate::Compound::new();
        $(
            compound.insert(::std::string::String::from($key), $crate::Tag::from($value));
        )+
        compound
    }};
}
