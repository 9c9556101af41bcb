/// Construct a literal [`Value::Map`][crate::Value] of localization
/// parameters.
///
/// ```
/// let params = formulate::params! { name: "Mats", count: 2 };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Value::Map($crate::Map::new())
    };
    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert(
                ::std::string::String::from(stringify!($key)),
                $crate::Value::from($value),
            );
        )+
        $crate::Value::Map(map)
    }};
}

/// Construct a [`Path`][crate::Path] from a field projection chain.
///
/// The fields are cloned out of the context, and the dotted chain becomes
/// the path's name.
///
/// ```
/// struct Person { name: String }
/// let name = formulate::path!(Person => name);
/// assert_eq!(name.repr(), "name");
/// ```
#[macro_export]
macro_rules! path {
    ($root:ty => $($seg:ident).+) => {
        $crate::Path::new(
            [$(stringify!($seg)),+].join("."),
            |ctx: &$root| ctx.$($seg).+.clone(),
        )
    };
}
