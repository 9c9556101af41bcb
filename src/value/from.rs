use crate::Value;

// Parameter maps carry flat scalars; structured data goes through
// [`to_value`][crate::to_value] instead.
macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident as $repr:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(<$repr>::from(v))
                }
            }
        )+
    };
}

impl_from_scalar! {
    bool => Bool as bool,
    u8 => Integer as i64,
    u16 => Integer as i64,
    u32 => Integer as i64,
    i8 => Integer as i64,
    i16 => Integer as i64,
    i32 => Integer as i64,
    i64 => Integer as i64,
    f32 => Float as f64,
    f64 => Float as f64,
    &str => String as String,
    String => String as String,
}

impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}
