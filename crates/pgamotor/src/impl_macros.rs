/// Implements reference variants of a binary operator for `Copy` types by
/// dereferencing and forwarding to the by-value implementation.
macro_rules! impl_forward_bin_ops_to_value {
    () => {};

    (
        impl $trait:ident for $type:ty { fn $func:ident() }
        $($remainder:tt)*
    ) => {
        impl_forward_bin_ops_to_value! {
            impl $trait<$type> for $type { fn $func() -> $type }
            $($remainder)*
        }
    };

    (
        impl $trait:ident<$rhs:ty> for $type:ty { fn $func:ident() -> $ret:ty }
        $($remainder:tt)*
    ) => {
        impl<'a> $trait<$rhs> for &'a $type {
            type Output = $ret;

            fn $func(self, rhs: $rhs) -> $ret {
                $trait::$func(*self, rhs)
            }
        }
        impl<'a> $trait<&'a $rhs> for $type {
            type Output = $ret;

            fn $func(self, rhs: &'a $rhs) -> $ret {
                $trait::$func(self, *rhs)
            }
        }
        impl<'a, 'b> $trait<&'b $rhs> for &'a $type {
            type Output = $ret;

            fn $func(self, rhs: &'b $rhs) -> $ret {
                $trait::$func(*self, *rhs)
            }
        }
        impl_forward_bin_ops_to_value! { $($remainder)* }
    };
}

/// Implements the `*Assign` variant of a binary operator for `Copy` types in
/// terms of the by-value operator.
macro_rules! impl_assign_ops_from_bin_ops {
    () => {};

    (
        impl $trait:ident<$rhs:ty> for $type:ty { fn $func:ident() = $bin_func:ident }
        $($remainder:tt)*
    ) => {
        impl $trait<$rhs> for $type {
            fn $func(&mut self, rhs: $rhs) {
                *self = (*self).$bin_func(rhs);
            }
        }
        impl_assign_ops_from_bin_ops! { $($remainder)* }
    };
}
