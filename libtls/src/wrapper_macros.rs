/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

/// Defines a fieldless enum that mirrors a numeric identifier used by the
/// engine or on the wire, with conversions in both directions.
macro_rules! define {
    { #[raw($raw:ty)] $(#[$m:meta])* enum $n:ident { $($(#[$doc:meta])* $rust:ident = $val:expr,)* } } => {
        $(#[$m])*
        pub enum $n {
            $($(#[$doc])* $rust,)*
        }

        impl $n {
            pub fn from_raw(raw: $raw) -> Option<$n> {
                match raw {
                    $(v if v == $val => Some($n::$rust),)*
                    _ => None,
                }
            }

            pub fn to_raw(self) -> $raw {
                match self {
                    $($n::$rust => $val,)*
                }
            }
        }

        impl From<$n> for $raw {
            fn from(v: $n) -> $raw {
                v.to_raw()
            }
        }
    };
}

/// Accessor over the connection info snapshot; `None` before the handshake
/// has completed.
macro_rules! conninfo_getter {
    { $(#[$m:meta])* fn $name:ident() -> Option<$t:ty> { $field:ident } } => {
        $(#[$m])*
        pub fn $name(&self) -> Option<$t> {
            self.conninfo.as_ref().and_then(|info| info.$field.as_deref())
        }
    };
}
