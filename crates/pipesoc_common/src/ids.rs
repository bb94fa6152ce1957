//! Opaque ID newtypes.
//!
//! [`DomainId`] indexes clock domains inside a clock plan and the edge
//! scheduler. [`EndpointId`] indexes control-bus endpoints in registration
//! order.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize` for slice access.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a clock domain.
    DomainId
);

define_id!(
    /// Opaque, copyable ID for a control-bus endpoint.
    EndpointId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_and_index() {
        let id = DomainId::from_raw(3);
        assert_eq!(id.as_raw(), 3);
        assert_eq!(id.index(), 3);
    }

    #[test]
    fn ordering_follows_raw_index() {
        assert!(EndpointId::from_raw(0) < EndpointId::from_raw(1));
    }
}
