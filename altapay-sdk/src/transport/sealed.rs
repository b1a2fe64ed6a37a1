//! Sealed trait marker for Transport implementations.

pub(crate) mod private {
    /// Sealed trait marker.
    ///
    /// Only transports defined in this crate may implement `Transport`.
    pub trait Sealed {}
}
