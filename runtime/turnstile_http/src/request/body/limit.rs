use ubyte::{ByteUnit, ToByteUnit};

/// An upper limit on the size of incoming request bodies.
///
/// Check out [`BufferedBody`](super::BufferedBody) for more details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySizeLimit {
    /// There is an active limit on the size of incoming request bodies.
    Enabled {
        /// The maximum size of incoming request bodies.
        max_size: ByteUnit,
    },
    /// There is no limit on the size of incoming request bodies.
    Disabled,
}

impl Default for BodySizeLimit {
    fn default() -> Self {
        Self::Enabled {
            max_size: 2.megabytes(),
        }
    }
}

impl From<ByteUnit> for BodySizeLimit {
    fn from(max_size: ByteUnit) -> Self {
        Self::Enabled { max_size }
    }
}
