/// A raw byte sequence, to be bound as parameter against binary-typed columns.
///
/// By default, a `Binary` is handed to the driver as a plain byte array.
/// Large-object (BLOB) columns additionally need
/// [`Adapter::blob()`](crate::Adapter::blob) to be registered for
/// [`HostType::Binary`](crate::HostType::Binary), which wraps the bytes into the
/// driver's large-object type.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Returns the contained bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Converts into the contained bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<{} bytes>", self.0.len())
    }
}

/// Wraps a raw byte sequence for use as a bound parameter.
pub fn make_binary<B: Into<Vec<u8>>>(bytes: B) -> Binary {
    Binary(bytes.into())
}
