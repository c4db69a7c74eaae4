// Implementation of the non-standard types that can be bound as parameters and fetched.

pub(crate) mod binary;
pub(crate) mod timestamp;
