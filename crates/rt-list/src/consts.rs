/// An array-list that grows past this many elements is promoted to a
/// packed-list by copying (§4.4).
pub(crate) const ARRAY_THRESHOLD: usize = 16;
