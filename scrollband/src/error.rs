/// Errors raised when constructing a layout from invalid measurements.
///
/// These are programmer errors (a zero size would mean dividing by zero on
/// every scroll event), so they are rejected up front by the typed layout
/// constructors instead of being clamped at query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutError {
    /// The main-axis item size is zero.
    #[error("item size in the scroll axis must be positive")]
    ZeroItemSize,
    /// The cross-axis item size is zero (grid layouts only).
    #[error("item size in the cross axis must be positive")]
    ZeroItemCrossSize,
}
