/// A domain-agnostic event.
///
/// Events are facts about a command that has already been applied; they are
/// immutable and carry everything an observer needs without reading the store.
pub trait Event: Clone + core::fmt::Debug + Send + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.placed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32 {
        1
    }
}
