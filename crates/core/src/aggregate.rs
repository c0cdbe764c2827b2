//! Aggregate trait: pure decide/apply state transitions.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` validates a command and returns the
///   events it produces, without touching state.
/// - **State mutation**: `apply(&mut self, event)` evolves state and cannot fail.
///
/// A command is therefore all-or-nothing: either `handle` rejects it and the
/// state is untouched, or every returned event is applied in order.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Monotonically increasing version (+1 per applied event).
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// `handle` followed by `apply` of every decided event.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: i64,
        version: u64,
    }

    impl Aggregate for Counter {
        type Command = i64;
        type Event = i64;
        type Error = String;

        fn version(&self) -> u64 {
            self.version
        }

        fn apply(&mut self, event: &i64) {
            self.value += event;
            self.version += 1;
        }

        fn handle(&self, command: &i64) -> Result<Vec<i64>, String> {
            if self.value + command < 0 {
                return Err("negative".to_string());
            }
            Ok(vec![*command])
        }
    }

    #[test]
    fn execute_is_all_or_nothing() {
        let mut counter = Counter::default();
        counter.execute(&3).unwrap();
        assert!(counter.execute(&-5).is_err());
        assert_eq!(counter.value, 3);
        assert_eq!(counter.version(), 1);
    }
}
