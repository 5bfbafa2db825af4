/// Receives integrator events and decides how the integration should proceed.
///
/// Observers let callers monitor or steer an integration without changing
/// its API, enabling logging, divergence detection, or recording.
///
/// The `observe` method returns `Option<A>`, where `Some(action)` requests an
/// integrator-specific action and `None` lets the integration continue.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes an event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Halt {
        Now,
    }

    fn drive<O: Observer<usize, Halt>>(mut observer: O, events: usize) -> Option<usize> {
        (0..events).find(|e| observer.observe(e).is_some())
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_observer_can_act() {
        let mut seen = Vec::new();
        let halted = drive(
            |e: &usize| {
                seen.push(*e);
                (*e == 3).then_some(Halt::Now)
            },
            10,
        );

        assert_eq!(halted, Some(3));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
