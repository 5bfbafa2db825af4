/// Explicit Euler stepping: `next = value + delta * rate`.
///
/// The kinematic and forward-Euler dynamic schemes compute a continuous-time
/// [`StateRate`](crate::StateRate) and advance the [`State`](crate::State)
/// through this trait. The semi-implicit scheme does not; its lateral update
/// is closed-form.
pub trait StepIntegrable<Delta> {
    /// Rate of change with respect to `Delta`.
    type Derivative;

    /// Returns the value after one step of size `delta` at rate `derivative`.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}
