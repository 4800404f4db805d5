/// Online scalar estimator over a stream of per-class values.
///
/// Values arrive one at a time through [`add`](Estimator::add); the current
/// estimate is read back with [`estimation`](Estimator::estimation).
pub trait Estimator {
    /// Incorporates a new observation. `NaN` observations are ignored.
    fn add(&mut self, v: f64);

    /// Returns the current estimate, `NaN` before the first observation.
    fn estimation(&self) -> f64;

    /// Number of observations taken into account.
    fn count(&self) -> usize;
}
