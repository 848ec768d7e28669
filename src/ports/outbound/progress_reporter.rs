/// ProgressReporter port for user-facing progress output
///
/// Kept separate from `tracing` logs: progress lines are for the person
/// watching the CI job, logs are for operators filtering by level.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Starts or advances an indeterminate wait (e.g. a network call)
    ///
    /// # Arguments
    /// * `message` - What is being waited on
    fn report_waiting(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
