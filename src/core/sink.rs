//! Display sink trait

/// Trait for the two-region text display
///
/// The display owns a "details" region (static sensor metadata) and a
/// "values" region (latest reading). Each setter replaces its region's
/// full text; the reader never observes a partial mix of two updates.
pub trait DisplaySink: Send + Sync {
    /// Replace the details region
    fn set_details(&mut self, text: &str);

    /// Replace the latest-values region
    fn set_values(&mut self, text: &str);
}
