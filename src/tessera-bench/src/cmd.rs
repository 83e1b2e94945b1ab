pub mod pack;
pub mod write;

/// Common trait for every benchmark the harness runs.
pub trait Command {
    /// Runs the benchmark and prints its results.
    fn handle(self) -> eyre::Result<()>;
}
