//! Adapter bridging core traits to the command layer.

use super::ProgressSink;
use crate::output::Output;

/// Adapter that forwards `ProgressSink` calls to an `Output` implementation.
///
/// ```ignore
/// let mut output = CliOutput::new(config);
/// let result = {
///     let mut sink = OutputSink(&mut output);
///     core::sync::execute(&params, &mut sink)?
/// };
/// render_sync_result(&result, &mut output);
/// ```
pub struct OutputSink<'a>(pub &'a mut dyn Output);

impl ProgressSink for OutputSink<'_> {
    fn on_step(&mut self, msg: &str) {
        self.0.step(msg);
    }

    fn on_warning(&mut self, msg: &str) {
        self.0.warning(msg);
    }

    fn on_debug(&mut self, msg: &str) {
        self.0.debug(msg);
    }
}
