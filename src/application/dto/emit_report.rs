/// EmitReport - outcome of pushing one payload to the collector
///
/// The payload is sent as a single body, so `accepted_lines` is either 0
/// or `attempted_lines`; a partial push cannot happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitReport {
    pub attempted_lines: usize,
    pub accepted_lines: usize,
    /// Whether the best-effort delete of the previous snapshot succeeded
    pub stale_cleared: bool,
}

impl EmitReport {
    pub fn is_complete(&self) -> bool {
        self.accepted_lines == self.attempted_lines
    }
}
