/// Default maximum command buffer size: 16 MiB.
pub const DEFAULT_MAX_BUFFER: usize = 16 * 1024 * 1024;

/// Default maximum number of arguments in one command.
pub const DEFAULT_MAX_ARGUMENTS: usize = 4096;

/// Limits applied while decoding untrusted command buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Buffers larger than this are rejected before parsing.
    pub max_buffer_size: usize,
    /// Argument arrays longer than this are rejected.
    pub max_arguments: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: DEFAULT_MAX_BUFFER,
            max_arguments: DEFAULT_MAX_ARGUMENTS,
        }
    }
}
