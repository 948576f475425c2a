//! Exit code constants for the chunkflow CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid flow or settings)
//! - 2: Step failure (unknown agent, missing input, unwritable output)
//! - 3: Remote call failure (provider rejected or unreachable)
//! - 4: Content loss while content loss is configured as fatal

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid flow definition or run settings.
pub const USER_ERROR: i32 = 1;

/// A step could not run: its agent or input is missing, or its output could not be written.
pub const STEP_FAILURE: i32 = 2;

/// The text-generation service failed or returned an unusable response.
pub const REMOTE_FAILURE: i32 = 3;

/// A section had to be dropped and the run treats that as fatal.
pub const CONTENT_LOSS: i32 = 4;
