//=========================================================================
// Runner Engine: Library Root
//
// Runtime interaction engine of an endless runner: the character's
// collision dispatcher, the power-up state machine, the coin pool and
// the timed routines they share.
//
// Responsibilities:
// - Expose the session facade (`Session`, `SessionBuilder`)
// - Expose the core services for hosts that need finer control
// - Leave rendering, physics and audio to host collaborators
//
// Typical usage:
// ```no_run
// use runner_engine::SessionBuilder;
//
// let mut session = SessionBuilder::new().build();
// session.start_run();
// loop {
//     session.tick(1.0 / 60.0);
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every gameplay service. Most hosts only need `Session`,
// but the services are public for custom effects and tooling.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod session;

//--- Public Exports ------------------------------------------------------

pub use session::{Session, SessionBuilder};
