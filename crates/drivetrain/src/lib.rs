//! # Drivetrain
//!
//! Integrates the gear from the control signal into a bounded speed on a
//! fixed period (50 ms by default), independent of render rate.
//!
//! ```ignore
//! use drivetrain::{SpeedIntegrator, SpeedTicker};
//!
//! let ticker = SpeedTicker::spawn(SpeedIntegrator::new(config), signal_rx);
//! let speed_rx = ticker.subscribe();
//! // ...
//! ticker.stop().await;
//! ```

mod integrator;
mod ticker;

pub use integrator::SpeedIntegrator;
pub use ticker::{SpeedSample, SpeedTicker};
