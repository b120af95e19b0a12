//! Seawater equations of state.
//!
//! Density as a function of salinity, potential temperature and pressure,
//! in the two formulations MITgcm output is commonly analysed with:
//!
//! - [`EqState::Jmd95`]: Jackett & McDougall (1995) polynomial with a secant bulk modulus
//!   (Jackett & McDougall, 1995)
//! - [`EqState::Mdjwf`]: rational function of McDougall, Jackett, Wright & Feistel (2003)

mod equation_of_state;

pub use equation_of_state::{EqState, EquationOfState, freezing_point};
