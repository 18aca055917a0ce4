//! Continuous-time SISO control-systems math
//!
//! Transfer functions, their poles and zeros, time responses through an exact zero-order-hold
//! simulation, and the frequency and root-locus analyses behind the plotting commands.

pub mod frequency;
pub mod polynomial;
pub mod response;
pub mod root_locus;
pub mod state_space;
pub mod transfer_function;

pub use frequency::{
    frequency_grid, frequency_response, nyquist_curve, stability_margins, FrequencyResponse,
    StabilityMargins,
};
pub use response::{impulse_response, step_info, step_response, StepInfo, TimeResponse};
pub use root_locus::{root_locus, RootLocus};
pub use state_space::StateSpace;
pub use transfer_function::TransferFunction;
