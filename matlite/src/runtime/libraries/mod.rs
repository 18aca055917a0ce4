pub mod control;
pub mod numeric;
pub mod plot;

pub use control::ControlLibrary;
pub use numeric::NumericLibrary;
pub use plot::PlotLibrary;
