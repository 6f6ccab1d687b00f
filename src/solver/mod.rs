//! Interface-level driver and batch evaluation.
//!
//! [`solve_interface`] is what a finite-volume update calls per face:
//! dry-neighbour treatment, speed estimation and solver dispatch.
//! [`solve_batch`] (and [`solve_batch_parallel`] with the `parallel` feature)
//! run it over a whole sweep.

mod batch;
mod interface;

pub use batch::{max_wave_speed, solve_batch};
pub use interface::{solve_face, solve_interface};

#[cfg(feature = "parallel")]
pub use batch::solve_batch_parallel;
