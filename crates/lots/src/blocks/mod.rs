//! Street network to block polygons, plus the worker that shrinks and
//! divides them.

mod street_graph;
mod worker;

pub use street_graph::{StreetGraph, StreetNode};
pub use worker::{BlockWorker, JobKind};
