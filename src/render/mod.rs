//! Rasterization of picture logs.

/// `vello_cpu` raster backend.
pub mod cpu;
/// Rasterizer capability and raster output types.
pub mod raster;
