pub mod config;
pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod interp;
pub mod robust;
pub mod track;
pub mod warp;
