//! systree: a mock operating system modelled as an in-memory node tree.
//!
//! Layers, innermost first:
//! - [`domain`]: arena tree, template builder, [`domain::TreeManager`], rendering
//! - [`application`]: template loading service
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: one-shot commands and the interactive shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
