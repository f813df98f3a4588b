//! buildhooks — build-step wrappers around GLib/GIO tooling.
//!
//! Two helpers are provided, each with a thin binary on top:
//!
//! - [`codegen`] drives `gdbus-codegen` for a build step that emits both a
//!   `.c` and a `.h` file. The build coordinator only sees one step, so the
//!   wrapper declares both outputs itself and records failures in a marker
//!   file when the exit status is not propagated.
//! - [`install`] runs `glib-compile-schemas` and `gio-querymodules` after
//!   installation, unless a staged install (`DESTDIR`) is in progress.
//!
//! # Quick start
//!
//! ```no_run
//! use buildhooks::codegen::{self, InvocationRequest};
//! use buildhooks::config::OnFailure;
//! use buildhooks::runner::SystemRunner;
//!
//! let request = InvocationRequest::new(
//!     "org.gtk.vfs.",
//!     "gvfsdbus",
//!     "GVfsDBus",
//!     "build/common",
//!     "common/org.gtk.vfs.xml",
//! );
//! let outcome = codegen::dispatch(
//!     &request,
//!     codegen::GDBUS_CODEGEN,
//!     OnFailure::Marker,
//!     &mut SystemRunner,
//! );
//! std::process::exit(outcome.exit_code.into());
//! ```

pub mod codegen;
pub mod config;
pub mod install;
pub mod runner;
