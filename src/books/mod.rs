//! Book management routes
//!
//! Every route here sits behind the bearer-token gate; review authorship
//! comes from the authenticated identity, never from the request body.

pub mod handlers;
