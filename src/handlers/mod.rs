// Route handlers, one module per resource.
//
// Every handler is a single store operation followed by a re-read of the
// affected collection. Permission checks live in the router as per-route
// guards, so handlers only see requests that already passed them.

pub mod categories;
pub mod comments;
pub mod items;
pub mod session;
pub mod system;
pub mod users;
pub mod utils;
