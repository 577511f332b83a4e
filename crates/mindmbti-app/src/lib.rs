// Application orchestration: the command/event protocol shared with the
// front end, and the event loop that turns user commands into API requests.

pub mod app;
pub mod protocol;
