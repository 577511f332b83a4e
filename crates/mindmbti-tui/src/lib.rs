// Terminal front end for the MindMBTI client.

pub mod tui;
