//! TUI widget modules.

pub mod form;
pub mod header;
pub mod input_area;
pub mod progress_panel;
pub mod report_view;
pub mod status_bar;
