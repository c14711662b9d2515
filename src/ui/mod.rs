/// UI module exports
pub mod detail_graph;
pub mod dialog;
pub mod format;
pub mod viewer;
