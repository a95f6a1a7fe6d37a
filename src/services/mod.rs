pub mod sheet_source;
