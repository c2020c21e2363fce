pub mod aggregation;
pub mod filter;
pub mod report_query;
pub mod section_search;
pub mod term_query;
